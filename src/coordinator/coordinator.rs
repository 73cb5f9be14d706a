/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use super::command::Command;
use super::dispatcher;
use super::registry::CallRegistry;
use crate::config::{ElevatorConfig, RuntimeConfig};
use crate::elevator::{Car, ElevatorFSM, TaskKind};
use crate::shared::{BuildingSnapshot, CarId, Direction};

const HOME_FLOOR: u8 = 1;

/**
 * Owns the whole elevator bank: both cars and the call registry.
 *
 * The coordinator is the single writer of all simulation state. Input
 * operations and task steps are applied one at a time, and after each one
 * every car is settled so the behaviours keyed on the changed fields restart
 * before anything else happens. Simulated time only moves through `advance`.
 *
 * # Fields
 * - `now_ms`:    Simulated time.
 * - `registry`:  Lit hall call buttons.
 * - `elevators`: The cars in dispatch order, A then B.
 */
pub struct Coordinator {
    now_ms: u64,
    registry: CallRegistry,
    elevators: Vec<ElevatorFSM>,
}

impl Coordinator {
    /// Both cars parked at floor 1 with their doors open.
    pub fn new(config: &ElevatorConfig) -> Coordinator {
        let elevators = CarId::ALL
            .iter()
            .map(|id| ElevatorFSM::new(*id, HOME_FLOOR, config))
            .collect();
        Coordinator::from_elevators(elevators)
    }

    /// Starts from arbitrary car states, listed in dispatch order.
    pub fn with_cars(cars: Vec<Car>, config: &ElevatorConfig) -> Coordinator {
        let elevators = cars
            .into_iter()
            .map(|car| ElevatorFSM::with_car(car, config))
            .collect();
        Coordinator::from_elevators(elevators)
    }

    fn from_elevators(elevators: Vec<ElevatorFSM>) -> Coordinator {
        let mut coordinator = Coordinator {
            now_ms: 0,
            registry: CallRegistry::new(),
            elevators,
        };
        coordinator.settle();
        coordinator
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn registry(&self) -> &CallRegistry {
        &self.registry
    }

    pub fn elevator(&self, id: CarId) -> Option<&ElevatorFSM> {
        self.elevators.iter().find(|elevator| elevator.car().id == id)
    }

    pub fn car(&self, id: CarId) -> Option<&Car> {
        self.elevator(id).map(|elevator| elevator.car())
    }

    pub fn snapshot(&self) -> BuildingSnapshot {
        BuildingSnapshot {
            time_ms: self.now_ms,
            cars: self.elevators.iter().map(|e| e.car().snapshot()).collect(),
            call_buttons_up: self.registry.call_buttons_up(),
            call_buttons_down: self.registry.call_buttons_down(),
        }
    }

    /// Toggles a cabin request in `car`. Returns false if the press was ignored.
    pub fn press_cabin_button(&mut self, car: CarId, floor: u8) -> bool {
        let accepted = match self.elevators.iter_mut().find(|e| e.car().id == car) {
            Some(elevator) => elevator.press_cabin_button(floor),
            None => false,
        };
        if accepted {
            debug!("Cabin button {} pressed in car {}", floor, car);
            self.settle();
        }
        accepted
    }

    /// Lights a hall call and dispatches it. Returns false if the press was ignored.
    pub fn press_hall_button(&mut self, floor: u8, direction: Direction) -> bool {
        if !CallRegistry::has_button(floor, direction) {
            debug!("No hall button {:?} at floor {}", direction, floor);
            return false;
        }
        if self.elevators.iter().any(|e| e.car().is_open_at(floor)) {
            debug!("Hall call {} {:?} already served by an open car", floor, direction);
            return false;
        }
        if self.registry.is_lit(floor, direction) {
            return false;
        }

        let mut cars: Vec<&mut Car> = self.elevators.iter_mut().map(|e| e.car_mut()).collect();
        let dispatched = dispatcher::dispatch_call(floor, direction, &mut cars, &mut self.registry);
        if dispatched.is_some() {
            self.settle();
        }
        dispatched.is_some()
    }

    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::CabButton { car, floor } => self.press_cabin_button(car, floor),
            Command::HallButton { floor, direction } => self.press_hall_button(floor, direction),
            Command::Terminate => false,
        }
    }

    /// Advances simulated time by `ms`, running every task step that falls due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.now_ms + ms;
        while let Some((wake_at, index, kind)) = self.next_due(until) {
            self.now_ms = wake_at;
            self.elevators[index].run_task(kind, wake_at, &mut self.registry);
            self.settle();
        }
        self.now_ms = until;
    }

    fn next_due(&self, until: u64) -> Option<(u64, usize, TaskKind)> {
        self.elevators
            .iter()
            .enumerate()
            .filter_map(|(index, e)| e.next_wake().map(|(at, kind)| (at, index, kind)))
            .min()
            .filter(|(at, _, _)| *at <= until)
    }

    fn settle(&mut self) {
        let now = self.now_ms;
        loop {
            let mut changed = false;
            for elevator in self.elevators.iter_mut() {
                changed |= elevator.settle(now, &mut self.registry);
            }
            if !changed {
                break;
            }
        }
    }

    /**
     * Runs the coordinator as the owner thread of the simulation.
     *
     * Simulated time advances by `tick_ms` on every tick of a timer channel, input
     * commands are applied between ticks, and a snapshot is published every
     * `snapshot_interval_ms` of simulated time. Returns on `Command::Terminate` or
     * when either channel is disconnected.
     */
    pub fn run(
        mut self,
        runtime: &RuntimeConfig,
        command_rx: cbc::Receiver<Command>,
        snapshot_tx: cbc::Sender<BuildingSnapshot>,
    ) {
        let ticker = cbc::tick(Duration::from_millis(runtime.tick_ms));
        let mut since_snapshot_ms = 0;

        loop {
            cbc::select! {
                recv(command_rx) -> command => {
                    match command {
                        Ok(Command::Terminate) => {
                            info!("Coordinator terminated");
                            return;
                        }
                        Ok(command) => {
                            if !self.handle_command(command) {
                                debug!("Ignored {:?}", command);
                            }
                        }
                        Err(e) => {
                            warn!("Command channel closed: {}", e);
                            return;
                        }
                    }
                }
                recv(ticker) -> _ => {
                    self.advance(runtime.tick_ms);
                    since_snapshot_ms += runtime.tick_ms;
                    if since_snapshot_ms >= runtime.snapshot_interval_ms {
                        since_snapshot_ms = 0;
                        if snapshot_tx.send(self.snapshot()).is_err() {
                            warn!("Snapshot receiver disconnected, stopping coordinator");
                            return;
                        }
                    }
                }
            }
        }
    }
}
