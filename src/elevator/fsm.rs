use log::debug;

use super::car::Car;
use super::control::control_step;
use super::door::{DoorCycle, DoorPhase};
use super::homing::HomingSupervisor;
use super::motion::{MotionRun, MotionStep};
use super::tasks::{TaskKind, TaskSlot};
use crate::config::ElevatorConfig;
use crate::coordinator::CallRegistry;
use crate::shared::{CarId, DoorState, FloorSet, BOTTOM_FLOOR, TOP_FLOOR};

type ControlKey = (FloorSet, FloorSet, FloorSet, bool, DoorState);
type MotionKey = (bool, u8);

/**
 * Runs the behaviours of one car.
 *
 * The car's behaviours are the control step, the motion engine, the door cycle
 * and the homing supervisor. Each one is keyed by the car fields that trigger
 * it; `settle` compares the current fields against the keys and restarts every
 * behaviour whose key changed, repeating until nothing changes. The control step
 * has no waits and runs to completion on the spot. The other behaviours are
 * timer driven and are stepped through `run_task` when their wake time comes.
 *
 * # Fields
 * - `car`:         The car being driven.
 * - `config`:      Timing constants.
 * - `control_key`: Fields the control step last ran with.
 * - `motion`:      Motion run, keyed by `(is_moving, target_floor)`.
 * - `door`:        Door cycle, keyed by `door_state`.
 * - `homing`:      Homing supervisor, started once and never restarted.
 */
pub struct ElevatorFSM {
    car: Car,
    config: ElevatorConfig,
    control_key: Option<ControlKey>,
    motion: TaskSlot<MotionKey, MotionRun>,
    door: TaskSlot<DoorState, DoorCycle>,
    homing: TaskSlot<(), HomingSupervisor>,
}

impl ElevatorFSM {
    pub fn new(id: CarId, home_floor: u8, config: &ElevatorConfig) -> ElevatorFSM {
        ElevatorFSM::with_car(Car::new(id, home_floor), config)
    }

    pub fn with_car(car: Car, config: &ElevatorConfig) -> ElevatorFSM {
        ElevatorFSM {
            car,
            config: config.clone(),
            control_key: None,
            motion: TaskSlot::new(TaskKind::Motion),
            door: TaskSlot::new(TaskKind::Door),
            homing: TaskSlot::new(TaskKind::Homing),
        }
    }

    pub fn car(&self) -> &Car {
        &self.car
    }

    pub(crate) fn car_mut(&mut self) -> &mut Car {
        &mut self.car
    }

    pub fn generation(&self, kind: TaskKind) -> u64 {
        match kind {
            TaskKind::Homing => self.homing.generation(),
            TaskKind::Door => self.door.generation(),
            TaskKind::Motion => self.motion.generation(),
        }
    }

    pub fn door_phase(&self) -> Option<DoorPhase> {
        self.door.run().map(|cycle| cycle.phase())
    }

    pub fn homing_idle_ms(&self) -> u64 {
        self.homing.run().map_or(0, |supervisor| supervisor.idle_ms())
    }

    /// Toggles a cabin request. Ignored when the car already stands open at `floor`.
    pub fn press_cabin_button(&mut self, floor: u8) -> bool {
        if !(BOTTOM_FLOOR..=TOP_FLOOR).contains(&floor) {
            debug!("Car {}: ignoring cabin button for unknown floor {}", self.car.id, floor);
            return false;
        }
        if self.car.is_open_at(floor) {
            debug!("Car {}: already open at floor {}", self.car.id, floor);
            return false;
        }
        self.car.queued_floors.toggle(floor);
        true
    }

    fn control_key(&self) -> ControlKey {
        (
            self.car.queued_floors,
            self.car.assigned_calls_up,
            self.car.assigned_calls_down,
            self.car.is_moving,
            self.car.door_state,
        )
    }

    /// Restarts every behaviour whose trigger fields changed. Returns true if any did.
    pub fn settle(&mut self, now: u64, registry: &mut CallRegistry) -> bool {
        let mut changed = false;
        loop {
            let mut restarted = false;

            let control_key = self.control_key();
            if self.control_key != Some(control_key) {
                self.control_key = Some(control_key);
                control_step(&mut self.car, registry);
                restarted = true;
            }

            if self.homing.is_stale(&()) {
                let supervisor = HomingSupervisor::new();
                self.homing
                    .restart((), Some((supervisor, self.config.homing_poll_ms)), now);
                restarted = true;
            }

            let door_key = self.car.door_state;
            if self.door.is_stale(&door_key) {
                let cycle = DoorCycle::start(&self.car, &self.config);
                self.door.restart(door_key, cycle, now);
                restarted = true;
            }

            let motion_key = (self.car.is_moving, self.car.target_floor);
            let run_missing = self.car.is_moving && self.motion.wake_at().is_none();
            if self.motion.is_stale(&motion_key) || run_missing {
                let run = if self.car.is_moving {
                    Some((MotionRun::start(&self.car), self.config.frame_ms))
                } else {
                    None
                };
                self.motion.restart(motion_key, run, now);
                restarted = true;
            }

            if !restarted {
                return changed;
            }
            changed = true;
        }
    }

    /// Earliest pending wake-up among the timer-driven behaviours.
    pub fn next_wake(&self) -> Option<(u64, TaskKind)> {
        [
            (self.homing.wake_at(), TaskKind::Homing),
            (self.door.wake_at(), TaskKind::Door),
            (self.motion.wake_at(), TaskKind::Motion),
        ]
        .into_iter()
        .filter_map(|(wake_at, kind)| wake_at.map(|at| (at, kind)))
        .min()
    }

    /// Steps the behaviour of `kind` if it is due at `now`.
    pub fn run_task(&mut self, kind: TaskKind, now: u64, registry: &mut CallRegistry) {
        match kind {
            TaskKind::Homing => {
                if let Some(mut due) = self.homing.take_due(now) {
                    due.run.poll(&mut self.car, &self.config);
                    self.homing.resume(due, now, Some(self.config.homing_poll_ms));
                }
            }
            TaskKind::Door => {
                if let Some(mut due) = self.door.take_due(now) {
                    let next_delay = due.run.step(&mut self.car, &self.config, due.elapsed_ms);
                    self.door.resume(due, now, next_delay);
                }
            }
            TaskKind::Motion => {
                if let Some(mut due) = self.motion.take_due(now) {
                    let next_delay = match due.run.step(&mut self.car, registry, &self.config) {
                        MotionStep::Continue => Some(self.config.frame_ms),
                        MotionStep::Stopped => None,
                    };
                    self.motion.resume(due, now, next_delay);
                }
            }
        }
    }
}
