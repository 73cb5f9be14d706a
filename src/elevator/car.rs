use crate::coordinator::CallRegistry;
use crate::shared::{CarId, CarSnapshot, Direction, DoorState, FloorSet};

/**
 * State of one elevator car.
 *
 * # Fields
 * - `id`:                  Position of the car in the dispatch order.
 * - `home_floor`:          Floor the car returns to when idle.
 * - `current_floor`:       Last floor the car was registered at.
 * - `target_floor`:        Floor the current run was started towards.
 * - `direction`:           Travel direction, `Stop` when the car has nothing to do.
 * - `door_state`:          Phase of the door cycle.
 * - `door_progress`:       Door opening, 0 = closed and 1 = fully open.
 * - `absolute_position`:   Position in the shaft, fractional while moving.
 * - `is_moving`:           Whether a motion run is in progress.
 * - `queued_floors`:       Cabin requests.
 * - `assigned_calls_up`:   Up hall calls owned by this car.
 * - `assigned_calls_down`: Down hall calls owned by this car.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: CarId,
    pub home_floor: u8,
    pub current_floor: u8,
    pub target_floor: u8,
    pub direction: Direction,
    pub door_state: DoorState,
    pub door_progress: f64,
    pub absolute_position: f64,
    pub is_moving: bool,
    pub queued_floors: FloorSet,
    pub assigned_calls_up: FloorSet,
    pub assigned_calls_down: FloorSet,
}

impl Car {
    /// A car parked at its home floor with the doors open.
    pub fn new(id: CarId, home_floor: u8) -> Car {
        Car {
            id,
            home_floor,
            current_floor: home_floor,
            target_floor: home_floor,
            direction: Direction::Stop,
            door_state: DoorState::Open,
            door_progress: 1.0,
            absolute_position: home_floor as f64,
            is_moving: false,
            queued_floors: FloorSet::new(),
            assigned_calls_up: FloorSet::new(),
            assigned_calls_down: FloorSet::new(),
        }
    }

    pub fn has_requests(&self) -> bool {
        !self.queued_floors.is_empty()
            || !self.assigned_calls_up.is_empty()
            || !self.assigned_calls_down.is_empty()
    }

    pub fn has_request_at(&self, floor: u8) -> bool {
        self.queued_floors.contains(floor)
            || self.assigned_calls_up.contains(floor)
            || self.assigned_calls_down.contains(floor)
    }

    /// Number of requests of any kind the car is carrying.
    pub fn load(&self) -> usize {
        self.queued_floors.len() + self.assigned_calls_up.len() + self.assigned_calls_down.len()
    }

    /// Stationary at `floor` with the doors fully open.
    pub fn is_open_at(&self, floor: u8) -> bool {
        self.current_floor == floor && !self.is_moving && self.door_state == DoorState::Open
    }

    pub fn assigned_calls(&self, direction: Direction) -> FloorSet {
        match direction {
            Direction::Up => self.assigned_calls_up,
            Direction::Down => self.assigned_calls_down,
            Direction::Stop => FloorSet::new(),
        }
    }

    pub fn assign_call(&mut self, floor: u8, direction: Direction) {
        match direction {
            Direction::Up => self.assigned_calls_up.insert(floor),
            Direction::Down => self.assigned_calls_down.insert(floor),
            Direction::Stop => false,
        };
    }

    /// Removes the assigned call at `floor` for `direction` and turns off its hall button.
    pub fn clear_assigned_call(&mut self, floor: u8, direction: Direction, registry: &mut CallRegistry) {
        let removed = match direction {
            Direction::Up => self.assigned_calls_up.remove(floor),
            Direction::Down => self.assigned_calls_down.remove(floor),
            Direction::Stop => false,
        };
        if removed {
            registry.clear(floor, direction);
        }
    }

    /// Clears every request at `floor`: the cabin request and both directions of hall call.
    pub fn clear_floor_requests(&mut self, floor: u8, registry: &mut CallRegistry) {
        self.clear_assigned_call(floor, Direction::Up, registry);
        self.clear_assigned_call(floor, Direction::Down, registry);
        self.queued_floors.remove(floor);
    }

    pub fn snapshot(&self) -> CarSnapshot {
        CarSnapshot {
            id: self.id,
            current_floor: self.current_floor,
            target_floor: self.target_floor,
            absolute_position: self.absolute_position,
            door_progress: self.door_progress,
            direction: self.direction,
            door_state: self.door_state,
            is_moving: self.is_moving,
            queued_floors: self.queued_floors,
            assigned_calls_up: self.assigned_calls_up,
            assigned_calls_down: self.assigned_calls_down,
        }
    }
}
