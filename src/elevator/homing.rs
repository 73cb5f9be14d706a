use log::info;

use super::car::Car;
use crate::config::ElevatorConfig;
use crate::shared::{Direction, DoorState};

/// Sends an idle car back to its home floor once it has idled away from home long enough.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomingSupervisor {
    idle_ms: u64,
}

impl HomingSupervisor {
    pub fn new() -> HomingSupervisor {
        HomingSupervisor::default()
    }

    pub fn idle_ms(&self) -> u64 {
        self.idle_ms
    }

    fn is_eligible(car: &Car) -> bool {
        !car.has_requests()
            && !car.is_moving
            && car.door_state == DoorState::Closed
            && car.current_floor != car.home_floor
    }

    /// One poll. Returns true when the car was sent home.
    pub fn poll(&mut self, car: &mut Car, config: &ElevatorConfig) -> bool {
        if !Self::is_eligible(car) {
            self.idle_ms = 0;
            return false;
        }

        self.idle_ms += config.homing_poll_ms;
        if self.idle_ms < config.homing_delay_ms {
            return false;
        }

        info!(
            "Car {}: idle at floor {} for {} ms, returning to floor {}",
            car.id, car.current_floor, self.idle_ms, car.home_floor
        );
        car.queued_floors.insert(car.home_floor);
        car.target_floor = car.home_floor;
        car.direction = Direction::towards(car.current_floor, car.home_floor);
        car.is_moving = true;
        self.idle_ms = 0;
        true
    }
}
