use log::debug;

use super::car::Car;
use super::scan;
use crate::coordinator::CallRegistry;
use crate::shared::{Direction, DoorState};

/**
 * Decides what a stationary car does next.
 *
 * Runs whenever the car's request sets, moving flag or door state change.
 * With the doors open and work pending the doors start closing; with the doors
 * closed the car either serves its current floor, starts a run towards the
 * floor picked by the SCAN selector, or goes idle.
 */
pub fn control_step(car: &mut Car, registry: &mut CallRegistry) {
    if car.door_state == DoorState::Closing || car.is_moving {
        return;
    }

    let has_requests = car.has_requests();

    if car.door_state == DoorState::Open && has_requests {
        debug!("Car {}: closing doors at floor {}", car.id, car.current_floor);
        car.door_state = DoorState::Closing;
        return;
    }

    if car.door_state != DoorState::Closed {
        return;
    }

    let current_floor = car.current_floor;
    if car.has_request_at(current_floor) {
        debug!("Car {}: serving floor {} in place", car.id, current_floor);
        car.clear_floor_requests(current_floor, registry);
        car.door_state = DoorState::Opening;
        return;
    }

    match scan::next_floor(car) {
        Some(next_floor) if next_floor != current_floor => {
            car.target_floor = next_floor;
            car.direction = Direction::towards(current_floor, next_floor);
            car.is_moving = true;
            debug!(
                "Car {}: departing floor {} towards {} ({:?})",
                car.id, current_floor, next_floor, car.direction
            );
        }
        _ => {
            if !has_requests {
                car.direction = Direction::Stop;
            }
        }
    }
}
