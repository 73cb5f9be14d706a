use log::debug;

use super::car::Car;
use crate::config::ElevatorConfig;
use crate::coordinator::CallRegistry;
use crate::shared::{Direction, DoorState, BOTTOM_FLOOR, TOP_FLOOR};

/// Result of advancing a motion run by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStep {
    Continue,
    Stopped,
}

/**
 * One run of the motion engine.
 *
 * A run lasts from the moment the car starts moving until it comes to rest.
 * Every frame moves the car by a fixed distance and, when the car is within the
 * arrival tolerance of a floor, decides whether to stop there, carry on, or
 * turn around.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct MotionRun {
    going_up: bool,
}

impl MotionRun {
    pub fn start(car: &Car) -> MotionRun {
        MotionRun {
            going_up: car.direction == Direction::Up,
        }
    }

    pub fn going_up(&self) -> bool {
        self.going_up
    }

    fn travel_direction(&self) -> Direction {
        if self.going_up {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn step(
        &mut self,
        car: &mut Car,
        registry: &mut CallRegistry,
        config: &ElevatorConfig,
    ) -> MotionStep {
        let signed_step = if self.going_up {
            config.step_distance()
        } else {
            -config.step_distance()
        };
        car.absolute_position = (car.absolute_position + signed_step)
            .clamp(BOTTOM_FLOOR as f64, TOP_FLOOR as f64);

        let nearest_floor = car.absolute_position.round();
        if (car.absolute_position - nearest_floor).abs() >= config.arrival_tolerance {
            return MotionStep::Continue;
        }

        self.arrive(nearest_floor as u8, car, registry)
    }

    fn arrive(&mut self, floor: u8, car: &mut Car, registry: &mut CallRegistry) -> MotionStep {
        car.current_floor = floor;

        // Boundary check
        if floor <= BOTTOM_FLOOR && !self.going_up {
            car.absolute_position = BOTTOM_FLOOR as f64;
            self.going_up = true;
            car.direction = Direction::Up;
        } else if floor >= TOP_FLOOR && self.going_up {
            car.absolute_position = TOP_FLOOR as f64;
            self.going_up = false;
            car.direction = Direction::Down;
        }

        if self.should_stop_at(car, floor) {
            car.absolute_position = floor as f64;
            car.queued_floors.remove(floor);
            car.clear_assigned_call(floor, self.travel_direction(), registry);
            debug!("Car {}: stopping at floor {}", car.id, floor);
            return Self::come_to_rest(car);
        }

        if self.has_requests_ahead(car, floor) {
            return MotionStep::Continue;
        }

        let reverse_call_here = car
            .assigned_calls(self.travel_direction().opposite())
            .contains(floor);
        if reverse_call_here {
            car.absolute_position = floor as f64;
            self.going_up = !self.going_up;
            car.direction = self.travel_direction();
            car.clear_floor_requests(floor, registry);
            debug!("Car {}: turning around at floor {}", car.id, floor);
            return Self::come_to_rest(car);
        }

        if self.has_requests_behind(car, floor) {
            self.going_up = !self.going_up;
            car.direction = self.travel_direction();
            debug!("Car {}: reversing at floor {} ({:?})", car.id, floor, car.direction);
            return MotionStep::Continue;
        }

        // Nothing left anywhere
        car.absolute_position = floor as f64;
        car.direction = Direction::Stop;
        let open_doors = floor == car.home_floor;
        car.is_moving = false;
        if open_doors {
            car.door_state = DoorState::Opening;
        }
        debug!("Car {}: idle at floor {}", car.id, floor);
        MotionStep::Stopped
    }

    /// Ends the run with the doors opening at the current floor.
    fn come_to_rest(car: &mut Car) -> MotionStep {
        if !car.has_requests() {
            car.direction = Direction::Stop;
        }
        car.door_state = DoorState::Opening;
        car.is_moving = false;
        MotionStep::Stopped
    }

    /// A cabin request, or a hall call in the direction of travel.
    fn should_stop_at(&self, car: &Car, floor: u8) -> bool {
        car.queued_floors.contains(floor)
            || car.assigned_calls(self.travel_direction()).contains(floor)
    }

    fn has_requests_ahead(&self, car: &Car, floor: u8) -> bool {
        let all_requests = car
            .queued_floors
            .union(car.assigned_calls_up)
            .union(car.assigned_calls_down);
        if self.going_up {
            all_requests.any_above(floor)
        } else {
            all_requests.any_below(floor)
        }
    }

    fn has_requests_behind(&self, car: &Car, floor: u8) -> bool {
        if self.going_up {
            car.queued_floors
                .union(car.assigned_calls_down)
                .any_below(floor)
        } else {
            car.queued_floors
                .union(car.assigned_calls_up)
                .any_above(floor)
        }
    }
}
