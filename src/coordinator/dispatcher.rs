/*
 * Hall call dispatcher.
 *
 * Every car is scored with a synthetic ETA cost for the call and the cheapest
 * car takes it. The cost is built from:
 * - 10 per floor of distance,
 * - 60 when the car is moving away from the call, or 30 when it is moving
 *   towards it but in the opposite direction of the call,
 * - 5 per request the car is already carrying,
 * - a 5 bonus for a parked car with its doors closed.
 * A car standing open at the call floor costs nothing.
 */
use log::info;

use super::registry::CallRegistry;
use crate::elevator::Car;
use crate::shared::{CarId, Direction, DoorState};

const FLOOR_COST: i32 = 10;
const WRONG_WAY_PENALTY: i32 = 60;
const DIRECTION_MISMATCH_PENALTY: i32 = 30;
const LOAD_PENALTY: i32 = 5;
const IDLE_READY_BONUS: i32 = 5;

pub fn calculate_eta(car: &Car, target_floor: u8, call_direction: Direction) -> i32 {
    let current_floor = car.current_floor;
    let distance = (target_floor as i32 - current_floor as i32).abs();
    let mut cost = distance * FLOOR_COST;

    if car.is_moving {
        let moving_toward = match car.direction {
            Direction::Up => target_floor > current_floor,
            Direction::Down => target_floor < current_floor,
            Direction::Stop => false,
        };
        if !moving_toward {
            cost += WRONG_WAY_PENALTY;
        } else if car.direction != call_direction {
            cost += DIRECTION_MISMATCH_PENALTY;
        }
    }

    cost += car.load() as i32 * LOAD_PENALTY;

    if !car.is_moving && car.door_state == DoorState::Closed {
        cost -= IDLE_READY_BONUS;
    }

    if car.is_open_at(target_floor) {
        cost = 0;
    }

    cost
}

/// Cheapest car for the call; on equal cost the car listed first wins.
pub fn choose_car<'a, I>(floor: u8, direction: Direction, cars: I) -> Option<CarId>
where
    I: IntoIterator<Item = &'a Car>,
{
    let mut best: Option<(i32, CarId)> = None;
    for car in cars {
        let cost = calculate_eta(car, floor, direction);
        match best {
            Some((best_cost, _)) if best_cost <= cost => {}
            _ => best = Some((cost, car.id)),
        }
    }
    best.map(|(_, id)| id)
}

/// Assigns the hall call to the cheapest car and lights its button.
pub fn dispatch_call(
    floor: u8,
    direction: Direction,
    cars: &mut [&mut Car],
    registry: &mut CallRegistry,
) -> Option<CarId> {
    let chosen = choose_car(floor, direction, cars.iter().map(|car| &**car))?;

    if let Some(car) = cars.iter_mut().find(|car| car.id == chosen) {
        car.assign_call(floor, direction);
        registry.light(floor, direction);
        info!("Hall call {} {:?} dispatched to car {}", floor, direction, chosen);
    }
    Some(chosen)
}
