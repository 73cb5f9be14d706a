/*
 * SCAN next-floor selection.
 *
 * Hall calls are only serviced in their own direction, so the floors the car
 * may stop at on the way up are its cabin requests plus its up calls, and on
 * the way down its cabin requests plus its down calls.
 */
use super::car::Car;
use crate::shared::Direction;

/// Next floor `car` should travel to, or `None` when it has no requests.
pub fn next_floor(car: &Car) -> Option<u8> {
    if !car.has_requests() {
        return None;
    }

    let current = car.current_floor;
    let up_floors = car.queued_floors.union(car.assigned_calls_up);
    let down_floors = car.queued_floors.union(car.assigned_calls_down);

    match car.direction {
        Direction::Up => up_floors
            .min_above(current)
            .or_else(|| down_floors.max_below(current))
            .or_else(|| up_floors.max_below(current))
            // Down calls above the car: ride to the highest one and sweep down from there
            .or_else(|| down_floors.max_above(current))
            .or(Some(current)),
        Direction::Down => down_floors
            .max_below(current)
            .or_else(|| up_floors.min_above(current))
            .or_else(|| down_floors.min_above(current))
            .or_else(|| up_floors.min_below(current))
            .or(Some(current)),
        Direction::Stop => {
            if car.has_request_at(current) {
                return Some(current);
            }
            match (up_floors.min_above(current), down_floors.max_below(current)) {
                (Some(above), Some(below)) => {
                    if above - current <= current - below {
                        Some(above)
                    } else {
                        Some(below)
                    }
                }
                (Some(above), None) => Some(above),
                (None, Some(below)) => Some(below),
                // Only reachable with a down call above or an up call below and no cabin requests
                (None, None) => car
                    .assigned_calls_up
                    .union(car.assigned_calls_down)
                    .nearest_to(current),
            }
        }
    }
}
