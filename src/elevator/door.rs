use log::debug;

use super::car::Car;
use crate::config::ElevatorConfig;
use crate::shared::{Direction, DoorState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoorPhase {
    /// Door panels moving, `start` is the progress the movement began from.
    Animating { start: f64, elapsed_ms: u64 },
    /// Doors fully open, waiting out the dwell time.
    Dwelling,
}

/**
 * Door cycle for one opening or closing of the doors.
 *
 * Opening eases the doors out to fully open, dwells, then decides whether to
 * close again or stay open. Closing eases the doors shut and leaves them closed.
 * The cycle never changes `door_state` except at its very end, so the state stays
 * `Opening` for the whole of the animation and the dwell.
 *
 * `step` is called each time the previously returned delay has elapsed and
 * returns the delay until the next call, or `None` when the cycle is over.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct DoorCycle {
    opening: bool,
    phase: DoorPhase,
}

impl DoorCycle {
    /// Starts a cycle for the car's current door state. Returns the cycle and the
    /// delay until its first step, or `None` for states that do not animate.
    pub fn start(car: &Car, config: &ElevatorConfig) -> Option<(DoorCycle, u64)> {
        let opening = match car.door_state {
            DoorState::Opening => true,
            DoorState::Closing => false,
            DoorState::Open | DoorState::Closed => return None,
        };
        let cycle = DoorCycle {
            opening,
            phase: DoorPhase::Animating {
                start: car.door_progress,
                elapsed_ms: 0,
            },
        };
        let delay = cycle.next_frame(0, config);
        Some((cycle, delay))
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }

    fn next_frame(&self, elapsed_ms: u64, config: &ElevatorConfig) -> u64 {
        config
            .frame_ms
            .min(config.door_transition_ms.saturating_sub(elapsed_ms))
            .max(1)
    }

    pub fn step(&mut self, car: &mut Car, config: &ElevatorConfig, dt_ms: u64) -> Option<u64> {
        match self.phase {
            DoorPhase::Animating { start, elapsed_ms } => {
                let elapsed_ms = (elapsed_ms + dt_ms).min(config.door_transition_ms);
                let finished = elapsed_ms >= config.door_transition_ms;
                let p = if config.door_transition_ms == 0 {
                    1.0
                } else {
                    elapsed_ms as f64 / config.door_transition_ms as f64
                };

                if self.opening {
                    let eased = 1.0 - (1.0 - p) * (1.0 - p);
                    car.door_progress = (start + (1.0 - start) * eased).clamp(0.0, 1.0);
                } else {
                    let eased = p * p;
                    car.door_progress = (start * (1.0 - eased)).clamp(0.0, 1.0);
                }

                if !finished {
                    self.phase = DoorPhase::Animating { start, elapsed_ms };
                    return Some(self.next_frame(elapsed_ms, config));
                }

                if self.opening {
                    car.door_progress = 1.0;
                    self.phase = DoorPhase::Dwelling;
                    Some(config.door_dwell_ms)
                } else {
                    car.door_progress = 0.0;
                    car.door_state = DoorState::Closed;
                    debug!("Car {}: doors closed at floor {}", car.id, car.current_floor);
                    None
                }
            }
            DoorPhase::Dwelling => {
                if car.has_requests() || car.current_floor != car.home_floor {
                    car.door_state = DoorState::Closing;
                } else {
                    car.direction = Direction::Stop;
                    car.door_state = DoorState::Open;
                    debug!("Car {}: holding doors open at home", car.id);
                }
                None
            }
        }
    }
}
