/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

use super::FloorSet;

/***************************************/
/*             Constants               */
/***************************************/
pub const BOTTOM_FLOOR: u8 = 1;
pub const TOP_FLOOR: u8 = 6;

/***************************************/
/*       Public data structures        */
/***************************************/
/// Travel direction of a car. `Stop` means the car has no direction of travel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stop,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match *self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Stop => Direction::Stop,
        }
    }

    /// Direction that leads from `from` to `to`, `Stop` when they are equal.
    pub fn towards(from: u8, to: u8) -> Direction {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::Stop
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// The two cars of the bank, in dispatch order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CarId {
    A,
    B,
}

impl CarId {
    pub const ALL: [CarId; 2] = [CarId::A, CarId::B];

    pub fn index(&self) -> usize {
        match *self {
            CarId::A => 0,
            CarId::B => 1,
        }
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CarId::A => write!(f, "A"),
            CarId::B => write!(f, "B"),
        }
    }
}

/// Read-only view of one car, as consumed by the view layer.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CarSnapshot {
    pub id: CarId,
    #[serde(rename = "currentFloor")]
    pub current_floor: u8,
    #[serde(rename = "targetFloor")]
    pub target_floor: u8,
    #[serde(rename = "absolutePosition")]
    pub absolute_position: f64,
    #[serde(rename = "doorProgress")]
    pub door_progress: f64,
    pub direction: Direction,
    #[serde(rename = "doorState")]
    pub door_state: DoorState,
    #[serde(rename = "isMoving")]
    pub is_moving: bool,
    #[serde(rename = "queuedFloors")]
    pub queued_floors: FloorSet,
    #[serde(rename = "assignedCallsUp")]
    pub assigned_calls_up: FloorSet,
    #[serde(rename = "assignedCallsDown")]
    pub assigned_calls_down: FloorSet,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BuildingSnapshot {
    #[serde(rename = "timeMs")]
    pub time_ms: u64,
    pub cars: Vec<CarSnapshot>,
    #[serde(rename = "callButtonsUp")]
    pub call_buttons_up: FloorSet,
    #[serde(rename = "callButtonsDown")]
    pub call_buttons_down: FloorSet,
}
