use std::str::FromStr;
use thiserror::Error;

use crate::shared::{CarId, Direction};

/// Input events accepted by the coordinator thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CabButton { car: CarId, floor: u8 },
    HallButton { floor: u8, direction: Direction },
    Terminate,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("unknown car '{0}', expected A or B")]
    UnknownCar(String),
    #[error("invalid floor '{0}'")]
    InvalidFloor(String),
    #[error("unknown direction '{0}', expected up or down")]
    UnknownDirection(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

fn parse_floor(token: &str) -> Result<u8, ParseCommandError> {
    token
        .parse::<u8>()
        .map_err(|_| ParseCommandError::InvalidFloor(token.to_string()))
}

/**
 * Parses one line of the text input protocol:
 * - `cab <A|B> <floor>`
 * - `hall <floor> <up|down>`
 * - `quit`
 */
impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = tokens.split_first().ok_or(ParseCommandError::Empty)?;

        match name.to_ascii_lowercase().as_str() {
            "cab" => {
                let [car, floor] = args else {
                    return Err(ParseCommandError::Usage("cab <A|B> <floor>"));
                };
                let car = match car.to_ascii_uppercase().as_str() {
                    "A" => CarId::A,
                    "B" => CarId::B,
                    _ => return Err(ParseCommandError::UnknownCar(car.to_string())),
                };
                Ok(Command::CabButton {
                    car,
                    floor: parse_floor(floor)?,
                })
            }
            "hall" => {
                let [floor, direction] = args else {
                    return Err(ParseCommandError::Usage("hall <floor> <up|down>"));
                };
                let direction = match direction.to_ascii_lowercase().as_str() {
                    "up" => Direction::Up,
                    "down" => Direction::Down,
                    _ => return Err(ParseCommandError::UnknownDirection(direction.to_string())),
                };
                Ok(Command::HallButton {
                    floor: parse_floor(floor)?,
                    direction,
                })
            }
            "quit" | "exit" => Ok(Command::Terminate),
            other => Err(ParseCommandError::UnknownCommand(other.to_string())),
        }
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
