/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub elevator: ElevatorConfig,
    pub runtime: RuntimeConfig,
}

/// Timing constants of the car state machines, all in simulated milliseconds.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub frame_ms: u64,
    pub speed_floors_per_sec: f64,
    pub arrival_tolerance: f64,
    pub door_transition_ms: u64,
    pub door_dwell_ms: u64,
    pub homing_poll_ms: u64,
    pub homing_delay_ms: u64,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub tick_ms: u64,
    pub snapshot_interval_ms: u64,
    pub log_level: String,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        ElevatorConfig {
            frame_ms: 16,
            speed_floors_per_sec: 0.5,
            arrival_tolerance: 0.01,
            door_transition_ms: 500,
            door_dwell_ms: 2000,
            homing_poll_ms: 100,
            homing_delay_ms: 4000,
        }
    }
}

impl ElevatorConfig {
    /// Distance covered by a car during one motion frame.
    pub fn step_distance(&self) -> f64 {
        self.speed_floors_per_sec * (self.frame_ms as f64 / 1000.0)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_ms == 0 || self.homing_poll_ms == 0 {
            return Err(ConfigError::Invalid(
                "frame_ms and homing_poll_ms must be positive".to_string(),
            ));
        }
        if self.speed_floors_per_sec <= 0.0 {
            return Err(ConfigError::Invalid(
                "speed_floors_per_sec must be positive".to_string(),
            ));
        }
        // A step longer than twice the tolerance could jump over a floor unnoticed
        if self.step_distance() >= 2.0 * self.arrival_tolerance + 1e-9 {
            return Err(ConfigError::Invalid(format!(
                "a motion step of {} floors skips the arrival window of {}",
                self.step_distance(),
                self.arrival_tolerance
            )));
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            tick_ms: 16,
            snapshot_interval_ms: 250,
            log_level: "info".to_string(),
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.elevator.validate()?;
    if config.runtime.tick_ms == 0 {
        return Err(ConfigError::Invalid("tick_ms must be positive".to_string()));
    }
    Ok(config)
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&config_str)
}

/***************************************/
/*             Unit tests              */
/***************************************/
