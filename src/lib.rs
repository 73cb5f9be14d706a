/* Modules */
pub mod config;
pub mod coordinator;
pub mod elevator;
pub mod shared;

/* Re-exports */
pub use config::Config;
pub use coordinator::{CallRegistry, Command, Coordinator};
pub use elevator::{Car, ElevatorFSM};
pub use shared::{BuildingSnapshot, CarId, CarSnapshot, Direction, DoorState, FloorSet};
