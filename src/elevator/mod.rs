pub mod car;
pub mod control;
pub mod door;
pub mod fsm;
pub mod homing;
pub mod motion;
pub mod scan;
pub mod tasks;

pub use car::Car;
pub use fsm::ElevatorFSM;
pub use tasks::TaskKind;
