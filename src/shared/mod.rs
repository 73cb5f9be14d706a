pub mod floor_set;
pub mod macros;
pub mod structs;

pub use floor_set::FloorSet;
pub use structs::BuildingSnapshot;
pub use structs::CarId;
pub use structs::CarSnapshot;
pub use structs::Direction;
pub use structs::DoorState;
pub use structs::{BOTTOM_FLOOR, TOP_FLOOR};
