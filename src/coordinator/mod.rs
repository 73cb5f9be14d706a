pub mod command;
pub mod coordinator;
pub mod coordinator_tests;
pub mod dispatcher;
pub mod registry;

pub use command::Command;
pub use coordinator::Coordinator;
pub use registry::CallRegistry;
