// Core data models for Taskboard
// These structs represent the domain entities

pub mod task;
pub mod stage;

pub use task::*;
pub use stage::*;
