//! Kanban board: the owned task store and the drag/drop coordinator that
//! drives it from gestures.

pub mod store;
pub mod drag;

pub use store::*;
pub use drag::*;
