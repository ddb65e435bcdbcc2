//! Taskboard - A kanban task board with drag/drop stage transitions
//!
//! This library provides the core functionality for Taskboard, including:
//! - Data models for tasks and pipeline stages
//! - The owned task board store (create, delete, move, list by stage)
//! - A drag/drop coordinator that turns pointer and touch gestures into moves
//! - Key-value snapshot persistence (SQLite-backed or in-memory)
//! - CLI command parsing and execution
//! - CSV export and date utilities
//!
//! # Example
//!
//! ```
//! use taskboard::board::TaskBoard;
//! use taskboard::models::Stage;
//!
//! let mut board = TaskBoard::new();
//! let task = board.create_task("Write spec", "draft v1").unwrap();
//! board.move_task(task.id, Stage::Done);
//! assert!(board.list_by_stage(Stage::Stories).is_empty());
//! assert_eq!(board.list_by_stage(Stage::Done)[0].id, task.id);
//! ```

pub mod db;
pub mod models;
pub mod repo;
pub mod board;
pub mod cli;
pub mod utils;
