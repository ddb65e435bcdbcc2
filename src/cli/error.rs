// Error handling utilities for consistent error messages and exit codes

use std::process;

use crate::board::Point;
use crate::models::{Stage, TaskId};

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exit with an internal error (exit code >1)
/// Internal errors are for unexpected system failures, database corruption, etc.
pub fn internal_error(message: &str) -> ! {
    eprintln!("Internal error: {}", message);
    process::exit(2);
}

/// Validate that a string is not empty
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a task ID is valid (positive integer)
pub fn validate_task_id(id_str: &str) -> Result<TaskId, String> {
    id_str.trim().parse::<i64>()
        .map_err(|_| format!("Invalid task ID: '{}'. Task ID must be a number.", id_str))
        .and_then(|id| {
            if id > 0 {
                Ok(TaskId(id))
            } else {
                Err(format!("Invalid task ID: {}. Task ID must be positive.", id))
            }
        })
}

/// Validate a stage identifier
pub fn validate_stage(stage_str: &str) -> Result<Stage, String> {
    Stage::from_id(stage_str).ok_or_else(|| {
        let valid: Vec<&str> = Stage::all().iter().map(|s| s.id()).collect();
        format!("Unknown stage: '{}'. Valid stages: {}.", stage_str, valid.join(", "))
    })
}

/// Parse an `x,y` board coordinate
pub fn parse_point(point_str: &str) -> Result<Point, String> {
    let invalid = || format!("Invalid point: '{}'. Expected x,y (e.g. 120,4).", point_str);
    let (x, y) = point_str.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<f64>().map_err(|_| invalid())?;
    let y = y.trim().parse::<f64>().map_err(|_| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }
    Ok(Point::new(x, y))
}
