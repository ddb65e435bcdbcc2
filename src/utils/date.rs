// Date formatting for task timestamps

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::models::TaskId;

/// Local calendar date (`%Y-%m-%d`) of a task's creation time
pub fn format_created_date(id: TaskId) -> String {
    match id.created_at() {
        Some(utc) => to_local(utc).format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

fn to_local(utc: DateTime<Utc>) -> DateTime<Local> {
    Local.from_utc_datetime(&utc.naive_utc())
}
