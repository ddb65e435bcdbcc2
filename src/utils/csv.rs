// CSV export of the board

use crate::models::Task;
use crate::utils::date::format_created_date;

pub const CSV_HEADER: [&str; 4] = ["Created", "Title", "Description", "Stage"];

/// Quote a field when it holds a separator, quote or line break.
/// Embedded quotes are doubled.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn join_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render tasks as CSV: a header row, then one row per task in the given order
pub fn export_csv<'a, I>(tasks: I) -> String
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut lines = vec![join_row(&CSV_HEADER)];
    for task in tasks {
        lines.push(join_row(&[
            format_created_date(task.id),
            task.title.clone(),
            task.description.clone(),
            task.status.label().to_string(),
        ]));
    }
    lines.join("\n")
}
