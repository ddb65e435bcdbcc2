pub mod date;
pub mod csv;

pub use date::*;
pub use csv::*;
