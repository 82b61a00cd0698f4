//! Homework response checks and status → message formatting.

mod check;
mod verdict;

pub use check::{Homework, check_response};
pub use verdict::parse_status;
