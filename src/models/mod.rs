pub mod day_result;
pub mod department;
pub mod employee;
pub mod holiday;
pub mod justification;
pub mod processed_punch;
pub mod punch;
pub mod punch_kind;
pub mod schedule;
