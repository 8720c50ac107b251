pub mod calendar;
pub mod expected;
pub mod intervals;
pub mod surplus;
