pub mod calculator;
pub mod calendar;
pub mod classifier;
pub mod department;
pub mod import;
pub mod justification;
pub mod log;
pub mod punch;
pub mod reconcile;
pub mod store;
