pub mod config;
pub mod db;
pub mod department;
pub mod employee;
pub mod holiday;
pub mod import;
pub mod init;
pub mod justify;
pub mod log;
pub mod punch;
pub mod reconcile;
pub mod schedule;
