pub mod alarms;
pub mod config;
pub mod error;
pub mod etl;
pub mod output;
