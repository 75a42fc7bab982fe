//! Alarm ETL into the two dashboard projections.
//!
//! Both pipelines are pure, single-pass transforms over already-fetched
//! records: empty inputs and unmatched filters yield empty outputs rather
//! than errors.

pub mod timeseries;
pub mod worldmap;
