pub mod bars;
pub mod chart;
pub mod config;
pub mod interval;
pub mod license;
pub mod occupancy;
pub mod record;
pub mod report;
pub mod window;
