pub mod free;
pub mod reservation;
pub mod usage;
