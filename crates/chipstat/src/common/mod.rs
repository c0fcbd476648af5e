pub mod cli;
pub mod error;
pub mod format;
pub mod inventory;
pub mod manager;
pub mod parser;
pub mod setup;
pub mod utils;
