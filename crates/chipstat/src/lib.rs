pub mod client;
pub mod common;
pub mod usage;

#[cfg(test)]
pub(crate) mod tests;

pub type Error = crate::common::error::ChipstatError;
pub type Result<T> = std::result::Result<T, Error>;

pub type Map<K, V> = std::collections::HashMap<K, V>;
pub type Set<T> = std::collections::HashSet<T>;

pub const CHIPSTAT_VERSION: &str = {
    match option_env!("CHIPSTAT_BUILD_VERSION") {
        Some(version) => version,
        None => const_format::concatcp!(env!("CARGO_PKG_VERSION"), "-dev"),
    }
};
