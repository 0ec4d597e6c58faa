//! Completion provider port and the bounded worker pool that drives it.

pub mod provider;
pub mod worker;

#[cfg(test)]
pub(crate) mod mock;
