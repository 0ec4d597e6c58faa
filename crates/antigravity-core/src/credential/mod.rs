//! API credential pool with round-robin failover.

pub mod pool;
