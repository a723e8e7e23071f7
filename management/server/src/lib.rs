//! Management API listing the workflow definitions deployed in a process engine.

pub mod aggregator;
pub mod registry;
pub mod server;
