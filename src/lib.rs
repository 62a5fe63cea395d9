pub mod error;
pub mod types;
pub mod sampler;
pub mod exchange;
pub mod storage;
pub mod poller;
pub mod config;
pub mod observability;
