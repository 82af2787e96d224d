pub mod traits;

// Snapshot source implementations
pub mod arena;
pub mod poller;
