pub mod account;
pub mod active_set;
pub mod aligned;
pub mod query;
pub mod settings;
pub mod snapshot;
