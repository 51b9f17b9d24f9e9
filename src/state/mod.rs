pub mod builder;
pub mod refresher;
pub mod snapshot;
