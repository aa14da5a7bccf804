pub mod diff;
pub mod feeds;
pub mod sync;
