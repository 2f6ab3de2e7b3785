//! Repository implementations.
//!
//! - `local`: in-memory implementation used for development, dataset
//!   snapshots and tests
pub mod local;

pub use local::LocalRepository;
