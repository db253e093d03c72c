//! Types and small runtime helpers shared by the `csr` and `graph` crates.

pub mod error;
pub mod race;
pub mod thread_pool;
pub mod types;

pub use error::{Error, Result};
pub use race::ThreadDataRaceAware;
pub use thread_pool::get_thread_pool;
pub use types::{EdgeT, NodeT, TypeT, WeightT, NOT_PRESENT};
