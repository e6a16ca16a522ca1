//! Property index layer
//!
//! Point lookups over registered (label, property) pairs, kept synchronous
//! with every store mutation.

mod manager;
mod property_index;

pub use manager::{IndexManager, PropertyIndexKey};
pub use property_index::PropertyIndex;
