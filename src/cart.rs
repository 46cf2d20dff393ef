//! Cart state and the synchronization protocol against orders and line items.

pub mod model;
pub mod sync;

pub use model::*;
pub use sync::*;
