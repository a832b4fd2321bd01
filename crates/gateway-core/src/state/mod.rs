//! Order state tracked by a gateway.

pub mod order;

pub use order::{OrderStatus, TrackedOrder};
