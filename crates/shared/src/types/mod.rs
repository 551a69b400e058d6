//! Common types used across the application.

pub mod enums;
pub mod id;
pub mod pagination;

pub use enums::{BottleType, MovementType, StockCategory, StockClient, StockSite};
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
