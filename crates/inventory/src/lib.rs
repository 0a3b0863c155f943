//! Vendor inventory lookups.
//!
//! This crate provides:
//! - `AvailabilityCheck` trait for pluggable availability sources
//! - `SteamInventoryClient`, the Steam physical goods service implementation

pub mod steam;
pub mod traits;

pub use steam::SteamInventoryClient;
pub use traits::{AvailabilityCheck, InventoryError};
