//! Database Models

// Serde helpers
pub mod serde_helpers;

// Actors
pub mod supplier;
pub mod vendor;

// Catalog
pub mod item;

// Orders and reviews
pub mod order;
pub mod review;

// Re-exports
pub use item::Item;
pub use order::{Order, OrderLine, OrderListEntry};
pub use review::{Review, ReviewListEntry};
pub use supplier::Supplier;
pub use vendor::Vendor;
