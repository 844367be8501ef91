pub mod catalog;
pub mod content;
pub mod snapshots;

pub use catalog::{CatalogStore, ModelRecord, RefreshStats};
pub use content::{ContentEntry, ProviderContentStore};
pub use snapshots::{Snapshot, SnapshotMeta, SnapshotStore};
