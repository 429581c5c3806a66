//! `procureflow-infra` — storage contract, numbering, and the document
//! lifecycle controller.

pub mod entity_store;
pub mod lifecycle;
pub mod numbering;

pub use entity_store::{
    Collection, CollectionExt, EntityStore, InMemoryEntityStore, StoreError, Versioned,
};
pub use lifecycle::{DocumentLifecycle, LifecycleError};
pub use numbering::{DocumentKind, InMemoryNumberSequence, NumberSequence};
