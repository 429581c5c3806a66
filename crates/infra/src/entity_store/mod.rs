//! Entity store contract.
//!
//! The core needs exactly this much from persistence: create/read/update by
//! id (update with a compare-and-set revision check) and list-by-filter.
//! Engine choice is a collaborator concern; the in-memory implementation in
//! this module is the one that ships.

use thiserror::Error;

use procureflow_core::{Entity, ExpectedRevision};
use procureflow_invoicing::Invoice;
use procureflow_inventory::Item;
use procureflow_purchasing::{GoodsReceipt, PurchaseOrder, PurchaseRequisition};
use procureflow_suppliers::Supplier;

mod in_memory;

pub use in_memory::{InMemoryCollection, InMemoryEntityStore};

/// Storage-level error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record id does not exist in this collection.
    #[error("record not found")]
    NotFound,

    /// Insert with an id that is already present.
    #[error("duplicate record id")]
    DuplicateId,

    /// Compare-and-set failed: another writer updated the record first.
    #[error("revision conflict: expected {expected:?}, actual {actual}")]
    RevisionConflict { expected: ExpectedRevision, actual: u64 },

    /// The backing store is unreachable or corrupted.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A record together with its store revision.
///
/// The revision increments on every successful write and is the token a
/// caller hands back as `ExpectedRevision::Exact` to serialize updates on a
/// single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<R> {
    pub record: R,
    pub revision: u64,
}

/// One collection of records of a single entity kind.
///
/// Object-safe so the [`EntityStore`] facade can hand out `&dyn Collection`.
pub trait Collection<R>: Send + Sync
where
    R: Entity + Clone,
{
    fn get(&self, id: &R::Id) -> Result<Option<Versioned<R>>, StoreError>;

    /// Insert a new record at revision 1. Fails on duplicate id.
    fn insert(&self, record: R) -> Result<Versioned<R>, StoreError>;

    /// Replace an existing record, checking the expected revision.
    fn update(&self, record: R, expected: ExpectedRevision) -> Result<Versioned<R>, StoreError>;

    /// All records matching the filter, in unspecified order.
    fn list_by(&self, filter: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError>;
}

/// Convenience helpers shared by all collections.
pub trait CollectionExt<R>: Collection<R>
where
    R: Entity + Clone,
{
    /// Get a record, mapping absence to [`StoreError::NotFound`].
    fn require(&self, id: &R::Id) -> Result<Versioned<R>, StoreError> {
        self.get(id)?.ok_or(StoreError::NotFound)
    }

    fn list_all(&self) -> Result<Vec<R>, StoreError> {
        self.list_by(&|_| true)
    }
}

impl<R, C> CollectionExt<R> for C
where
    R: Entity + Clone,
    C: Collection<R> + ?Sized,
{
}

/// Facade over the six procurement collections.
///
/// The lifecycle controller is generic over this trait, so tests can swap in
/// alternative stores without touching domain code.
pub trait EntityStore: Send + Sync {
    fn suppliers(&self) -> &dyn Collection<Supplier>;
    fn items(&self) -> &dyn Collection<Item>;
    fn requisitions(&self) -> &dyn Collection<PurchaseRequisition>;
    fn orders(&self) -> &dyn Collection<PurchaseOrder>;
    fn receipts(&self) -> &dyn Collection<GoodsReceipt>;
    fn invoices(&self) -> &dyn Collection<Invoice>;
}

impl<S: EntityStore + ?Sized> EntityStore for std::sync::Arc<S> {
    fn suppliers(&self) -> &dyn Collection<Supplier> {
        (**self).suppliers()
    }

    fn items(&self) -> &dyn Collection<Item> {
        (**self).items()
    }

    fn requisitions(&self) -> &dyn Collection<PurchaseRequisition> {
        (**self).requisitions()
    }

    fn orders(&self) -> &dyn Collection<PurchaseOrder> {
        (**self).orders()
    }

    fn receipts(&self) -> &dyn Collection<GoodsReceipt> {
        (**self).receipts()
    }

    fn invoices(&self) -> &dyn Collection<Invoice> {
        (**self).invoices()
    }
}
