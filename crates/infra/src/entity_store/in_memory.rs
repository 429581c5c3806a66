use std::collections::HashMap;
use std::sync::RwLock;

use procureflow_core::{Entity, ExpectedRevision};
use procureflow_invoicing::Invoice;
use procureflow_inventory::Item;
use procureflow_purchasing::{GoodsReceipt, PurchaseOrder, PurchaseRequisition};
use procureflow_suppliers::Supplier;

use super::{Collection, EntityStore, StoreError, Versioned};

/// In-memory record collection.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryCollection<R: Entity> {
    records: RwLock<HashMap<R::Id, Versioned<R>>>,
}

impl<R: Entity> Default for InMemoryCollection<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<R: Entity> InMemoryCollection<R> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R> Collection<R> for InMemoryCollection<R>
where
    R: Entity + Clone + Send + Sync,
{
    fn get(&self, id: &R::Id) -> Result<Option<Versioned<R>>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(records.get(id).cloned())
    }

    fn insert(&self, record: R) -> Result<Versioned<R>, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        if records.contains_key(&record.id()) {
            return Err(StoreError::DuplicateId);
        }

        let stored = Versioned {
            record,
            revision: 1,
        };
        records.insert(stored.record.id(), stored.clone());
        Ok(stored)
    }

    fn update(&self, record: R, expected: ExpectedRevision) -> Result<Versioned<R>, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let current = records.get(&record.id()).ok_or(StoreError::NotFound)?;
        if !expected.matches(current.revision) {
            return Err(StoreError::RevisionConflict {
                expected,
                actual: current.revision,
            });
        }

        let stored = Versioned {
            record,
            revision: current.revision + 1,
        };
        records.insert(stored.record.id(), stored.clone());
        Ok(stored)
    }

    fn list_by(&self, filter: &dyn Fn(&R) -> bool) -> Result<Vec<R>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(records
            .values()
            .filter(|v| filter(&v.record))
            .map(|v| v.record.clone())
            .collect())
    }
}

/// In-memory entity store over all six procurement collections.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    suppliers: InMemoryCollection<Supplier>,
    items: InMemoryCollection<Item>,
    requisitions: InMemoryCollection<PurchaseRequisition>,
    orders: InMemoryCollection<PurchaseOrder>,
    receipts: InMemoryCollection<GoodsReceipt>,
    invoices: InMemoryCollection<Invoice>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for InMemoryEntityStore {
    fn suppliers(&self) -> &dyn Collection<Supplier> {
        &self.suppliers
    }

    fn items(&self) -> &dyn Collection<Item> {
        &self.items
    }

    fn requisitions(&self) -> &dyn Collection<PurchaseRequisition> {
        &self.requisitions
    }

    fn orders(&self) -> &dyn Collection<PurchaseOrder> {
        &self.orders
    }

    fn receipts(&self) -> &dyn Collection<GoodsReceipt> {
        &self.receipts
    }

    fn invoices(&self) -> &dyn Collection<Invoice> {
        &self.invoices
    }
}
