//! Service wiring: store, numbering, and the document lifecycle controller,
//! plus master-data writes and the read paths the routes serve from.

use std::sync::Arc;

use chrono::Utc;

use procureflow_core::{Entity, EntityId, ExpectedRevision, Money};
use procureflow_infra::{
    Collection, CollectionExt, DocumentLifecycle, EntityStore, InMemoryEntityStore,
    InMemoryNumberSequence, LifecycleError,
};
use procureflow_inventory::{Item, ItemId};
use procureflow_invoicing::{Invoice, InvoiceId, InvoiceStatus};
use procureflow_purchasing::{
    ApprovalPolicy, GoodsReceipt, OrderId, OrderStatus, PurchaseOrder, PurchaseRequisition,
    ReceiptId, RequisitionId, RequisitionStatus,
};
use procureflow_suppliers::{Supplier, SupplierId};

use crate::app::dto;

pub type Lifecycle = DocumentLifecycle<Arc<InMemoryEntityStore>, Arc<InMemoryNumberSequence>>;

pub struct AppServices {
    store: Arc<InMemoryEntityStore>,
    lifecycle: Lifecycle,
}

pub fn build_services(policy: ApprovalPolicy) -> AppServices {
    let store = Arc::new(InMemoryEntityStore::new());
    let numbering = Arc::new(InMemoryNumberSequence::new());
    let lifecycle = DocumentLifecycle::new(Arc::clone(&store), numbering, policy);
    AppServices { store, lifecycle }
}

impl AppServices {
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    // --- supplier master data ---

    pub fn register_supplier(
        &self,
        body: dto::RegisterSupplierRequest,
    ) -> Result<Supplier, LifecycleError> {
        let supplier = Supplier::register(
            SupplierId::new(EntityId::new()),
            body.name,
            body.contact.unwrap_or_default(),
            body.tax_id,
            Utc::now(),
        )?;
        Ok(self.store.suppliers().insert(supplier)?.record)
    }

    pub fn update_supplier(
        &self,
        id: SupplierId,
        body: dto::UpdateSupplierRequest,
    ) -> Result<Supplier, LifecycleError> {
        let mut current = self.store.suppliers().require(&id)?;
        current
            .record
            .update_details(body.name, body.contact, body.tax_id)?;
        let stored = self
            .store
            .suppliers()
            .update(current.record, ExpectedRevision::Exact(current.revision))?;
        Ok(stored.record)
    }

    pub fn deactivate_supplier(&self, id: SupplierId) -> Result<Supplier, LifecycleError> {
        let mut current = self.store.suppliers().require(&id)?;
        current.record.deactivate();
        let stored = self
            .store
            .suppliers()
            .update(current.record, ExpectedRevision::Exact(current.revision))?;
        Ok(stored.record)
    }

    pub fn suppliers_get(&self, id: SupplierId) -> Result<Supplier, LifecycleError> {
        Ok(self.store.suppliers().require(&id)?.record)
    }

    pub fn suppliers_list(&self) -> Result<Vec<Supplier>, LifecycleError> {
        let mut suppliers = self.store.suppliers().list_all()?;
        sort_newest_first(&mut suppliers);
        Ok(suppliers)
    }

    // --- inventory master data ---

    pub fn create_item(&self, body: dto::CreateItemRequest) -> Result<Item, LifecycleError> {
        // SKUs are a uniqueness key across the whole catalog.
        let taken = self
            .store
            .items()
            .list_by(&|i: &Item| i.sku() == body.sku)?;
        if !taken.is_empty() {
            return Err(LifecycleError::Validation(format!(
                "sku {} is already in use",
                body.sku
            )));
        }

        let item = Item::create(
            ItemId::new(EntityId::new()),
            body.sku,
            body.name,
            body.category,
            body.unit,
            Money::from_minor_units(body.unit_price),
            body.quantity,
            body.reorder_level,
            Utc::now(),
        )?;
        Ok(self.store.items().insert(item)?.record)
    }

    pub fn update_item(
        &self,
        id: ItemId,
        body: dto::UpdateItemRequest,
    ) -> Result<Item, LifecycleError> {
        let mut current = self.store.items().require(&id)?;
        current.record.update_details(
            body.name,
            body.category,
            body.unit_price.map(Money::from_minor_units),
            body.reorder_level,
        )?;
        let stored = self
            .store
            .items()
            .update(current.record, ExpectedRevision::Exact(current.revision))?;
        Ok(stored.record)
    }

    pub fn items_get(&self, id: ItemId) -> Result<Item, LifecycleError> {
        Ok(self.store.items().require(&id)?.record)
    }

    pub fn items_list(&self) -> Result<Vec<Item>, LifecycleError> {
        let mut items = self.store.items().list_all()?;
        sort_newest_first(&mut items);
        Ok(items)
    }

    pub fn items_low_stock(&self) -> Result<Vec<Item>, LifecycleError> {
        let mut items = self.store.items().list_by(&Item::is_low_stock)?;
        sort_newest_first(&mut items);
        Ok(items)
    }

    // --- document read paths ---

    pub fn requisitions_get(&self, id: RequisitionId) -> Result<PurchaseRequisition, LifecycleError> {
        Ok(self.store.requisitions().require(&id)?.record)
    }

    pub fn requisitions_list(&self) -> Result<Vec<PurchaseRequisition>, LifecycleError> {
        let mut requisitions = self.store.requisitions().list_all()?;
        sort_newest_first(&mut requisitions);
        Ok(requisitions)
    }

    pub fn orders_get(&self, id: OrderId) -> Result<PurchaseOrder, LifecycleError> {
        Ok(self.store.orders().require(&id)?.record)
    }

    pub fn orders_list(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<PurchaseOrder>, LifecycleError> {
        let mut orders = match status {
            Some(status) => self
                .store
                .orders()
                .list_by(&|o: &PurchaseOrder| o.status() == status)?,
            None => self.store.orders().list_all()?,
        };
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    pub fn receipts_get(&self, id: ReceiptId) -> Result<GoodsReceipt, LifecycleError> {
        Ok(self.store.receipts().require(&id)?.record)
    }

    pub fn receipts_list(&self) -> Result<Vec<GoodsReceipt>, LifecycleError> {
        let mut receipts = self.store.receipts().list_all()?;
        sort_newest_first(&mut receipts);
        Ok(receipts)
    }

    pub fn receipts_for_order(&self, order_id: OrderId) -> Result<Vec<GoodsReceipt>, LifecycleError> {
        let mut receipts = self
            .store
            .receipts()
            .list_by(&|r: &GoodsReceipt| r.order_id() == order_id)?;
        sort_newest_first(&mut receipts);
        Ok(receipts)
    }

    pub fn invoices_get(&self, id: InvoiceId) -> Result<Invoice, LifecycleError> {
        Ok(self.store.invoices().require(&id)?.record)
    }

    pub fn invoices_list(&self) -> Result<Vec<Invoice>, LifecycleError> {
        let mut invoices = self.store.invoices().list_all()?;
        sort_newest_first(&mut invoices);
        Ok(invoices)
    }

    pub fn invoices_for_order(&self, order_id: OrderId) -> Result<Vec<Invoice>, LifecycleError> {
        let mut invoices = self
            .store
            .invoices()
            .list_by(&|i: &Invoice| i.order_id() == Some(order_id))?;
        sort_newest_first(&mut invoices);
        Ok(invoices)
    }

    // --- dashboard ---

    pub fn dashboard_stats(&self) -> Result<dto::DashboardStats, LifecycleError> {
        let suppliers = self.store.suppliers().list_all()?;
        let items = self.store.items().list_all()?;
        let requisitions = self.store.requisitions().list_all()?;
        let orders = self.store.orders().list_all()?;
        let invoices = self.store.invoices().list_all()?;

        let inventory_value = items.iter().fold(0u64, |acc, item| {
            acc.saturating_add(item.unit_price().minor_units().saturating_mul(item.quantity()))
        });

        Ok(dto::DashboardStats {
            total_suppliers: suppliers.len(),
            total_items: items.len(),
            low_stock_items: items.iter().filter(|i| i.is_low_stock()).count(),
            submitted_requisitions: requisitions
                .iter()
                .filter(|r| r.status() == RequisitionStatus::Submitted)
                .count(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status() == OrderStatus::Pending)
                .count(),
            approved_orders: orders
                .iter()
                .filter(|o| o.status() == OrderStatus::Approved)
                .count(),
            pending_invoices: invoices
                .iter()
                .filter(|i| i.status() == InvoiceStatus::Pending)
                .count(),
            inventory_value,
        })
    }
}

fn sort_newest_first<R: Entity>(records: &mut [R]) {
    records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}
