use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procureflow_core::{DomainError, DomainResult, Entity, EntityId, Money};

/// Default reorder level for newly created items.
const DEFAULT_REORDER_LEVEL: u64 = 10;

/// Inventory item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub EntityId);

impl ItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Unit of measure for stock quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Pcs,
    Kg,
    Ltr,
    Box,
}

/// Inventory item record.
///
/// Quantities are unsigned, so "never negative" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    sku: String,
    name: String,
    category: String,
    unit: Unit,
    unit_price: Money,
    quantity: u64,
    reorder_level: u64,
    created_at: DateTime<Utc>,
}

impl Item {
    pub fn create(
        id: ItemId,
        sku: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        unit: Unit,
        unit_price: Money,
        quantity: u64,
        reorder_level: Option<u64>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();
        if sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        Ok(Self {
            id,
            sku,
            name,
            category: category.into(),
            unit,
            unit_price,
            quantity,
            reorder_level: reorder_level.unwrap_or(DEFAULT_REORDER_LEVEL),
            created_at: now,
        })
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn reorder_level(&self) -> u64 {
        self.reorder_level
    }

    /// Derived status, recomputed on read: on-hand at or below the reorder
    /// level means the item needs restocking.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Apply a goods-receipt delta to on-hand stock.
    pub fn receive(&mut self, quantity: u64) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("received quantity must be positive"));
        }
        self.quantity = self
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| DomainError::validation("stock quantity overflows"))?;
        Ok(())
    }

    /// Update mutable catalog details. `None` keeps the existing value.
    pub fn update_details(
        &mut self,
        name: Option<String>,
        category: Option<String>,
        unit_price: Option<Money>,
        reorder_level: Option<u64>,
    ) -> DomainResult<()> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("item name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(unit_price) = unit_price {
            self.unit_price = unit_price;
        }
        if let Some(reorder_level) = reorder_level {
            self.reorder_level = reorder_level;
        }
        Ok(())
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
