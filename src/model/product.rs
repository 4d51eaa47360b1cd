//! Inventory records held by the ledger.
//!
//! [`Product`] implements [`ActorEntity`](actor_framework::ActorEntity); the
//! reservation arithmetic lives here as plain methods so it can be tested without an
//! actor.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::ParseIdError;
use crate::ledger_actor::LedgerError;

/// Type-safe identifier for Products, rendered as `prod-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "prod-{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("prod-")
            .and_then(|n| n.parse().ok())
            .map(Self)
            .ok_or_else(|| ParseIdError::Malformed(s.to_string()))
    }
}

impl TryFrom<String> for ProductId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.to_string()
    }
}

/// Whether a reservation shows up in `reserved` immediately or after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyMode {
    #[default]
    Strong,
    Eventual,
}

impl Display for ConsistencyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsistencyMode::Strong => f.write_str("strong"),
            ConsistencyMode::Eventual => f.write_str("eventual"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    /// Committed units on hand.
    pub stock: u32,
    /// Units held for in-flight orders, not yet debited from `stock`.
    pub reserved: u32,
    /// Bumped on every mutation.
    pub version: u64,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            stock,
            reserved: 0,
            version: 1,
        }
    }

    /// Units that can still be reserved. Saturates while an eventual-mode
    /// reservation has pushed `reserved` past `stock`.
    pub fn available(&self) -> u32 {
        self.stock.saturating_sub(self.reserved)
    }

    pub fn check_version(&self, expected: Option<u64>) -> Result<(), LedgerError> {
        match expected {
            Some(expected) if expected != self.version => Err(LedgerError::Conflict {
                id: self.id.to_string(),
                expected,
                actual: self.version,
            }),
            _ => Ok(()),
        }
    }

    pub fn check_available(&self, quantity: u32) -> Result<(), LedgerError> {
        if self.available() < quantity {
            return Err(LedgerError::InsufficientStock {
                requested: quantity,
                available: self.available(),
            });
        }
        Ok(())
    }

    /// Holds `quantity` units. No availability check; see [`Product::check_available`].
    pub fn apply_reservation(&mut self, quantity: u32) {
        self.reserved = self.reserved.saturating_add(quantity);
        self.version += 1;
    }

    pub fn commit(&mut self, quantity: u32, expected: Option<u64>) -> Result<(), LedgerError> {
        self.check_version(expected)?;
        if self.reserved < quantity {
            return Err(LedgerError::InvalidReservation {
                requested: quantity,
                reserved: self.reserved,
            });
        }
        // reserved can exceed stock after an eventual-mode oversell; never go below zero.
        if self.stock < quantity {
            return Err(LedgerError::InsufficientStock {
                requested: quantity,
                available: self.stock,
            });
        }
        self.stock -= quantity;
        self.reserved -= quantity;
        self.version += 1;
        Ok(())
    }

    pub fn release(&mut self, quantity: u32) {
        self.reserved = self.reserved.saturating_sub(quantity);
        self.version += 1;
    }

    pub fn replenish(&mut self, quantity: u32, expected: Option<u64>) -> Result<(), LedgerError> {
        self.check_version(expected)?;
        self.stock = self.stock.saturating_add(quantity);
        self.version += 1;
        Ok(())
    }
}

/// DTO for Product creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub stock: u32,
}

/// DTO for Product updates. Stock only moves through reservations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// Full product list plus the active mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    pub products: Vec<Product>,
    pub consistency_mode: ConsistencyMode,
}

/// The catalog every ledger starts with.
pub fn seed_catalog() -> Vec<ProductCreate> {
    [
        ("Laptop Pro", 1299.0, 50),
        ("Wireless Mouse", 29.0, 200),
        ("Mechanical Keyboard", 89.0, 100),
        ("4K Monitor", 499.0, 30),
        ("USB-C Hub", 49.0, 150),
    ]
    .into_iter()
    .map(|(name, price, stock)| ProductCreate {
        name: name.to_string(),
        price,
        stock,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laptop() -> Product {
        Product::new(ProductId(1), "Laptop Pro", 1299.0, 50)
    }

    #[test]
    fn reserve_then_commit() {
        let mut p = laptop();
        p.check_available(10).unwrap();
        p.apply_reservation(10);
        assert_eq!((p.stock, p.reserved, p.version), (50, 10, 2));

        p.commit(10, None).unwrap();
        assert_eq!((p.stock, p.reserved, p.version), (40, 0, 3));
    }

    #[test]
    fn commit_more_than_reserved_changes_nothing() {
        let mut p = laptop();
        p.apply_reservation(3);
        let before = p.clone();

        let err = p.commit(4, None).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidReservation {
                requested: 4,
                reserved: 3
            }
        );
        assert_eq!(p, before);
    }

    #[test]
    fn release_clamps_at_zero_and_still_bumps_version() {
        let mut p = laptop();
        p.apply_reservation(2);
        p.release(5);
        assert_eq!(p.reserved, 0);
        assert_eq!(p.version, 3);
    }

    #[test]
    fn stale_version_is_a_conflict() {
        let mut p = laptop();
        let err = p.replenish(5, Some(7)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Conflict {
                expected: 7,
                actual: 1,
                ..
            }
        ));
        assert_eq!(p.stock, 50);

        p.replenish(5, Some(1)).unwrap();
        assert_eq!((p.stock, p.version), (55, 2));
    }

    #[test]
    fn available_saturates_after_oversell() {
        let mut p = Product::new(ProductId(4), "4K Monitor", 499.0, 30);
        p.apply_reservation(25);
        p.apply_reservation(25);
        assert_eq!(p.available(), 0);
        assert!(p.check_available(1).is_err());
    }

    #[test]
    fn product_ids_render_and_parse() {
        assert_eq!(ProductId(3).to_string(), "prod-3");
        assert_eq!("prod-3".parse::<ProductId>().unwrap(), ProductId(3));
        assert!("product_3".parse::<ProductId>().is_err());
    }

    #[test]
    fn seed_catalog_matches_storefront() {
        let seed = seed_catalog();
        assert_eq!(seed.len(), 5);
        assert_eq!(seed[0].name, "Laptop Pro");
        assert_eq!(seed[3].stock, 30);
    }
}
