//! Product catalog maintenance.
//!
//! Catalog entries carry no owner; maintenance is a back-office concern
//! and is not ownership-scoped. Stock set here is the starting quantity —
//! once orders flow, stock moves only through the ledger's reservations.

use chrono::Utc;
use common::{Money, ProductId};
use store::{Product, ProductStore};

use crate::error::{DomainError, Result};

/// Fields supplied when adding a product to the catalog.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub stock: u32,
    pub price: Money,
}

/// Fields of a product that an update may replace.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub stock: Option<u32>,
    pub price: Option<Money>,
}

/// Manages the product catalog.
#[derive(Clone)]
pub struct Catalog<S> {
    store: S,
}

impl<S: ProductStore> Catalog<S> {
    /// Creates a new catalog over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds a product to the catalog.
    #[tracing::instrument(skip(self, new))]
    pub async fn create_product(&self, new: NewProduct) -> Result<Product> {
        if new.price.is_negative() {
            return Err(DomainError::InvalidPrice {
                cents: new.price.cents(),
            });
        }

        let product = Product {
            id: ProductId::new(),
            name: new.name,
            stock: new.stock,
            price: new.price,
            created_at: Utc::now(),
        };
        self.store.insert_product(product.clone()).await?;

        tracing::info!(product_id = %product.id, "product added to catalog");
        Ok(product)
    }

    /// Returns a product by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| DomainError::not_found("product", id))
    }

    /// Lists all catalog products.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.store.list_products().await?)
    }

    /// Updates a product's name, stock, or price.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product> {
        let mut product = self
            .store
            .get_product(id)
            .await?
            .ok_or_else(|| DomainError::not_found("product", id))?;

        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(stock) = update.stock {
            product.stock = stock;
        }
        if let Some(price) = update.price {
            if price.is_negative() {
                return Err(DomainError::InvalidPrice {
                    cents: price.cents(),
                });
            }
            product.price = price;
        }

        self.store.update_product(product.clone()).await?;
        Ok(product)
    }

    /// Removes a product from the catalog.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(|| DomainError::not_found("product", id))?;

        self.store.delete_product(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::InMemoryStore;

    #[tokio::test]
    async fn create_and_get_product() {
        let catalog = Catalog::new(InMemoryStore::new());
        let product = catalog
            .create_product(NewProduct {
                name: "Widget".to_string(),
                stock: 10,
                price: Money::from_cents(1000),
            })
            .await
            .unwrap();

        let fetched = catalog.get_product(product.id).await.unwrap();
        assert_eq!(fetched, product);
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let catalog = Catalog::new(InMemoryStore::new());
        let err = catalog
            .create_product(NewProduct {
                name: "Widget".to_string(),
                stock: 10,
                price: Money::from_cents(-1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidPrice { cents: -1 }));
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let catalog = Catalog::new(InMemoryStore::new());
        let product = catalog
            .create_product(NewProduct {
                name: "Widget".to_string(),
                stock: 10,
                price: Money::from_cents(1000),
            })
            .await
            .unwrap();

        let updated = catalog
            .update_product(
                product.id,
                ProductUpdate {
                    stock: Some(25),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.stock, 25);
        assert_eq!(updated.name, "Widget");
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let catalog = Catalog::new(InMemoryStore::new());
        let id = ProductId::new();

        assert!(matches!(
            catalog.get_product(id).await,
            Err(DomainError::NotFound { entity: "product", .. })
        ));
        assert!(matches!(
            catalog.delete_product(id).await,
            Err(DomainError::NotFound { entity: "product", .. })
        ));
        assert!(matches!(
            catalog.update_product(id, ProductUpdate::default()).await,
            Err(DomainError::NotFound { entity: "product", .. })
        ));
    }
}
