//! Service wiring: repositories, paginators and the password hasher shared by
//! every handler.

use std::collections::HashMap;
use std::sync::Arc;

use storefront_auth::User;
use storefront_core::{DomainError, ProductId, SeekPaginator};
use storefront_infra::{InMemoryRepository, Repository, RepositoryError};
use storefront_products::Product;
use storefront_sales::{Item, Order};

use crate::config::ApiConfig;

/// Turns plaintext passwords into storable hashes.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// argon2id with the crate's default parameters and a random salt per hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        use argon2::Argon2;
        use password_hash::rand_core::OsRng;
        use password_hash::{PasswordHasher as _, SaltString};

        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        use argon2::Argon2;
        use password_hash::{PasswordHash, PasswordVerifier};

        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

pub struct AppServices {
    pub orders: InMemoryRepository<Order>,
    pub products: InMemoryRepository<Product>,
    pub users: InMemoryRepository<User>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub order_pages: SeekPaginator,
    pub product_pages: SeekPaginator,
    pub user_pages: SeekPaginator,
    pub sales_tax_rate: f64,
}

impl AppServices {
    /// Current price of every product referenced by `items`.
    ///
    /// Products that do not exist are simply absent from the table.
    pub fn price_table(&self, items: &[Item]) -> Result<HashMap<ProductId, i64>, DomainError> {
        let mut prices = HashMap::with_capacity(items.len());
        for item in items {
            match self.products.get_by_id(item.product_id) {
                Ok(product) => {
                    prices.insert(product.id, product.price);
                }
                Err(RepositoryError::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(prices)
    }
}

pub fn build_services(config: &ApiConfig) -> AppServices {
    let max = config.page_limit_max;
    AppServices {
        orders: InMemoryRepository::new(),
        products: InMemoryRepository::new(),
        users: InMemoryRepository::new(),
        hasher: Arc::new(Argon2PasswordHasher),
        order_pages: SeekPaginator::new("orders", max),
        product_pages: SeekPaginator::new("products", max),
        user_pages: SeekPaginator::new("users", max),
        sales_tax_rate: config.sales_tax_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argon2_round_trip() {
        let hasher = Argon2PasswordHasher;
        let hash = hasher.hash("Sup3r$ecret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("Sup3r$ecret", &hash));
        assert!(!hasher.verify("wrong", &hash));
        assert!(!hasher.verify("Sup3r$ecret", "not-a-hash"));
    }

    #[test]
    fn price_table_skips_unknown_products() {
        let services = build_services(&ApiConfig::default());
        let widget = services
            .products
            .create(Product::new("Widget", "W", 450, 3))
            .unwrap();

        let items = [
            Item::new(widget.id, 2),
            Item::new(ProductId::new(77), 1),
        ];
        let prices = services.price_table(&items).unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[&widget.id], 450);
        assert_eq!(services.order_pages.max_limit(), 1000);
    }
}
