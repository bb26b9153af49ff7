use serde::{Deserialize, Serialize};

use storefront_auth::{Action, AuthDecision, Guarded, Principal, ResourceKind, decide};
use storefront_core::{Entity, Field, FieldRegistry, FieldSelection, ProductId, Record, UserId, Validate};

/// A catalog entry that can be ordered in whole units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: ProductId,

    #[serde(default)]
    pub name: String,

    /// Single character shown in place of the name.
    #[serde(default)]
    pub symbol: String,

    /// Unit price in cents.
    #[serde(default)]
    pub price: i64,

    #[serde(default, rename = "numInStock")]
    pub num_in_stock: i64,
}

impl Product {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, price: i64, num_in_stock: i64) -> Self {
        Self {
            id: ProductId::default(),
            name: name.into(),
            symbol: symbol.into(),
            price,
            num_in_stock,
        }
    }

    fn check_name(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("name must be at least 1 character".to_string());
        }
        Ok(())
    }

    fn check_symbol(&self) -> Result<(), String> {
        if self.symbol.chars().count() != 1 {
            return Err("symbol must be exactly 1 rune".to_string());
        }
        Ok(())
    }

    fn check_price(&self) -> Result<(), String> {
        if self.price <= 0 {
            return Err(format!("price must be greater than zero, got {}", self.price));
        }
        Ok(())
    }

    fn check_num_in_stock(&self) -> Result<(), String> {
        if self.num_in_stock < 0 {
            return Err(format!(
                "numInStock must be greater than or equal to zero, got {}",
                self.num_in_stock
            ));
        }
        Ok(())
    }
}

impl Validate for Product {
    const FIELDS: FieldRegistry<Self> = FieldRegistry::new(
        "Product",
        &[
            Field::new("name", Product::check_name),
            Field::new("symbol", Product::check_symbol),
            Field::new("price", Product::check_price),
            Field::new("numInStock", Product::check_num_in_stock),
        ],
    );
}

impl Entity for Product {
    type Id = ProductId;
    const RESOURCE: &'static str = "Product";

    fn id(&self) -> ProductId {
        self.id
    }
}

impl Record for Product {
    fn assign_id(&mut self, id: ProductId) {
        self.id = id;
    }

    fn patch(&mut self, source: &Self, selection: &FieldSelection) {
        if selection.includes("name") {
            self.name.clone_from(&source.name);
        }
        if selection.includes("symbol") {
            self.symbol.clone_from(&source.symbol);
        }
        if selection.includes("price") {
            self.price = source.price;
        }
        if selection.includes("numInStock") {
            self.num_in_stock = source.num_in_stock;
        }
    }
}

impl Guarded for Product {
    const KIND: ResourceKind = ResourceKind::Product;

    fn owner_id(&self) -> Option<UserId> {
        None
    }
}

/// Catalog writes are admin-only.
pub fn can_create_product(principal: &Principal, candidate: &Product) -> AuthDecision {
    decide(principal, Action::Create, candidate)
}

/// Any authenticated principal may browse the catalog.
pub fn can_read_product(principal: &Principal, product: &Product) -> AuthDecision {
    decide(principal, Action::Read, product)
}

pub fn can_update_product(principal: &Principal, stored: &Product) -> AuthDecision {
    decide(principal, Action::Update, stored)
}

pub fn can_delete_product(principal: &Principal, stored: &Product) -> AuthDecision {
    decide(principal, Action::Delete, stored)
}
