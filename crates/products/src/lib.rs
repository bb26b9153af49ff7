//! Products domain module.
//!
//! This crate contains the catalog record, its field rules and who may touch
//! it, implemented purely as deterministic logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{
    Product, can_create_product, can_delete_product, can_read_product, can_update_product,
};
