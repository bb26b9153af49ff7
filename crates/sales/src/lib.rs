//! Sales orders domain module.
//!
//! This crate contains order rules (lines, payment, computed amounts and who
//! may touch an order), implemented purely as deterministic logic (no IO, no
//! HTTP, no storage).

pub mod item;
pub mod order;
pub mod payment;

pub use item::{Item, check_items, merge_items};
pub use order::{
    Order, PricingError, can_create_order, can_delete_order, can_read_order, can_update_order,
};
pub use payment::{CreditCardInfo, PaymentInfo};
