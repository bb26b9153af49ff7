use serde::{Deserialize, Serialize};

use storefront_core::{FieldSelection, UserId};
use storefront_sales::{Item, Order, PaymentInfo};

// -------------------------
// Request DTOs
// -------------------------

/// `PUT /{resource}/:id` query: `?fields=a,b` switches to a partial update.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateParams {
    pub fields: Option<String>,
}

impl UpdateParams {
    pub fn selection(&self) -> FieldSelection {
        FieldSelection::from_param(self.fields.as_deref())
    }
}

/// `POST /orders` body. Same wire names as [`Order`]; an absent `taxrate`
/// falls back to the configured sales tax rate.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(rename = "ownerid")]
    pub owner_id: UserId,

    #[serde(default)]
    pub items: Vec<Item>,

    #[serde(default, rename = "paymentinfo")]
    pub payment_info: PaymentInfo,

    #[serde(default, rename = "taxrate")]
    pub tax_rate: Option<f64>,

    #[serde(default)]
    pub subtotal: i64,

    #[serde(default)]
    pub tax: i64,

    #[serde(default)]
    pub total: i64,
}

impl CreateOrderRequest {
    pub fn into_order(self, default_tax_rate: f64) -> Order {
        Order {
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            ..Order::new(
                self.owner_id,
                self.items,
                self.payment_info,
                self.tax_rate.unwrap_or(default_tax_rate),
            )
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct PageLimitResponse {
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
