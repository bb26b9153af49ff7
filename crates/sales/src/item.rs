use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use storefront_core::{Field, FieldRegistry, ItemId, OrderId, ProductId, RecordId, Validate};

/// One order line: a quantity of a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,

    #[serde(default, rename = "orderid")]
    pub order_id: OrderId,

    #[serde(default, rename = "productid")]
    pub product_id: ProductId,

    #[serde(default)]
    pub quantity: i64,
}

impl Item {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            id: ItemId::default(),
            order_id: OrderId::default(),
            product_id,
            quantity,
        }
    }

    fn check_order_id(&self) -> Result<(), String> {
        if !self.order_id.is_assigned() {
            return Err("orderid must be greater than zero".to_string());
        }
        Ok(())
    }

    fn check_product_id(&self) -> Result<(), String> {
        if !self.product_id.is_assigned() {
            return Err("productid must be greater than zero".to_string());
        }
        Ok(())
    }

    fn check_quantity(&self) -> Result<(), String> {
        if self.quantity <= 0 {
            return Err(format!(
                "quantity must be greater than zero, got {}",
                self.quantity
            ));
        }
        Ok(())
    }
}

impl Validate for Item {
    const FIELDS: FieldRegistry<Self> = FieldRegistry::new(
        "Item",
        &[
            Field::new("orderid", Item::check_order_id),
            Field::new("productid", Item::check_product_id),
            Field::new("quantity", Item::check_quantity),
        ],
    );
}

/// Fields a client supplies on a line; `orderid` is filled in by the order.
pub const CLIENT_ITEM_FIELDS: [&str; 2] = ["productid", "quantity"];

/// Check every line and reject duplicate products.
pub fn check_items(items: &[Item]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        let result = if item.order_id.is_assigned() {
            item.validate()
        } else {
            item.validate_partial(&CLIENT_ITEM_FIELDS)
        };
        result.map_err(|e| e.to_string())?;

        if !seen.insert(item.product_id) {
            return Err(format!(
                "item list contains duplicate product ID: {}",
                item.product_id
            ));
        }
    }
    Ok(())
}

/// Merge `incoming` lines into `existing` by product: a known product has
/// its quantity replaced, an unknown one is appended.
pub fn merge_items(existing: &mut Vec<Item>, incoming: &[Item]) {
    for item in incoming {
        match existing.iter_mut().find(|e| e.product_id == item.product_id) {
            Some(current) => current.quantity = item.quantity,
            None => existing.push(Item {
                id: ItemId::default(),
                ..item.clone()
            }),
        }
    }
}

/// Give every unnumbered line the next free ordinal and stamp the order id.
pub fn number_items(items: &mut [Item], order_id: OrderId) {
    let mut next = items.iter().map(|i| i.id.get()).max().unwrap_or(0);
    for item in items.iter_mut() {
        if !item.id.is_assigned() {
            next += 1;
            item.id = ItemId::new(next);
        }
        item.order_id = order_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product: u64, quantity: i64) -> Item {
        Item::new(ProductId::new(product), quantity)
    }

    #[test]
    fn quantity_and_product_must_be_positive() {
        assert!(check_items(&[item(1, 2), item(2, 1)]).is_ok());
        assert_eq!(
            check_items(&[item(1, 0)]).unwrap_err(),
            "quantity must be greater than zero, got 0"
        );
        assert_eq!(
            check_items(&[item(0, 1)]).unwrap_err(),
            "productid must be greater than zero"
        );
    }

    #[test]
    fn duplicate_products_are_rejected() {
        assert_eq!(
            check_items(&[item(4, 1), item(4, 3)]).unwrap_err(),
            "item list contains duplicate product ID: 4"
        );
    }

    #[test]
    fn full_item_validation_requires_an_order() {
        let unattached = item(1, 1);
        assert!(unattached.validate().is_err());
        assert!(unattached.validate_partial(&CLIENT_ITEM_FIELDS).is_ok());
    }

    #[test]
    fn merge_replaces_quantity_and_appends_new_products() {
        let mut lines = vec![item(1, 2), item(2, 5)];
        number_items(&mut lines, OrderId::new(8));

        merge_items(&mut lines, &[item(2, 1), item(3, 4)]);
        number_items(&mut lines, OrderId::new(8));

        let summary: Vec<(u64, u64, i64)> = lines
            .iter()
            .map(|i| (i.id.get(), i.product_id.get(), i.quantity))
            .collect();
        assert_eq!(summary, vec![(1, 1, 2), (2, 2, 1), (3, 3, 4)]);
        assert!(lines.iter().all(|i| i.order_id == OrderId::new(8)));
    }
}
