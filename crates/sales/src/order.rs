use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_auth::{Action, AuthDecision, Guarded, Principal, ResourceKind, can_update, decide};
use storefront_core::{
    DomainError, Entity, Field, FieldRegistry, FieldSelection, ItemId, OrderId, ProductId, Record, RecordId, UserId,
    Validate, ValidationError,
};

use crate::item::{Item, check_items, merge_items, number_items};
use crate::payment::PaymentInfo;

/// A customer order. Money amounts are in cents.
///
/// `subtotal`, `tax` and `total` are always computed here from the items and
/// the catalog; a client never gets to choose them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: OrderId,

    #[serde(default, rename = "ownerid")]
    pub owner_id: UserId,

    #[serde(default)]
    pub items: Vec<Item>,

    #[serde(default, rename = "paymentinfo")]
    pub payment_info: PaymentInfo,

    /// Fraction of the subtotal, e.g. `0.0825`.
    #[serde(default, rename = "taxrate")]
    pub tax_rate: f64,

    #[serde(default)]
    pub subtotal: i64,

    #[serde(default)]
    pub tax: i64,

    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("product ID {0} does not exist")]
    UnknownProduct(ProductId),

    #[error("order total is too large")]
    Overflow,
}

impl From<PricingError> for DomainError {
    fn from(err: PricingError) -> Self {
        DomainError::bad_request(err.to_string())
    }
}

impl Order {
    pub fn new(owner_id: UserId, items: Vec<Item>, payment_info: PaymentInfo, tax_rate: f64) -> Self {
        Self {
            id: OrderId::default(),
            owner_id,
            items,
            payment_info,
            tax_rate,
            subtotal: 0,
            tax: 0,
            total: 0,
        }
    }

    fn check_owner_id(&self) -> Result<(), String> {
        if !self.owner_id.is_assigned() {
            return Err("ownerid must be greater than zero".to_string());
        }
        Ok(())
    }

    fn check_payment_info(&self) -> Result<(), String> {
        self.payment_info.check()
    }

    fn check_items(&self) -> Result<(), String> {
        check_items(&self.items)
    }

    fn check_tax_rate(&self) -> Result<(), String> {
        if !self.tax_rate.is_finite() || !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(format!("taxrate must be between 0 and 1, got {}", self.tax_rate));
        }
        Ok(())
    }

    /// Full validation for a freshly submitted order: the computed amounts
    /// must be left empty.
    pub fn validate_new(&self) -> Result<(), ValidationError> {
        for (field, value) in [("subtotal", self.subtotal), ("tax", self.tax), ("total", self.total)] {
            if value != 0 {
                return Err(ValidationError::Invalid {
                    resource: Self::RESOURCE,
                    field,
                    message: format!("{field} must be empty"),
                });
            }
        }
        self.validate()
    }

    /// Recompute `subtotal`, `tax` and `total` from current catalog prices.
    ///
    /// Tax is rounded to the nearest cent, halves away from zero.
    pub fn compute_totals<F>(&mut self, price_of: F) -> Result<(), PricingError>
    where
        F: Fn(ProductId) -> Option<i64>,
    {
        let mut subtotal: i64 = 0;
        for item in &self.items {
            let price = price_of(item.product_id).ok_or(PricingError::UnknownProduct(item.product_id))?;
            let line = price.checked_mul(item.quantity).ok_or(PricingError::Overflow)?;
            subtotal = subtotal.checked_add(line).ok_or(PricingError::Overflow)?;
        }
        let tax = (subtotal as f64 * self.tax_rate).round();
        if !tax.is_finite() || tax.abs() >= i64::MAX as f64 {
            return Err(PricingError::Overflow);
        }
        let tax = tax as i64;

        self.subtotal = subtotal;
        self.tax = tax;
        self.total = subtotal.checked_add(tax).ok_or(PricingError::Overflow)?;
        Ok(())
    }

    /// Number new lines and point every line at this order.
    pub fn attach_items(&mut self) {
        number_items(&mut self.items, self.id);
    }
}

impl Validate for Order {
    const FIELDS: FieldRegistry<Self> = FieldRegistry::new(
        "Order",
        &[
            Field::new("ownerid", Order::check_owner_id),
            Field::new("paymentinfo", Order::check_payment_info),
            Field::new("items", Order::check_items),
            Field::new("taxrate", Order::check_tax_rate),
        ],
    );
}

impl Entity for Order {
    type Id = OrderId;
    const RESOURCE: &'static str = "Order";

    fn id(&self) -> OrderId {
        self.id
    }
}

impl Record for Order {
    fn assign_id(&mut self, id: OrderId) {
        self.id = id;
        self.attach_items();
    }

    /// A full update replaces the item list; a partial one merges by product.
    fn patch(&mut self, source: &Self, selection: &FieldSelection) {
        if selection.includes("ownerid") {
            self.owner_id = source.owner_id;
        }
        if selection.includes("paymentinfo") {
            self.payment_info.clone_from(&source.payment_info);
        }
        if selection.includes("taxrate") {
            self.tax_rate = source.tax_rate;
        }
        match selection {
            FieldSelection::All => {
                self.items = source
                    .items
                    .iter()
                    .map(|item| Item {
                        id: ItemId::default(),
                        ..item.clone()
                    })
                    .collect();
                self.subtotal = source.subtotal;
                self.tax = source.tax;
                self.total = source.total;
            }
            FieldSelection::Only(_) if selection.includes("items") => {
                merge_items(&mut self.items, &source.items);
            }
            FieldSelection::Only(_) => {}
        }
        self.attach_items();
    }
}

impl Guarded for Order {
    const KIND: ResourceKind = ResourceKind::Order;

    fn owner_id(&self) -> Option<UserId> {
        Some(self.owner_id)
    }
}

/// Customers may only place orders for themselves.
pub fn can_create_order(principal: &Principal, candidate: &Order) -> AuthDecision {
    decide(principal, Action::Create, candidate)
}

pub fn can_read_order(principal: &Principal, order: &Order) -> AuthDecision {
    decide(principal, Action::Read, order)
}

/// `candidate` is the order as it will be stored; a customer can neither
/// touch someone else's order nor hand their own to someone else.
pub fn can_update_order(principal: &Principal, stored: &Order, candidate: &Order) -> AuthDecision {
    can_update(principal, stored, candidate)
}

pub fn can_delete_order(principal: &Principal, stored: &Order) -> AuthDecision {
    decide(principal, Action::Delete, stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use storefront_auth::{Role, filter_readable};

    use crate::payment::CreditCardInfo;

    fn prices() -> HashMap<ProductId, i64> {
        HashMap::from([(ProductId::new(1), 250), (ProductId::new(2), 1_999)])
    }

    fn order(owner: u64) -> Order {
        Order::new(
            UserId::new(owner),
            vec![
                Item::new(ProductId::new(1), 4),
                Item::new(ProductId::new(2), 1),
            ],
            PaymentInfo::cash(),
            0.08,
        )
    }

    fn principal(id: u64, role: Role) -> Principal {
        Principal::new(UserId::new(id), role)
    }

    #[test]
    fn totals_follow_items_and_tax_rate() {
        let catalog = prices();
        let mut o = order(1);
        o.compute_totals(|id| catalog.get(&id).copied()).unwrap();

        assert_eq!(o.subtotal, 2_999);
        // 239.92 rounds to 240
        assert_eq!(o.tax, 240);
        assert_eq!(o.total, 3_239);
    }

    #[test]
    fn tax_rounds_half_away_from_zero() {
        let mut o = Order::new(
            UserId::new(1),
            vec![Item::new(ProductId::new(1), 1)],
            PaymentInfo::cash(),
            0.5,
        );
        o.compute_totals(|_| Some(5)).unwrap();
        assert_eq!(o.tax, 3);
        assert_eq!(o.total, 8);
    }

    #[test]
    fn unknown_product_is_a_bad_request() {
        let mut o = order(1);
        let err = o.compute_totals(|id| (id == ProductId::new(1)).then_some(100)).unwrap_err();
        assert_eq!(err, PricingError::UnknownProduct(ProductId::new(2)));

        let domain: DomainError = err.into();
        assert_eq!(domain, DomainError::bad_request("product ID 2 does not exist"));
    }

    #[test]
    fn new_orders_must_not_carry_amounts() {
        assert!(order(1).validate_new().is_ok());

        let priced = Order { total: 10, ..order(1) };
        assert_eq!(priced.validate_new().unwrap_err().to_string(), "total must be empty");
        assert!(priced.validate().is_ok());
    }

    #[test]
    fn field_rules() {
        let o = Order { owner_id: UserId::default(), tax_rate: 1.5, ..order(1) };
        assert_eq!(
            o.validate_partial(&["ownerid"]).unwrap_err().to_string(),
            "ownerid must be greater than zero"
        );
        assert_eq!(
            o.validate_partial(&["taxrate"]).unwrap_err().to_string(),
            "taxrate must be between 0 and 1, got 1.5"
        );
        assert!(o.validate_partial(&["items", "paymentinfo"]).is_ok());

        let nan = Order { tax_rate: f64::NAN, ..order(1) };
        assert!(nan.validate_partial(&["taxrate"]).is_err());

        let bad_card = Order {
            payment_info: PaymentInfo::card(CreditCardInfo::default()),
            ..order(1)
        };
        assert!(bad_card.validate_partial(&["paymentinfo"]).is_err());
        assert!(matches!(
            order(1).validate_partial(&["subtotal"]),
            Err(ValidationError::UnknownField { .. })
        ));
    }

    #[test]
    fn assigning_an_id_attaches_items() {
        let mut o = order(1);
        o.assign_id(OrderId::new(7));
        assert!(o.items.iter().all(|i| i.order_id == OrderId::new(7)));
        let ids: Vec<u64> = o.items.iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(o.validate().is_ok());
    }

    #[test]
    fn partial_items_update_merges_and_full_update_replaces() {
        let mut stored = order(1);
        stored.assign_id(OrderId::new(3));

        let body = Order::new(
            UserId::new(1),
            vec![Item::new(ProductId::new(2), 6), Item::new(ProductId::new(5), 1)],
            PaymentInfo::cash(),
            0.0,
        );

        let mut merged = stored.clone();
        merged.patch(&body, &FieldSelection::only(["items"]));
        let lines: Vec<(u64, i64)> = merged.items.iter().map(|i| (i.product_id.get(), i.quantity)).collect();
        assert_eq!(lines, vec![(1, 4), (2, 6), (5, 1)]);
        assert_eq!(merged.tax_rate, 0.08);
        assert_eq!(merged.id, OrderId::new(3));

        let mut replaced = stored.clone();
        replaced.patch(&body, &FieldSelection::All);
        let lines: Vec<(u64, i64)> = replaced.items.iter().map(|i| (i.product_id.get(), i.quantity)).collect();
        assert_eq!(lines, vec![(2, 6), (5, 1)]);
        assert_eq!(replaced.tax_rate, 0.0);
        assert_eq!(replaced.id, OrderId::new(3));
    }

    #[test]
    fn customer_order_policy() {
        let customer = principal(1, Role::Customer);
        assert!(can_create_order(&customer, &order(1)).is_allowed());
        assert_eq!(
            can_create_order(&customer, &order(2)).denial_reason.as_deref(),
            Some("not enough privileges to create this Order")
        );
        assert!(can_read_order(&customer, &order(1)).is_allowed());
        assert!(!can_read_order(&customer, &order(2)).is_allowed());
        assert!(can_delete_order(&customer, &order(1)).is_allowed());
        assert!(!can_delete_order(&customer, &order(2)).is_allowed());

        assert!(!can_update_order(&customer, &order(1), &order(2)).is_allowed());
        assert!(can_update_order(&customer, &order(1), &order(1)).is_allowed());
    }

    #[test]
    fn staff_order_policy() {
        for role in [Role::Employee, Role::Admin] {
            let staff = principal(9, role);
            assert!(can_create_order(&staff, &order(2)).is_allowed());
            assert!(can_update_order(&staff, &order(2), &order(3)).is_allowed());
            assert!(can_delete_order(&staff, &order(2)).is_allowed());
        }
    }

    #[test]
    fn customer_listing_keeps_only_own_orders() {
        let mut orders = vec![order(1), order(2), order(1)];
        for (n, o) in orders.iter_mut().enumerate() {
            o.assign_id(OrderId::new(n as u64 + 1));
        }
        let visible: Vec<u64> = filter_readable(&principal(1, Role::Customer), &orders)
            .iter()
            .map(|o| o.id.get())
            .collect();
        assert_eq!(visible, vec![1, 3]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                .. ProptestConfig::default()
            })]

            #[test]
            fn total_is_subtotal_plus_tax(
                lines in prop::collection::vec((1u64..20, 1i64..50, 1i64..10_000), 0..10),
                rate in 0.0f64..=1.0,
            ) {
                let mut o = Order::new(UserId::new(1), Vec::new(), PaymentInfo::cash(), rate);
                let mut catalog = HashMap::new();
                for (product, quantity, price) in lines {
                    if catalog.insert(ProductId::new(product), price).is_none() {
                        o.items.push(Item::new(ProductId::new(product), quantity));
                    }
                }
                o.compute_totals(|id| catalog.get(&id).copied()).unwrap();

                let expected: i64 = o.items.iter().map(|i| i.quantity * catalog[&i.product_id]).sum();
                prop_assert_eq!(o.subtotal, expected);
                prop_assert_eq!(o.total, o.subtotal + o.tax);
                prop_assert!((o.tax as f64 - o.subtotal as f64 * rate).abs() <= 0.5);
            }

            #[test]
            fn partial_over_all_fields_matches_full(
                owner in 0u64..3,
                rate in -1.0f64..2.0,
                quantity in -2i64..3,
            ) {
                let o = Order::new(
                    UserId::new(owner),
                    vec![Item::new(ProductId::new(1), quantity)],
                    PaymentInfo::cash(),
                    rate,
                );
                let all: Vec<&str> = Order::FIELDS.field_names().collect();
                prop_assert_eq!(o.validate_partial(&all).is_ok(), o.validate().is_ok());
            }
        }
    }
}
