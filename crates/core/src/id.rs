//! Strongly-typed record identifiers.
//!
//! Storage assigns positive integer ids; `0` means "not yet assigned".

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Common view over the integer id newtypes.
pub trait RecordId: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug {
    fn from_raw(raw: u64) -> Self;

    fn get(self) -> u64;

    fn is_assigned(self) -> bool {
        self.get() > 0
    }
}

/// Identifier of a user account (also the principal identity).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

/// Identifier of an order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

/// Identifier of a product.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

/// Identifier of an order item.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

macro_rules! impl_record_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl RecordId for $t {
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn get(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.trim().parse::<u64>().map_err(|e| {
                    DomainError::bad_request(format!("invalid {}: '{}': {}", $name, s, e))
                })?;
                Ok(Self(raw))
            }
        }
    };
}

impl_record_id!(UserId, "user id");
impl_record_id!(OrderId, "order id");
impl_record_id!(ProductId, "product id");
impl_record_id!(ItemId, "item id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_non_negative_integers() {
        assert_eq!("42".parse::<OrderId>().unwrap(), OrderId::new(42));
        assert_eq!(" 7 ".parse::<UserId>().unwrap().get(), 7);
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert!("-1".parse::<ProductId>().is_err());
        assert!("abc".parse::<ItemId>().is_err());

        let err = "x".parse::<UserId>().unwrap_err();
        assert!(err.to_string().contains("invalid user id"));
    }

    #[test]
    fn zero_is_unassigned() {
        assert!(!OrderId::default().is_assigned());
        assert!(OrderId::new(1).is_assigned());
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&ProductId::new(9)).unwrap();
        assert_eq!(json, "9");
    }
}
