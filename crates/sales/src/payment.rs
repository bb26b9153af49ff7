//! How an order is paid: cash, or a credit card whose details must look sane.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCardInfo {
    #[serde(default)]
    pub number: String,

    #[serde(default, rename = "cardholdername")]
    pub cardholder_name: String,

    /// `MM/YY`.
    #[serde(default, rename = "expirationdate")]
    pub expiration_date: String,

    #[serde(default)]
    pub zipcode: String,

    #[serde(default)]
    pub cvv: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Paid in cash; card details are ignored.
    #[serde(default)]
    pub cash: bool,

    #[serde(default, rename = "cardinfo")]
    pub card_info: CreditCardInfo,
}

impl PaymentInfo {
    pub fn cash() -> Self {
        Self {
            cash: true,
            card_info: CreditCardInfo::default(),
        }
    }

    pub fn card(card_info: CreditCardInfo) -> Self {
        Self {
            cash: false,
            card_info,
        }
    }

    /// Every problem with the payment, joined into one message.
    pub fn check(&self) -> Result<(), String> {
        if self.cash {
            return Ok(());
        }
        let card = &self.card_info;
        let problems: Vec<&str> = [
            (valid_expiration_date(&card.expiration_date), EXPIRATION_DATE_INVALID),
            (valid_card_number(&card.number), CARD_NUMBER_INVALID),
            (valid_cvv(&card.cvv), CVV_INVALID),
            (valid_zipcode(&card.zipcode), ZIPCODE_INVALID),
        ]
        .into_iter()
        .filter_map(|(ok, msg)| (!ok).then_some(msg))
        .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join(", "))
        }
    }
}

const EXPIRATION_DATE_INVALID: &str =
    "expiration date is invalid. Must be in MM/YY format and must be a valid date";
const CARD_NUMBER_INVALID: &str = "card number is invalid. Must be a 16 digit string, whitespace ignored";
const CVV_INVALID: &str = "the CVV is invalid. Must be a 3 or 4 digit string, whitespace ignored";
const ZIPCODE_INVALID: &str = "zipcode is invalid. Must be a 5 digit string";

/// Count of ASCII digits, or `None` if anything other than digits and
/// whitespace is present.
fn digits_ignoring_whitespace(raw: &str) -> Option<usize> {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .try_fold(0usize, |n, c| c.is_ascii_digit().then_some(n + 1))
}

pub fn valid_card_number(raw: &str) -> bool {
    digits_ignoring_whitespace(raw) == Some(16)
}

pub fn valid_cvv(raw: &str) -> bool {
    matches!(digits_ignoring_whitespace(raw), Some(3 | 4))
}

pub fn valid_zipcode(raw: &str) -> bool {
    raw.len() == 5 && raw.bytes().all(|b| b.is_ascii_digit())
}

pub fn valid_expiration_date(raw: &str) -> bool {
    let Some((month, year)) = raw.split_once('/') else {
        return false;
    };
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return false;
    }
    matches!(month.parse::<u8>(), Ok(1..=12))
}
