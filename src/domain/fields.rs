//! Field-level value objects for the DataVault messages.
//!
//! Each type can only be built through its `parse` (or `new`) constructor, which
//! enforces the gateway's documented constraint for that field and reports the
//! first one violated as a [`Constraint`].

use crate::error::Constraint;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Serialize, Serializer};
use std::fmt;

const DIGITS: &str = "digits";

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn check_digits(value: &str) -> Result<(), Constraint> {
    if value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(Constraint::Charset { allowed: DIGITS })
    }
}

fn check_length(value: &str, min: usize, max: usize) -> Result<(), Constraint> {
    let actual = char_len(value);
    if actual < min {
        Err(Constraint::MinLength { min, actual })
    } else if actual > max {
        Err(Constraint::MaxLength { max, actual })
    } else {
        Ok(())
    }
}

/// Card number to charge. Its length is set by the card itself; no padding
/// with zeros, spaces or separators is accepted.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CardNumber(String);

impl CardNumber {
    pub const MIN_LEN: usize = 12;
    pub const MAX_LEN: usize = 19;

    pub fn parse(value: &str) -> Result<Self, Constraint> {
        if value.is_empty() {
            return Err(Constraint::MinLength {
                min: Self::MIN_LEN,
                actual: 0,
            });
        }
        check_digits(value)?;
        check_length(value, Self::MIN_LEN, Self::MAX_LEN)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Keeps the BIN (first six) and the last four digits.
    pub fn masked(&self) -> String {
        let len = self.0.len();
        format!("{}{}{}", &self.0[..6], "*".repeat(len - 10), &self.0[len - 4..])
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CardNumber").field(&self.masked()).finish()
    }
}

/// Card expiration in `YYYYMM` form, e.g. `201502`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Expiration(String);

impl Expiration {
    pub const LEN: usize = 6;

    pub fn parse(value: &str) -> Result<Self, Constraint> {
        check_digits(value)?;
        let actual = value.len();
        if actual != Self::LEN {
            return Err(Constraint::ExactLength {
                expected: Self::LEN,
                actual,
            });
        }
        let month = &value[4..];
        if !("01"..="12").contains(&month) {
            return Err(Constraint::OutOfRange("month must be between 01 and 12"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn year(&self) -> u16 {
        self.0[..4].parse().unwrap_or_default()
    }

    pub fn month(&self) -> u8 {
        self.0[4..].parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Card security code (CVV2 / CVC).
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cvc(String);

impl Cvc {
    pub fn parse(value: &str) -> Result<Self, Constraint> {
        check_digits(value)?;
        check_length(value, 3, 4)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Cvc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cvc(***)")
    }
}

/// How the card data was captured. The value to use is assigned by the
/// gateway together with each environment's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PosInputMode {
    #[serde(rename = "E-Commerce")]
    ECommerce,
    #[serde(rename = "MOTO")]
    Moto,
}

impl PosInputMode {
    pub const ALLOWED: &'static [&'static str] = &["E-Commerce", "MOTO"];

    pub fn parse(value: &str) -> Result<Self, Constraint> {
        match value {
            "E-Commerce" => Ok(Self::ECommerce),
            "MOTO" => Ok(Self::Moto),
            _ => Err(Constraint::NotInEnumeration {
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// An amount sent without comma or point; the last two digits are the
/// decimals. `1000` is 10.00 and `1748321` is 17,483.21.
///
/// On the wire it is always at least three digits long so the two implied
/// decimals are preceded by an integer digit (`0` travels as `"000"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct MinorAmount(u64);

impl MinorAmount {
    pub const ZERO: Self = Self(0);
    pub const MAX_DIGITS: usize = 12;
    pub const MAX: u64 = 999_999_999_999;

    pub fn from_minor(value: u64) -> Result<Self, Constraint> {
        if value > Self::MAX {
            Err(Constraint::OutOfRange("must be at most 12 digits"))
        } else {
            Ok(Self(value))
        }
    }

    /// Parses the wire encoding: digits only, no sign, no separators.
    pub fn parse(value: &str) -> Result<Self, Constraint> {
        if value.is_empty() {
            return Err(Constraint::MinLength { min: 1, actual: 0 });
        }
        check_digits(value)?;
        let digits = value.trim_start_matches('0');
        if digits.len() > Self::MAX_DIGITS {
            return Err(Constraint::OutOfRange("must be at most 12 digits"));
        }
        if digits.is_empty() {
            return Ok(Self::ZERO);
        }
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Constraint::OutOfRange("must be at most 12 digits"))
    }

    /// Converts a decimal amount such as `17483.21`.
    pub fn from_decimal(value: Decimal) -> Result<Self, Constraint> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Constraint::OutOfRange("must not be negative"));
        }
        if value.normalize().scale() > 2 {
            return Err(Constraint::OutOfRange("must have at most two decimal places"));
        }
        let minor = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.to_u64())
            .ok_or(Constraint::OutOfRange("must be at most 12 digits"))?;
        Self::from_minor(minor)
    }

    pub fn minor_units(&self) -> u64 {
        self.0
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0 as i64, 2)
    }
}

impl fmt::Display for MinorAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl Serialize for MinorAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Total amount of the transaction, taxes included. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Amount(MinorAmount);

impl Amount {
    pub fn new(value: MinorAmount) -> Result<Self, Constraint> {
        if value > MinorAmount::ZERO {
            Ok(Self(value))
        } else {
            Err(Constraint::OutOfRange("must be greater than zero"))
        }
    }

    pub fn value(&self) -> MinorAmount {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = Constraint;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(MinorAmount::from_decimal(value)?)
    }
}

/// ITBIS (value-added tax) portion of the amount. It is not charged on top of
/// [`Amount`], which already includes it. Exempt transactions send `"000"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct Itbis(MinorAmount);

impl Itbis {
    pub const EXEMPT: Self = Self(MinorAmount::ZERO);

    pub fn new(value: MinorAmount) -> Self {
        Self(value)
    }

    pub fn value(&self) -> MinorAmount {
        self.0
    }

    pub fn is_exempt(&self) -> bool {
        self.0 == MinorAmount::ZERO
    }
}

impl TryFrom<Decimal> for Itbis {
    type Error = Constraint;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        MinorAmount::from_decimal(value).map(Self)
    }
}

/// Order number of the transaction. It may travel as null but the field must
/// always be present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct OrderNumber(Option<String>);

impl OrderNumber {
    pub const MAX_LEN: usize = 15;

    pub fn parse(value: &str) -> Result<Self, Constraint> {
        check_length(value, 0, Self::MAX_LEN)?;
        Ok(Self(Some(value.to_string())))
    }

    pub fn null() -> Self {
        Self(None)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Reserved for the gateway's internal use. Fixed value `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcquirerRefData;

impl AcquirerRefData {
    pub const VALUE: &'static str = "1";

    pub fn parse(value: &str) -> Result<Self, Constraint> {
        if value == Self::VALUE {
            Ok(Self)
        } else {
            Err(Constraint::FixedValue {
                expected: Self::VALUE,
            })
        }
    }
}

impl Serialize for AcquirerRefData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(Self::VALUE)
    }
}

/// Merchant customer-service phone number, e.g. `8095442985`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CustomerServicePhone(String);

impl CustomerServicePhone {
    pub const MAX_LEN: usize = 32;

    pub fn parse(value: &str) -> Result<Self, Constraint> {
        check_digits(value)?;
        check_length(value, 1, Self::MAX_LEN)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Merchant-side order identifier. Needed to look the payment up later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CustomOrderId(String);

impl CustomOrderId {
    pub const MAX_LEN: usize = 75;

    pub fn parse(value: &str) -> Result<Self, Constraint> {
        check_length(value, 0, Self::MAX_LEN)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name shown to the cardholder on their statement.
///
/// At most 25 characters. `"` and `\` make the gateway reject the request and
/// `'` is dropped from the issuer's message, so all three are refused here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AltMerchantName(String);

impl AltMerchantName {
    pub const MAX_LEN: usize = 25;
    pub const DISALLOWED: [char; 3] = ['"', '\\', '\''];

    pub fn parse(value: &str) -> Result<Self, Constraint> {
        check_length(value, 0, Self::MAX_LEN)?;
        if let Some(c) = value.chars().find(|c| Self::DISALLOWED.contains(c)) {
            return Err(Constraint::DisallowedCharacter(c));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Token issued by the gateway's DataVault for a stored card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DataVaultToken(String);

impl DataVaultToken {
    pub const MAX_LEN: usize = 100;

    pub fn parse(value: &str) -> Result<Self, Constraint> {
        check_length(value, 1, Self::MAX_LEN)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
