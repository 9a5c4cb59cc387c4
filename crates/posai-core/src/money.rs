//! # Money
//!
//! Rupee amounts as whole paise.
//!
//! ## Paise All the Way Down
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Three items at Rs. 0.10 as f64: 0.30000000000000004                   │
//! │  Three items at 10 paise as i64: 30                                     │
//! │                                                                         │
//! │    "12.50" typed in the price field ──► 1250                            │
//! │    1250 bound to SQLite as "12.50"  ──► DECIMAL(10,2) column            │
//! │    CAST(ROUND(col * 100) AS INTEGER) ──► 1250 back in Rust              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use posai_core::money::Money;
//!
//! let price = Money::from_minor(1099); // Rs. 10.99
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.minor_units(), 3297);
//! assert_eq!(line.to_string(), "Rs. 32.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;

/// Largest value a `DECIMAL(10,2)` column holds: 99,999,999.99.
pub const MAX_DECIMAL_MINOR: i64 = 9_999_999_999;

/// Currency prefixes accepted in front of typed amounts.
const CURRENCY_PREFIXES: &[&str] = &["Rs.", "Rs", "₹"];

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise).
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  PRODUCTS.SELLING_PRICE ──► CartItem.unit_price ──► CartItem.line_total │
/// │  PRODUCTS.COST_PRICE                                                    │
/// │                                                                         │
/// │  Cart.customer_total ──► Receipt.total                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Whole rupees, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// The paise portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Renders the amount the way it is bound into a `DECIMAL(10,2)` column.
    ///
    /// ```rust
    /// use posai_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(1250).to_decimal_string(), "12.50");
    /// assert_eq!(Money::from_minor(7).to_decimal_string(), "0.07");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }

    /// Parses an amount typed into a price field.
    ///
    /// ## Accepted
    /// - `12`, `12.5`, `12.50`, `.75`
    /// - An optional currency prefix: `Rs. 12.50`, `₹12`
    ///
    /// ## Rejected
    /// - Signs (prices are never negative)
    /// - More than two decimal places
    /// - Anything above `DECIMAL(10,2)` range
    ///
    /// ```rust
    /// use posai_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("Rs. 12.5").unwrap().minor_units(), 1250);
    /// assert!(Money::parse_decimal("12.345").is_err());
    /// assert!(Money::parse_decimal("-3").is_err());
    /// ```
    pub fn parse_decimal(text: &str) -> Result<Money, ValidationError> {
        parse_minor_units(text)
            .map(Money)
            .map_err(|reason| ValidationError::invalid("amount", reason))
    }
}

fn parse_minor_units(text: &str) -> Result<i64, &'static str> {
    let mut s = text.trim();
    for prefix in CURRENCY_PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }

    if s.is_empty() {
        return Err("expected an amount such as 12.50");
    }

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err("expected an amount such as 12.50");
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err("must be a plain decimal number such as 12.50");
    }
    if frac.len() > 2 {
        return Err("at most two decimal places are allowed");
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| "amount is too large")?
    };
    let frac_value: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| "invalid decimals")? * 10,
        _ => frac.parse().map_err(|_| "invalid decimals")?,
    };

    let minor = whole_value
        .checked_mul(100)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or("amount is too large")?;

    if minor > MAX_DECIMAL_MINOR {
        return Err("amount exceeds 99999999.99");
    }

    Ok(minor)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as `Rs. 12.50`.
///
/// The terminal front-end formats through its configured currency symbol;
/// this impl is the default used in logs and error messages.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rs. {}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor_units(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1099).to_string(), "Rs. 10.99");
        assert_eq!(Money::from_minor(500).to_string(), "Rs. 5.00");
        assert_eq!(Money::from_minor(-550).to_string(), "-Rs. 5.50");
        assert_eq!(Money::zero().to_string(), "Rs. 0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_minor(0).to_decimal_string(), "0.00");
        assert_eq!(Money::from_minor(100).to_decimal_string(), "1.00");
        assert_eq!(Money::from_minor(123456).to_decimal_string(), "1234.56");
    }

    #[test]
    fn test_parse_plain_amounts() {
        assert_eq!(Money::parse_decimal("12").unwrap().minor_units(), 1200);
        assert_eq!(Money::parse_decimal("12.5").unwrap().minor_units(), 1250);
        assert_eq!(Money::parse_decimal("12.05").unwrap().minor_units(), 1205);
        assert_eq!(Money::parse_decimal(".75").unwrap().minor_units(), 75);
        assert_eq!(Money::parse_decimal("0").unwrap().minor_units(), 0);
        assert_eq!(Money::parse_decimal("  40.00 ").unwrap().minor_units(), 4000);
    }

    #[test]
    fn test_parse_with_currency_prefix() {
        assert_eq!(Money::parse_decimal("Rs. 99").unwrap().minor_units(), 9900);
        assert_eq!(Money::parse_decimal("Rs 1.1").unwrap().minor_units(), 110);
        assert_eq!(Money::parse_decimal("₹ 250").unwrap().minor_units(), 25000);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["", "   ", ".", "abc", "1,000", "-5", "+5", "1.234", "1.2.3", "Rs."] {
            assert!(Money::parse_decimal(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_parse_respects_decimal_10_2_range() {
        assert_eq!(
            Money::parse_decimal("99999999.99").unwrap().minor_units(),
            MAX_DECIMAL_MINOR
        );
        assert!(Money::parse_decimal("100000000").is_err());
        assert!(Money::parse_decimal("99999999999999999999999").is_err());
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(250);
        assert_eq!((a + b).minor_units(), 1250);
        assert_eq!((a - b).minor_units(), 750);
        assert_eq!((b * 4).minor_units(), 1000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.minor_units(), 1500);
    }
}
