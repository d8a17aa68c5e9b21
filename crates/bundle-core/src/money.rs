//! # Money Module
//!
//! Provides the `Money` type used for fixed bundle pricing.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  (f64)                               │
//! │                                                                         │
//! │  Summing a cart in f64 and rounding at the end usually lands on the     │
//! │  right cent, but not always.                                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "10.95" is parsed straight from its text into 1095 cents             │
//! │    1095 × 3 = 3285 cents, exact                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Boundary Rounding
//! The host sends amounts as decimal strings (`"10.95"`) and the discount
//! config sends them as JSON numbers (`45`, `12.5`). Both are normalized here
//! once. Digits past the second decimal place are rounded half away from
//! zero; everything after that is exact integer math.
//!
//! ## Usage
//! ```rust
//! use bundle_core::money::Money;
//!
//! let unit = Money::parse_decimal("10.95").unwrap();
//! let total = unit.checked_multiply_quantity(6).unwrap();
//! let discount = total - Money::from_f64(45.0).unwrap();
//! assert_eq!(discount.to_string(), "20.70");
//! ```

use std::fmt;
use std::ops::{Add, Sub};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a bundle price above the cart total yields a negative
///   discount, which must stay representable
/// - **No currency**: the function never mixes currencies, the host does
///   the presentment conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a decimal amount such as `"10.95"`, `"3"` or `"-0.5"`.
    ///
    /// ## Rules
    /// - Optional leading sign, digits, optional `.` and fractional digits
    /// - No exponent, no thousands separators, no currency symbol
    /// - A third fractional digit of 5 or more rounds the magnitude up
    ///
    /// ## Example
    /// ```rust
    /// use bundle_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("10.95").unwrap().cents(), 1095);
    /// assert_eq!(Money::parse_decimal("1.005").unwrap().cents(), 101);
    /// assert!(Money::parse_decimal("ten").is_err());
    /// ```
    pub fn parse_decimal(text: &str) -> Result<Money, ValidationError> {
        let text = text.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(invalid_amount(format!("'{text}' is not a decimal number")));
        }

        let mut cents: i64 = 0;
        for digit in whole.bytes() {
            cents = cents
                .checked_mul(10)
                .and_then(|c| c.checked_add(i64::from(digit - b'0')))
                .ok_or_else(|| invalid_amount(format!("'{text}' is out of range")))?;
        }

        let mut fraction = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = fraction.next().unwrap_or(0);
        let hundredths = fraction.next().unwrap_or(0);
        let round_up = fraction.next().is_some_and(|d| d >= 5);

        cents = cents
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or_else(|| invalid_amount(format!("'{text}' is out of range")))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Converts a JSON number (tier amounts, numeric unit amounts) to Money.
    ///
    /// The number goes through its shortest decimal rendering, so `10.95`
    /// becomes 1095 cents rather than whatever `10.95 * 100.0` rounds to.
    pub fn from_f64(amount: f64) -> Result<Money, ValidationError> {
        if !amount.is_finite() {
            return Err(invalid_amount(format!("{amount} is not a finite number")));
        }
        Money::parse_decimal(&amount.to_string())
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use bundle_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1095);
    /// assert_eq!(unit_price.checked_multiply_quantity(3).unwrap().cents(), 3285);
    /// assert!(unit_price.checked_multiply_quantity(i64::MAX).is_none());
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

fn invalid_amount(reason: String) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "amount".to_string(),
        reason,
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the amount with exactly two decimals and no currency symbol.
///
/// This is the wire format of `fixedAmount.amount`: `"20.70"`, `"-4.10"`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
