//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Rupiah                                           │
//! │    The rupiah is a zero-decimal currency in practice, so every          │
//! │    amount in the system is a whole-rupiah i64. No rounding, ever.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gudang_core::money::Money;
//!
//! let price = Money::from_rupiah(12_500);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.rupiah(), 37_500);
//! assert_eq!(line.to_string(), "Rp37.500");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in whole Indonesian rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for losses in profit reports
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use gudang_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(3_500);
    /// let subtotal = unit_price.multiply_quantity(4);
    /// assert_eq!(subtotal.rupiah(), 14_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in the Indonesian locale
/// (`Rp` prefix, dot as thousands separator): `Rp12.500`.
///
/// Used verbatim by the CSV exports and notification messages.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "{}Rp{}", sign, grouped)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over iterators of Money (report totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupiah() {
        let money = Money::from_rupiah(8_999_000);
        assert_eq!(money.rupiah(), 8_999_000);
    }

    #[test]
    fn test_display_indonesian_grouping() {
        assert_eq!(format!("{}", Money::from_rupiah(0)), "Rp0");
        assert_eq!(format!("{}", Money::from_rupiah(500)), "Rp500");
        assert_eq!(format!("{}", Money::from_rupiah(3_500)), "Rp3.500");
        assert_eq!(format!("{}", Money::from_rupiah(12_500)), "Rp12.500");
        assert_eq!(format!("{}", Money::from_rupiah(8_999_000)), "Rp8.999.000");
        assert_eq!(format!("{}", Money::from_rupiah(-550_000)), "-Rp550.000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupiah(1_000);
        let b = Money::from_rupiah(500);

        assert_eq!((a + b).rupiah(), 1_500);
        assert_eq!((a - b).rupiah(), 500);
        let result: Money = a * 3;
        assert_eq!(result.rupiah(), 3_000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_rupiah(1_000);
        let subtotal = unit_price.multiply_quantity(4);
        assert_eq!(subtotal.rupiah(), 4_000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1_000, 2_500, 4_000]
            .iter()
            .map(|&r| Money::from_rupiah(r))
            .sum();
        assert_eq!(total.rupiah(), 7_500);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_rupiah(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().rupiah(), 100);
    }
}
