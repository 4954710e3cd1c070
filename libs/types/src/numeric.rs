//! Fixed-point numeric types for prices and quantities
//!
//! Prices are integer ticks in the smallest currency unit (one cent when
//! $1.00 = 100 ticks). Integer arithmetic keeps matching deterministic
//! across platforms; no floating point touches the hot path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Price in ticks of the smallest currency unit.
///
/// Two tick values are reserved: `MARKET` marks an order with no limit
/// price, and `UNCHANGED` marks a replace request that leaves the price
/// alone. Every real limit price is strictly positive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Sentinel for market orders (no limit price).
    pub const MARKET: Price = Price(0);
    /// Sentinel for "keep the current price" in replace requests.
    pub const UNCHANGED: Price = Price(-1);

    /// Create a price from a raw tick count.
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Raw tick count.
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// True for the market-order sentinel.
    pub const fn is_market(self) -> bool {
        self.0 == Self::MARKET.0
    }

    /// True for the replace-request sentinel.
    pub const fn is_unchanged(self) -> bool {
        self.0 == Self::UNCHANGED.0
    }

    /// True for a usable limit price (strictly positive, no sentinel).
    pub const fn is_limit(self) -> bool {
        self.0 > 0
    }
}

impl Sub for Price {
    type Output = Price;

    fn sub(self, rhs: Self) -> Self::Output {
        Price(self.0 - rhs.0)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Self) -> Self::Output {
        Price(self.0 + rhs.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order quantity in whole units.
///
/// `UNCHANGED` is reserved for replace requests that leave the size alone.
/// A resting order's open quantity is strictly positive; it leaves the book
/// the moment it reaches zero.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);
    /// Sentinel for "keep the current size" in replace requests.
    pub const UNCHANGED: Quantity = Quantity(u64::MAX);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_unchanged(self) -> bool {
        self.0 == Self::UNCHANGED.0
    }

    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Self) -> Self::Output {
        Quantity(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(
            self.0 >= rhs.0,
            "quantity subtraction would go negative: {} - {}",
            self.0,
            rhs.0
        );
        Quantity(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::ZERO, Add::add)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_sentinels() {
        assert!(Price::MARKET.is_market());
        assert!(Price::UNCHANGED.is_unchanged());
        assert!(!Price::MARKET.is_limit());
        assert!(!Price::UNCHANGED.is_limit());
        assert!(Price::from_ticks(15000).is_limit());
    }

    #[test]
    fn test_price_ordering() {
        let low = Price::from_ticks(14900);
        let high = Price::from_ticks(15000);
        assert!(low < high);
        assert_eq!((high - low).ticks(), 100);
    }

    #[test]
    fn test_price_serialization() {
        let price = Price::from_ticks(15000);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "15000");

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_quantity_arithmetic() {
        let mut qty = Quantity::new(100);
        qty -= Quantity::new(40);
        assert_eq!(qty, Quantity::new(60));
        qty += Quantity::new(10);
        assert_eq!(qty.value(), 70);
    }

    #[test]
    #[should_panic(expected = "quantity subtraction would go negative")]
    fn test_quantity_underflow_panics() {
        let _ = Quantity::new(10) - Quantity::new(20);
    }

    #[test]
    fn test_quantity_min_and_sum() {
        assert_eq!(Quantity::new(30).min(Quantity::new(50)), Quantity::new(30));

        let total: Quantity = [10u64, 20, 30].iter().map(|&v| Quantity::new(v)).sum();
        assert_eq!(total, Quantity::new(60));
    }

    #[test]
    fn test_quantity_sentinel() {
        assert!(Quantity::UNCHANGED.is_unchanged());
        assert!(!Quantity::new(5).is_unchanged());
        assert!(Quantity::ZERO.is_zero());
    }
}
