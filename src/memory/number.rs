//! Numeric values of the Whitespace machine
//!
//! Every cell on the data stack and in the heap is a [`Number`]. Two back ends
//! implement it:
//!
//! - `i64`: fixed-width machine integer. Arithmetic wraps on overflow
//!   (two's complement), so `i64::MIN / -1 == i64::MIN`.
//! - [`BigInt`]: arbitrary precision, never overflows.
//!
//! Apart from overflow both behave identically. Division and modulo truncate
//! toward zero, so the remainder carries the sign of the dividend:
//!
//! ```text
//!  7 /  2 ==  3     7 %  2 ==  1
//! -7 /  2 == -3    -7 %  2 == -1
//!  7 / -2 == -3     7 % -2 ==  1
//! ```

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

/// Integer capability required by the execution engine
pub trait Number:
    Clone + Default + PartialEq + fmt::Debug + fmt::Display + fmt::LowerHex + 'static
{
    /// Short name of the back end, shown in the status bar
    const NAME: &'static str;

    fn from_i64(value: i64) -> Self;

    /// Shift one literal bit in from the right (`self * 2 + bit`)
    fn push_bit(&mut self, bit: bool);

    fn negate(&self) -> Self;

    fn plus(&self, rhs: &Self) -> Self;
    fn minus(&self, rhs: &Self) -> Self;
    fn times(&self, rhs: &Self) -> Self;

    /// Truncating division, `None` when `rhs` is zero
    fn quotient(&self, rhs: &Self) -> Option<Self>;

    /// Remainder of truncating division, `None` when `rhs` is zero
    fn remainder(&self, rhs: &Self) -> Option<Self>;

    fn cmp_zero(&self) -> Ordering;

    fn to_i64(&self) -> Option<i64>;

    /// Low 8 bits in two's complement, used by the output-character instruction
    fn low_byte(&self) -> u8;

    /// Parse an optionally signed integer: decimal, `0x` hexadecimal, `0b`
    /// binary or leading-zero octal
    fn parse_number(text: &str) -> Option<Self>;

    /// Convert to a heap address. Negative values and values that do not fit
    /// a `usize` have no address.
    fn to_address(&self) -> Option<usize> {
        if self.cmp_zero() == Ordering::Less {
            return None;
        }
        self.to_i64().and_then(|v| usize::try_from(v).ok())
    }
}

/// Split number input into sign, radix and digits. The whole text must be
/// valid digits for the radix.
fn split_number(text: &str) -> Option<(bool, u32, &str)> {
    let (negative, rest) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = if let Some(hex) = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
    {
        (16, hex)
    } else if let Some(bin) = rest
        .strip_prefix("0b")
        .or_else(|| rest.strip_prefix("0B"))
    {
        (2, bin)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Some((negative, radix, digits))
}

impl Number for i64 {
    const NAME: &'static str = "i64";

    fn from_i64(value: i64) -> Self {
        value
    }

    fn push_bit(&mut self, bit: bool) {
        *self = self.wrapping_mul(2).wrapping_add(bit as i64);
    }

    fn negate(&self) -> Self {
        self.wrapping_neg()
    }

    fn plus(&self, rhs: &Self) -> Self {
        self.wrapping_add(*rhs)
    }

    fn minus(&self, rhs: &Self) -> Self {
        self.wrapping_sub(*rhs)
    }

    fn times(&self, rhs: &Self) -> Self {
        self.wrapping_mul(*rhs)
    }

    fn quotient(&self, rhs: &Self) -> Option<Self> {
        (*rhs != 0).then(|| self.wrapping_div(*rhs))
    }

    fn remainder(&self, rhs: &Self) -> Option<Self> {
        (*rhs != 0).then(|| self.wrapping_rem(*rhs))
    }

    fn cmp_zero(&self) -> Ordering {
        self.cmp(&0)
    }

    fn to_i64(&self) -> Option<i64> {
        Some(*self)
    }

    fn low_byte(&self) -> u8 {
        *self as u8
    }

    fn parse_number(text: &str) -> Option<Self> {
        let (negative, radix, digits) = split_number(text)?;
        let mut value: i64 = 0;
        for c in digits.chars() {
            let digit = c.to_digit(radix)? as i64;
            value = value.wrapping_mul(radix as i64).wrapping_add(digit);
        }
        Some(if negative { value.wrapping_neg() } else { value })
    }
}

impl Number for BigInt {
    const NAME: &'static str = "bigint";

    fn from_i64(value: i64) -> Self {
        BigInt::from(value)
    }

    fn push_bit(&mut self, bit: bool) {
        *self <<= 1usize;
        if bit {
            *self += 1u32;
        }
    }

    fn negate(&self) -> Self {
        -self
    }

    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn minus(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn times(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn quotient(&self, rhs: &Self) -> Option<Self> {
        // `/` on BigInt rounds toward zero, like the machine integer
        (!rhs.is_zero()).then(|| self / rhs)
    }

    fn remainder(&self, rhs: &Self) -> Option<Self> {
        (!rhs.is_zero()).then(|| self % rhs)
    }

    fn cmp_zero(&self) -> Ordering {
        if self.is_negative() {
            Ordering::Less
        } else if self.is_zero() {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }

    fn to_i64(&self) -> Option<i64> {
        ToPrimitive::to_i64(self)
    }

    fn low_byte(&self) -> u8 {
        let modulus = BigInt::from(256);
        let mut low = self % &modulus;
        if low.is_negative() {
            low += &modulus;
        }
        low.to_u8().unwrap_or(0)
    }

    fn parse_number(text: &str) -> Option<Self> {
        let (negative, radix, digits) = split_number(text)?;
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix)?;
        Some(if negative { -magnitude } else { magnitude })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truncation_table<N: Number>() {
        let n = |v: i64| N::from_i64(v);
        assert_eq!(n(7).quotient(&n(2)), Some(n(3)));
        assert_eq!(n(-7).quotient(&n(2)), Some(n(-3)));
        assert_eq!(n(7).quotient(&n(-2)), Some(n(-3)));
        assert_eq!(n(7).remainder(&n(2)), Some(n(1)));
        assert_eq!(n(-7).remainder(&n(2)), Some(n(-1)));
        assert_eq!(n(7).remainder(&n(-2)), Some(n(1)));
        assert_eq!(n(1).quotient(&n(0)), None);
        assert_eq!(n(1).remainder(&n(0)), None);
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        truncation_table::<i64>();
        truncation_table::<BigInt>();
    }

    #[test]
    fn test_fixed_width_wraps() {
        assert_eq!(i64::MAX.plus(&1), i64::MIN);
        assert_eq!(i64::MIN.quotient(&-1), Some(i64::MIN));
        assert_eq!(i64::MIN.remainder(&-1), Some(0));
    }

    #[test]
    fn test_bigint_does_not_overflow() {
        let max = BigInt::from(i64::MAX);
        let sum = max.plus(&BigInt::from(1));
        assert!(sum.cmp_zero() == Ordering::Greater);
        assert_eq!(Number::to_i64(&sum), None);
        assert_eq!(sum.to_address(), None);
    }

    #[test]
    fn test_low_byte_of_negative_values() {
        assert_eq!((-1i64).low_byte(), 0xff);
        assert_eq!(BigInt::from(-1).low_byte(), 0xff);
        assert_eq!(BigInt::from(0x141).low_byte(), 0x41);
        assert_eq!(0x141i64.low_byte(), 0x41);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(i64::parse_number("+42"), Some(42));
        assert_eq!(i64::parse_number("-17"), Some(-17));
        assert_eq!(i64::parse_number("0"), Some(0));
        assert_eq!(i64::parse_number("4x"), None);
        assert_eq!(i64::parse_number("-"), None);
        assert_eq!(BigInt::parse_number("-17"), Some(BigInt::from(-17)));
        assert_eq!(BigInt::parse_number(""), None);
    }

    #[test]
    fn test_parse_number_prefixes() {
        assert_eq!(i64::parse_number("0x1f"), Some(31));
        assert_eq!(i64::parse_number("-0X1F"), Some(-31));
        assert_eq!(i64::parse_number("017"), Some(15));
        assert_eq!(i64::parse_number("0b101"), Some(5));
        assert_eq!(i64::parse_number("09"), None);
        assert_eq!(i64::parse_number("0x"), None);
        assert_eq!(BigInt::parse_number("0x1f"), Some(BigInt::from(31)));
        assert_eq!(BigInt::parse_number("-017"), Some(BigInt::from(-15)));
    }

    #[test]
    fn test_negative_values_have_no_address() {
        assert_eq!((-3i64).to_address(), None);
        assert_eq!(5i64.to_address(), Some(5));
        assert_eq!(BigInt::from(-3).to_address(), None);
    }
}
