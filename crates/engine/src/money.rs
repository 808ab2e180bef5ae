use std::{fmt, iter::Sum, ops::Add, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// An amount of euros held as whole cents.
///
/// Invoices and payments are booked as `MoneyCents`. Shares are computed on
/// unrounded euro values and turned back into cents once, when a total is
/// shown.
///
/// ```rust
/// use engine::MoneyCents;
///
/// let fuel: MoneyCents = "1190,00".parse().unwrap();
/// assert_eq!(fuel.cents(), 119_000);
/// assert_eq!(fuel.to_string(), "1190.00€");
/// assert_eq!(MoneyCents::from_major(fuel.to_major() / 3.0).cents(), 39_667);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Unrounded value in euros.
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Nearest cent of a euro value, halves away from zero.
    ///
    /// Only final totals go through here; shares stay unrounded.
    #[must_use]
    pub fn from_major(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "{}.{:02}€", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl From<MoneyCents> for i64 {
    fn from(amount: MoneyCents) -> Self {
        amount.0
    }
}

impl Add for MoneyCents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

fn digits(part: &str) -> Option<i64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Reads `1234`, `1234.5` or `1234,56` with an optional sign.
    /// More than two decimals are rejected rather than rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| EngineError::InvalidAmount(format!("{why}: {:?}", s.trim()));

        let text = s.trim();
        let (negative, text) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (whole, fraction) = match text.split_once([',', '.']) {
            Some((whole, fraction)) => (whole, fraction),
            None => (text, ""),
        };

        let euros = digits(whole).ok_or_else(|| invalid("invalid amount"))?;
        let cents = match fraction.len() {
            0 => 0,
            1 => digits(fraction).ok_or_else(|| invalid("invalid amount"))? * 10,
            2 => digits(fraction).ok_or_else(|| invalid("invalid amount"))?,
            _ => return Err(invalid("too many decimals")),
        };

        let total = euros
            .checked_mul(100)
            .and_then(|value| value.checked_add(cents))
            .ok_or_else(|| invalid("amount too large"))?;
        Ok(Self(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<i64, EngineError> {
        text.parse::<MoneyCents>().map(MoneyCents::cents)
    }

    #[test]
    fn displays_euros() {
        assert_eq!(MoneyCents::new(7).to_string(), "0.07€");
        assert_eq!(MoneyCents::new(158_910).to_string(), "1589.10€");
        assert_eq!(MoneyCents::new(-8_000).to_string(), "-80.00€");
    }

    #[test]
    fn parses_invoice_amounts() {
        assert_eq!(parse("1190"), Ok(119_000));
        assert_eq!(parse("1190,5"), Ok(119_050));
        assert_eq!(parse(" 464.10 "), Ok(46_410));
        assert_eq!(parse("-0,01"), Ok(-1));
        assert_eq!(parse("+3."), Ok(300));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for text in ["", "-", ",50", "1.2.3", "12,345", "1e3", "zwölf"] {
            assert!(parse(text).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn sums_and_rounds_once() {
        let total: MoneyCents = [100_000, 40_000, 30_000]
            .into_iter()
            .map(MoneyCents::new)
            .sum();
        assert_eq!(total.cents(), 170_000);

        // Thirds round down one by one, their unrounded sum does not.
        let third = 100.0 / 3.0;
        assert_eq!(MoneyCents::from_major(third).cents(), 3333);
        assert_eq!(MoneyCents::from_major(third * 3.0).cents(), 10_000);
        assert_eq!(MoneyCents::from_major(-0.125).cents(), -13);
    }
}
