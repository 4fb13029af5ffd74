use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Signed money amount represented as **integer cents**.
///
/// Entry amounts are non-negative, balances may go negative. Integer cents
/// keep repeated propagation runs bit-identical.
///
/// # Examples
///
/// ```rust
/// use ledger::MoneyCents;
///
/// let amount: MoneyCents = "12,5".parse().unwrap();
/// assert_eq!(amount.cents(), 1250);
/// assert_eq!(amount.to_string(), "12.50");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// Amount repeated `count` times, as contributed by `count` occurrences.
    /// Returns `None` on overflow.
    #[must_use]
    pub fn checked_times(self, count: usize) -> Option<MoneyCents> {
        let count = i64::try_from(count).ok()?;
        self.0.checked_mul(count).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for MoneyCents {
    type Err = LedgerError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator, an optional leading `+`/`-`
    /// and at most two fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| LedgerError::InvalidAmount(format!("{reason}: {s:?}"));

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            Some(_) => (false, trimmed),
            None => return Err(invalid("empty amount")),
        };

        let normalized = digits.trim().replace(',', ".");
        let (units, fraction) = normalized
            .split_once('.')
            .unwrap_or((normalized.as_str(), ""));

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(invalid("invalid amount"));
        }
        if fraction.len() > 2 {
            return Err(invalid("too many decimals"));
        }

        let units: i64 = units.parse().map_err(|_| invalid("amount too large"))?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("invalid amount"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("invalid amount"))?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(fraction))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(MoneyCents(if negative { -cents } else { cents }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_cents() {
        assert_eq!(MoneyCents::ZERO.to_string(), "0.00");
        assert_eq!(MoneyCents::new(7).to_string(), "0.07");
        assert_eq!(MoneyCents::new(250_000).to_string(), "2500.00");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
        assert_eq!(" +2.30 ".parse::<MoneyCents>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<MoneyCents>().is_err());
        assert!("12.345".parse::<MoneyCents>().is_err());
        assert!("1.2.3".parse::<MoneyCents>().is_err());
        assert!("abc".parse::<MoneyCents>().is_err());
        assert!(".50".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn checked_arithmetic() {
        let weekly = MoneyCents::new(100_00);
        assert_eq!(weekly.checked_times(4), Some(MoneyCents::new(400_00)));
        assert_eq!(weekly.checked_times(0), Some(MoneyCents::ZERO));
        assert_eq!(
            MoneyCents::new(7).checked_sub(MoneyCents::new(10)),
            Some(MoneyCents::new(-3))
        );
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let huge: MoneyCents = "92233720368547758.07".parse().unwrap();
        assert_eq!(huge.cents(), i64::MAX);
        assert_eq!(huge.checked_times(2), None);
        assert_eq!(huge.checked_add(MoneyCents::new(1)), None);
        assert_eq!(MoneyCents::new(i64::MIN).checked_sub(MoneyCents::new(1)), None);
        assert_eq!(huge.checked_times(1), Some(huge));
    }
}
