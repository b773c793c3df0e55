use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Overflow error while applying {0} operation on {1} and {2}")]
    Overflow(&'static str, Money, Money),

    #[error("Money parse error: {0}, {1:?}")]
    Parse(&'static str, String),
}

/// Amount of currency in minor units (cents)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);

    const CENTS_PER_UNIT: i64 = 100;

    /// Parses a decimal string with at most two fractional digits, ie. "12", "12.5", "-0.75"
    pub fn parse(string: &str) -> Result<Self, MoneyError> {
        let trimmed = string.trim();

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let mut parts = unsigned.split('.');

        let units = parts.next().unwrap_or_default();
        let cents = parts.next();

        if parts.next().is_some() {
            return Err(MoneyError::Parse("Too many decimal points", string.to_string()));
        }

        if units.is_empty() && cents.map_or(true, str::is_empty) {
            return Err(MoneyError::Parse("No digits", string.to_string()));
        }

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());

        if !all_digits(units) || !cents.map_or(true, all_digits) {
            return Err(MoneyError::Parse("Invalid digit", string.to_string()));
        }

        let cents = match cents {
            None => "00".to_string(),
            Some(cents) if cents.len() > 2 => {
                return Err(MoneyError::Parse("Too many decimal places", string.to_string()))
            }
            Some(cents) => format!("{:0<2}", cents),
        };

        let too_large = || MoneyError::Parse("Amount too large", string.to_string());

        let units: i64 = if units.is_empty() {
            0
        } else {
            units.parse().map_err(|_| too_large())?
        };
        let cents: i64 = cents.parse().map_err(|_| too_large())?;

        let magnitude = units
            .checked_mul(Self::CENTS_PER_UNIT)
            .and_then(|value| value.checked_add(cents))
            .ok_or_else(too_large)?;

        Ok(Money(if negative { -magnitude } else { magnitude }))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds `other` in place. On overflow `self` is left unchanged.
    pub fn add(&mut self, other: &Self) -> Result<(), MoneyError> {
        self.0 = self
            .0
            .checked_add(other.0)
            .ok_or(MoneyError::Overflow("add", *self, *other))?;

        Ok(())
    }

    /// Subtracts `other` in place. On overflow `self` is left unchanged.
    pub fn sub(&mut self, other: &Self) -> Result<(), MoneyError> {
        self.0 = self
            .0
            .checked_sub(other.0)
            .ok_or(MoneyError::Overflow("sub", *self, *other))?;

        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per_unit = Self::CENTS_PER_UNIT as u64;

        write!(f, "{sign}{}.{:02}", magnitude / per_unit, magnitude % per_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(Money::parse("12").unwrap(), Money(1200));
        assert_eq!(Money::parse("12.5").unwrap(), Money(1250));
        assert_eq!(Money::parse("12.05").unwrap(), Money(1205));
        assert_eq!(Money::parse(".75").unwrap(), Money(75));
        assert_eq!(Money::parse(" 3. ").unwrap(), Money(300));
    }

    #[test]
    fn parse_negative() {
        assert_eq!(Money::parse("-0.50").unwrap(), Money(-50));
        assert_eq!(Money::parse("-10").unwrap(), Money(-1000));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("1.234").is_err());
        assert!(Money::parse("12a").is_err());
        assert!(Money::parse("+5").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Money(0).to_string(), "0.00");
        assert_eq!(Money(5).to_string(), "0.05");
        assert_eq!(Money(1000000).to_string(), "10000.00");
        assert_eq!(Money(-1250).to_string(), "-12.50");
        assert_eq!(Money::MIN.to_string(), "-92233720368547758.08");
    }

    #[test]
    fn add_and_sub() {
        let mut money = Money(1000);

        money.add(&Money(250)).unwrap();
        assert_eq!(money, Money(1250));

        money.sub(&Money(1300)).unwrap();
        assert_eq!(money, Money(-50));
    }

    #[test]
    fn overflow_leaves_value_unchanged() {
        let mut money = Money::MAX;

        let res = money.add(&Money(1));
        assert_eq!(res, Err(MoneyError::Overflow("add", Money::MAX, Money(1))));
        assert_eq!(money, Money::MAX);

        let mut money = Money::MIN;
        assert!(money.sub(&Money(1)).is_err());
        assert_eq!(money, Money::MIN);
    }
}
