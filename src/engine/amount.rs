use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Units stored per whole currency unit.
const SCALE: i64 = 10_000;

/// Store an amount of money.
/// It is using internally an i64 in order to avoid floating point rounding error.
/// The Amount precision is four places past the decimal, it is displayed with two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    store: i64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("'{0}' is not a valid amount")]
    Parse(String),

    #[error("Overflow error while computing Amount")]
    Overflow,

    #[error("Underflow error while computing Amount")]
    Underflow,
}

impl Amount {
    pub const ZERO: Amount = Amount { store: 0 };

    /// Builds an amount from ten-thousandths of a currency unit.
    pub const fn from_units(units: i64) -> Self {
        Amount { store: units }
    }

    pub fn is_zero(&self) -> bool {
        self.store == 0
    }

    pub fn add(&self, other: &Amount) -> Result<Amount, AmountError> {
        self.store
            .checked_add(other.store)
            .map(Amount::from_units)
            .ok_or(AmountError::Overflow)
    }

    pub fn sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        self.store
            .checked_sub(other.store)
            .map(Amount::from_units)
            .ok_or(AmountError::Underflow)
    }

    /// True when the two amounts differ by strictly less than `tolerance`.
    pub fn is_close_to(&self, other: &Amount, tolerance: Amount) -> bool {
        self.store.abs_diff(other.store) < tolerance.store.unsigned_abs()
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || AmountError::Parse(s.to_owned());

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (left_part, decimal_part) = match unsigned.split_once('.') {
            Some((left, right)) => (left, Some(right)),
            None => (unsigned, None),
        };

        // ".05" is fine, "." and "" are not
        if left_part.is_empty() && decimal_part.is_none_or(str::is_empty) {
            return Err(invalid());
        }

        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !digits_only(left_part) || !decimal_part.is_none_or(digits_only) {
            return Err(invalid());
        }

        let whole: i64 = if left_part.is_empty() {
            0
        } else {
            left_part.parse().map_err(|_| invalid())?
        };

        // Keep four digits for the decimal part, extra digits are truncated
        let mut decimals = decimal_part.unwrap_or_default().to_owned();
        decimals.truncate(4);
        while decimals.len() < 4 {
            decimals.push('0');
        }
        let fraction: i64 = decimals.parse().map_err(|_| invalid())?;

        let total = whole
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(fraction))
            .ok_or(AmountError::Overflow)?;

        Ok(Amount::from_units(if negative { -total } else { total }))
    }
}

impl fmt::Display for Amount {
    /// Two decimals, rounding half away from zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hundredths = (self.store.unsigned_abs() + 50) / 100;
        let sign = if self.store < 0 && hundredths != 0 { "-" } else { "" };

        write!(f, "{}{}.{:02}", sign, hundredths / 100, hundredths % 100)
    }
}
