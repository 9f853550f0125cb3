use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{EngineError, ResultEngine};

/// Signed money amount represented as integer **minor units** (the smallest
/// unit of the currency).
///
/// Use this type for **all** monetary values in the engine (prices, pay,
/// revenues, wallet balances) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let price = Money::new(2_000_000);
/// let pay = Money::new(1_400_000);
/// assert_eq!((price - pay).minor(), 600_000);
/// assert_eq!(price.to_string(), "2,000,000");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest magnitude accepted from requests or storage.
    ///
    /// Sums of up to 900,000 such amounts stay inside `i64`, so settlement
    /// folds over validated amounts never overflow.
    pub const MAX: Money = Money(10_000_000_000_000);

    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Rejects amounts outside `0..=Money::MAX`, labelling the error with `label`.
    pub fn ensure_non_negative(self, label: &str) -> ResultEngine<Self> {
        if self.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "{label} must be >= 0"
            )));
        }
        self.ensure_bounded(label)
    }

    /// Rejects amounts whose magnitude exceeds [`Money::MAX`].
    pub fn ensure_bounded(self, label: &str) -> ResultEngine<Self> {
        if self.0.unsigned_abs() > Self::MAX.0.unsigned_abs() {
            return Err(EngineError::InvalidAmount(format!(
                "{label} exceeds {}",
                Self::MAX
            )));
        }
        Ok(self)
    }

    /// Saturating addition, for figures derived from unbounded multipliers.
    #[must_use]
    pub fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{sign}{grouped}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

/// A percentage in `[0, 100]`, held as basis points (hundredths of a percent).
///
/// Commission, driver share and platform fees are all rates. Applying a rate
/// to an amount rounds half-up to the nearest minor unit, using integer
/// arithmetic only.
///
/// ```rust
/// use engine::{Money, Rate};
///
/// let commission = Rate::from_percent(70.0).unwrap();
/// assert_eq!(commission.apply(Money::new(2_000_000)), Money::new(1_400_000));
/// assert_eq!(Rate::from_percent(50.0).unwrap().apply(Money::new(3)), Money::new(2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rate(u32);

impl Rate {
    const FULL: u32 = 10_000;

    pub const ZERO: Rate = Rate(0);

    /// Builds a rate from basis points (`0..=10_000`).
    pub fn from_basis_points(bp: u32) -> ResultEngine<Self> {
        if bp > Self::FULL {
            return Err(EngineError::InvalidRate(format!(
                "{bp} basis points exceeds 100%"
            )));
        }
        Ok(Self(bp))
    }

    /// `const` variant of [`Rate::from_basis_points`], for built-in rates.
    pub const fn const_from_basis_points(bp: u32) -> Option<Self> {
        if bp > Self::FULL { None } else { Some(Self(bp)) }
    }

    /// Builds a rate from a percent value such as `70.0` or `12.5`.
    ///
    /// Precision beyond two decimals is rounded to the nearest basis point.
    pub fn from_percent(percent: f64) -> ResultEngine<Self> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(EngineError::InvalidRate(format!(
                "{percent} is outside [0, 100]"
            )));
        }
        Ok(Self((percent * 100.0).round() as u32))
    }

    #[must_use]
    pub const fn basis_points(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn percent(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Returns `round_half_up(amount * self)`.
    ///
    /// Negative amounts round half away from zero, so `apply(-x) == -apply(x)`.
    #[must_use]
    pub fn apply(self, amount: Money) -> Money {
        let full = i128::from(Self::FULL);
        let scaled = i128::from(amount.minor()) * i128::from(self.0);
        let half = full / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / full
        } else {
            -((-scaled + half) / full)
        };
        // |rounded| <= |amount| because the rate is at most 100%.
        Money::new(rounded as i64)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.percent())
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let percent = f64::deserialize(deserializer)?;
        Rate::from_percent(percent).map_err(serde::de::Error::custom)
    }
}
