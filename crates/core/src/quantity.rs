//! Item quantity.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Non-negative count of units held for an item.
///
/// Persisted records never carry [`Quantity::ZERO`]; the decision logic in
/// `pantry-inventory` deletes a record instead of storing zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);
    pub const ONE: Quantity = Quantity(1);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Quantity) -> Result<Quantity, DomainError> {
        self.0
            .checked_add(other.0)
            .map(Quantity)
            .ok_or_else(|| DomainError::invalid_input("quantity overflow"))
    }

    /// One unit less, saturating at zero.
    pub fn decrement(self) -> Quantity {
        Quantity(self.0.saturating_sub(1))
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        i64::from(value.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(DomainError::invalid_input("quantity cannot be negative"));
        }
        u32::try_from(value)
            .map(Quantity)
            .map_err(|_| DomainError::invalid_input(format!("quantity {value} is too large")))
    }
}

/// Numeric coercion at the form boundary.
impl FromStr for Quantity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(DomainError::invalid_input("quantity is required"));
        }
        let value: i64 = text
            .parse()
            .map_err(|_| DomainError::invalid_input(format!("'{text}' is not a whole number")))?;
        Quantity::try_from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_form_text() {
        assert_eq!(" 12 ".parse::<Quantity>().unwrap(), Quantity::new(12));
        assert_eq!("0".parse::<Quantity>().unwrap(), Quantity::ZERO);
    }

    #[test]
    fn rejects_non_numeric_and_negative_text() {
        for raw in ["", "abc", "1.5", "-3", "99999999999"] {
            assert!(
                matches!(raw.parse::<Quantity>(), Err(DomainError::InvalidInput(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn checked_add_reports_overflow() {
        let max = Quantity::new(u32::MAX);
        assert!(max.checked_add(Quantity::ONE).is_err());
        assert_eq!(
            Quantity::new(3).checked_add(Quantity::new(2)).unwrap(),
            Quantity::new(5)
        );
    }

    #[test]
    fn decrement_saturates() {
        assert_eq!(Quantity::ONE.decrement(), Quantity::ZERO);
        assert_eq!(Quantity::ZERO.decrement(), Quantity::ZERO);
    }

    proptest! {
        /// Property: any non-negative value representable as `u32` survives the form boundary.
        #[test]
        fn text_boundary_accepts_every_u32(v in any::<u32>()) {
            prop_assert_eq!(v.to_string().parse::<Quantity>().unwrap().get(), v);
            prop_assert_eq!(i64::from(Quantity::new(v)), i64::from(v));
        }
    }
}
