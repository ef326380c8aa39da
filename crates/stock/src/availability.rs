use serde::{Deserialize, Serialize};

use comanda_core::ValueObject;

/// Maximum fulfillable quantity of a dish given current stock.
///
/// A dish with an empty recipe consumes no tracked stock and reports
/// `Unlimited` — a distinct tag rather than a large magic number, so it can
/// never be confused with a real count or overflow arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Unlimited,
    /// Bounded by the scarcest ingredient in the recipe.
    Units(u64),
}

impl Availability {
    /// Whether this availability satisfies a requested quantity.
    pub fn covers(self, quantity: u64) -> bool {
        match self {
            Availability::Unlimited => true,
            Availability::Units(n) => n >= quantity,
        }
    }

    /// The availability as a plain count, for display and messages.
    ///
    /// `Unlimited` reports `u64::MAX`.
    pub fn units(self) -> u64 {
        match self {
            Availability::Unlimited => u64::MAX,
            Availability::Units(n) => n,
        }
    }

    pub fn is_unlimited(self) -> bool {
        matches!(self, Availability::Unlimited)
    }
}

impl ValueObject for Availability {}

impl core::fmt::Display for Availability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Availability::Unlimited => f.write_str("unlimited"),
            Availability::Units(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_covers_any_quantity() {
        assert!(Availability::Unlimited.covers(1));
        assert!(Availability::Unlimited.covers(u64::MAX));
    }

    #[test]
    fn units_cover_up_to_the_count() {
        assert!(Availability::Units(5).covers(5));
        assert!(!Availability::Units(5).covers(6));
        assert!(!Availability::Units(0).covers(1));
    }
}
