//! Artwork lifecycle states as reported by the external contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of an artwork along its custody chain.
///
/// The ordinals match the contract's numeric state codes. Any code outside
/// `0..=7` maps to [`LifecycleState::Unknown`], which only arises from a
/// failed lookup and takes no part in the transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Created,
    Framed,
    AdoptionOffered,
    Adopted,
    Packed,
    PickedUp,
    Shipped,
    Delivered,
    #[default]
    Unknown,
}

impl LifecycleState {
    /// All participating states in transition order.
    pub const ORDER: [LifecycleState; 8] = [
        LifecycleState::Created,
        LifecycleState::Framed,
        LifecycleState::AdoptionOffered,
        LifecycleState::Adopted,
        LifecycleState::Packed,
        LifecycleState::PickedUp,
        LifecycleState::Shipped,
        LifecycleState::Delivered,
    ];

    /// Map a contract state code to a state.
    pub fn from_code(code: u64) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ORDER.get(i).copied())
            .unwrap_or(LifecycleState::Unknown)
    }

    /// Contract state code, or `None` for `Unknown`.
    pub fn code(self) -> Option<u8> {
        Self::ORDER
            .iter()
            .position(|s| *s == self)
            .map(|i| i as u8)
    }

    /// The state reached by the single transition leaving this one.
    pub fn next(self) -> Option<LifecycleState> {
        let code = self.code()? as usize;
        Self::ORDER.get(code + 1).copied()
    }

    pub fn is_known(self) -> bool {
        self != LifecycleState::Unknown
    }

    /// `Delivered` has no outgoing transition.
    pub fn is_terminal(self) -> bool {
        self == LifecycleState::Delivered
    }

    /// Human-facing status label.
    pub fn label(self) -> &'static str {
        match self {
            LifecycleState::Created => "Artwork Created",
            LifecycleState::Framed => "Artwork Framed",
            LifecycleState::AdoptionOffered => "Artwork Put Up For Adoption",
            LifecycleState::Adopted => "Artwork Adopted",
            LifecycleState::Packed => "Artwork Packed",
            LifecycleState::PickedUp => "Artwork Picked Up",
            LifecycleState::Shipped => "Artwork marked as Shipped",
            LifecycleState::Delivered => "Artwork has been Delivered",
            LifecycleState::Unknown => "Artwork not on Blockchain",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "Created",
            LifecycleState::Framed => "Framed",
            LifecycleState::AdoptionOffered => "AdoptionOffered",
            LifecycleState::Adopted => "Adopted",
            LifecycleState::Packed => "Packed",
            LifecycleState::PickedUp => "PickedUp",
            LifecycleState::Shipped => "Shipped",
            LifecycleState::Delivered => "Delivered",
            LifecycleState::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_known_states() {
        for (i, state) in LifecycleState::ORDER.iter().enumerate() {
            assert_eq!(state.code(), Some(i as u8));
            assert_eq!(LifecycleState::from_code(i as u64), *state);
        }
    }

    #[test]
    fn out_of_range_codes_are_unknown() {
        assert_eq!(LifecycleState::from_code(8), LifecycleState::Unknown);
        assert_eq!(LifecycleState::from_code(u64::MAX), LifecycleState::Unknown);
        assert_eq!(LifecycleState::Unknown.code(), None);
    }

    #[test]
    fn next_walks_the_linear_order() {
        assert_eq!(
            LifecycleState::Created.next(),
            Some(LifecycleState::Framed)
        );
        assert_eq!(
            LifecycleState::Shipped.next(),
            Some(LifecycleState::Delivered)
        );
        assert_eq!(LifecycleState::Delivered.next(), None);
        assert_eq!(LifecycleState::Unknown.next(), None);
        assert!(LifecycleState::Delivered.is_terminal());
    }

    #[test]
    fn labels() {
        assert_eq!(
            LifecycleState::AdoptionOffered.label(),
            "Artwork Put Up For Adoption"
        );
        assert_eq!(LifecycleState::Unknown.label(), "Artwork not on Blockchain");
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(LifecycleState::default(), LifecycleState::Unknown);
    }
}
