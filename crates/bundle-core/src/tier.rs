//! # Tier Selection
//!
//! Picks the tier a cart qualifies for.
//!
//! ## Selection Rule
//! ```text
//! tiers (any order):   { 3: 10% }   { 9: 20% }   { 6: 17% }   { 6: 15% }
//! total quantity: 7
//!                          │            │            │            │
//!   quantity ≤ 7?          ✓            ✗            ✓            ✓
//!                          └────────────┬────────────┴────────────┘
//!                                       ▼
//!   highest threshold, first one wins a tie ──► { 6: 17% }
//! ```
//!
//! When nothing qualifies the result is [`TierSelection::Fallback`], an
//! explicit stand-in for "no tier" with an empty title and zero amounts.

use crate::types::Tier;

/// The "no tier" stand-in returned by [`TierSelection::tier`].
static FALLBACK_TIER: Tier = Tier {
    title: String::new(),
    quantity: 0,
    amount: 0.0,
};

/// Outcome of [`select_tier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierSelection<'a> {
    /// A configured tier qualifies.
    Matched(&'a Tier),
    /// No configured tier qualifies.
    Fallback,
}

impl<'a> TierSelection<'a> {
    /// The selected tier, or the fallback tier: empty title, zero quantity,
    /// zero amount. Callers that must not price the fallback check
    /// [`is_fallback`](Self::is_fallback) first.
    pub fn tier(&self) -> &'a Tier {
        match *self {
            TierSelection::Matched(tier) => tier,
            TierSelection::Fallback => &FALLBACK_TIER,
        }
    }

    /// True when no configured tier qualified.
    pub fn is_fallback(&self) -> bool {
        matches!(self, TierSelection::Fallback)
    }
}

/// Selects the qualifying tier with the highest `quantity` threshold.
///
/// A tier qualifies when `tier.quantity <= total_quantity`. Among tiers with
/// the same threshold the earliest one in `tiers` wins. A tier with
/// threshold 0 qualifies for every cart, including an empty one.
///
/// ## Example
/// ```rust
/// use bundle_core::tier::{select_tier, TierSelection};
/// use bundle_core::types::Tier;
///
/// let tiers = vec![
///     Tier { title: "3+".into(), quantity: 3, amount: 10.0 },
///     Tier { title: "6+".into(), quantity: 6, amount: 17.0 },
/// ];
/// assert_eq!(select_tier(&tiers, 7).tier().title, "6+");
/// assert_eq!(select_tier(&tiers, 2), TierSelection::Fallback);
/// ```
pub fn select_tier(tiers: &[Tier], total_quantity: i64) -> TierSelection<'_> {
    tiers
        .iter()
        .filter(|tier| qualifies(tier, total_quantity))
        .fold(None, |best: Option<&Tier>, tier| match best {
            Some(current) if tier.quantity <= current.quantity => Some(current),
            _ => Some(tier),
        })
        .map_or(TierSelection::Fallback, TierSelection::Matched)
}

fn qualifies(tier: &Tier, total_quantity: i64) -> bool {
    i64::try_from(tier.quantity).is_ok_and(|threshold| threshold <= total_quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================
