//! Reclaimability tiers
//!
//! A tier says when the collector may take a payload away:
//!
//! - **Hard**: never, as long as the reference itself is alive
//! - **Soft**: only when the heap runs a pressure collection (or the soft
//!   retention limit is exceeded)
//! - **Weak**: on any collection
//!
//! The tier exists twice: as the runtime tag [`Tier`] and as the zero-sized
//! markers [`Hard`], [`Soft`] and [`Weak`] that parameterize references, so
//! two references can only be combined when their tiers agree.

use std::fmt;

/// Runtime tag for a reclaimability class.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Never reclaimed while reachable
    Hard = 0,
    /// Reclaimed under memory pressure
    Soft = 1,
    /// Reclaimed on any collection
    Weak = 2,
}

impl Tier {
    /// All tiers in declaration order.
    pub const ALL: [Tier; 3] = [Tier::Hard, Tier::Soft, Tier::Weak];

    /// Whether the collector may clear payloads of this tier.
    pub fn is_reclaimable(self) -> bool {
        !matches!(self, Tier::Hard)
    }

    /// Lower-case name, as used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            Tier::Hard => "hard",
            Tier::Soft => "soft",
            Tier::Weak => "weak",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level tier marker.
///
/// Sealed: the only implementors are [`Hard`], [`Soft`] and [`Weak`].
pub trait TierKind: sealed::Sealed + Send + Sync + 'static {
    /// The runtime tag for this marker
    const TIER: Tier;
}

/// Marker for the hard tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hard;

/// Marker for the soft tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Soft;

/// Marker for the weak tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Weak;

impl sealed::Sealed for Hard {}
impl sealed::Sealed for Soft {}
impl sealed::Sealed for Weak {}

impl TierKind for Hard {
    const TIER: Tier = Tier::Hard;
}

impl TierKind for Soft {
    const TIER: Tier = Tier::Soft;
}

impl TierKind for Weak {
    const TIER: Tier = Tier::Weak;
}
