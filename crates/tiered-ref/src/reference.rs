//! The unified reference type.

use std::fmt;
use std::sync::Arc;

use crate::direct::DirectRef;
use crate::error::Result;
use crate::heap::Heap;
use crate::recovering::RecoveringRef;
use crate::tier::{Hard, Soft, Tier, TierKind, Weak};

/// A reference of tier `T` to a payload of type `A`, direct or recovering.
///
/// Every operation keeps the family: mapping or converting a direct
/// reference gives a direct reference, and likewise for recovering ones.
/// [`flat_map`](Ref::flat_map) is the exception, since `f` picks the result.
pub enum Ref<A, T> {
    /// No builder; a reclaimed payload is lost
    Direct(DirectRef<A, T>),
    /// Rebuilds a reclaimed payload from its builder
    Recovering(RecoveringRef<A, T>),
}

impl<A, T> Ref<A, T>
where
    A: Send + Sync + 'static,
    T: TierKind,
{
    /// Tier of this reference.
    pub fn tier(&self) -> Tier {
        T::TIER
    }

    /// Whether this reference can rebuild its payload.
    pub fn is_recovering(&self) -> bool {
        matches!(self, Ref::Recovering(_))
    }

    /// Heap this reference roots its payload in.
    pub fn heap(&self) -> &Heap {
        match self {
            Ref::Direct(r) => r.heap(),
            Ref::Recovering(r) => r.heap(),
        }
    }

    /// The payload if present. Recovering references rebuild it if needed.
    pub fn current_value(&self) -> Option<Arc<A>> {
        match self {
            Ref::Direct(r) => r.current_value(),
            Ref::Recovering(r) => r.current_value(),
        }
    }

    /// The payload, or [`RefError::Empty`](crate::RefError::Empty) if it is
    /// absent after any recovery.
    pub fn get(&self) -> Result<Arc<A>> {
        match self {
            Ref::Direct(r) => r.get(),
            Ref::Recovering(r) => r.get(),
        }
    }

    /// The payload, or `default`.
    pub fn get_or_else(&self, default: impl Into<Arc<A>>) -> Arc<A> {
        match self {
            Ref::Direct(r) => r.get_or_else(default),
            Ref::Recovering(r) => r.get_or_else(default),
        }
    }

    /// The payload, or the result of `f`.
    pub fn get_or_else_with(&self, f: impl FnOnce() -> A) -> Arc<A> {
        match self {
            Ref::Direct(r) => r.get_or_else_with(f),
            Ref::Recovering(r) => r.get_or_else_with(f),
        }
    }

    /// `self` if present, else `alternative`. A recovering reference is
    /// always considered present.
    pub fn or_else(self, alternative: Ref<A, T>) -> Ref<A, T> {
        match self {
            Ref::Direct(r) => r.or_else(alternative),
            Ref::Recovering(r) => r.or_else(alternative),
        }
    }

    /// Cheap liveness probe; never runs a builder.
    ///
    /// For direct soft and weak references the answer can be stale as soon
    /// as it is returned. Only [`current_value`](Self::current_value) checks
    /// and fetches in one step.
    pub fn exists(&self) -> bool {
        match self {
            Ref::Direct(r) => r.exists(),
            Ref::Recovering(r) => r.exists(),
        }
    }

    /// Transform the payload. Direct references apply `f` now; recovering
    /// references compose it into their builder.
    pub fn map<B, F>(&self, f: F) -> Ref<B, T>
    where
        B: Send + Sync + 'static,
        F: Fn(&A) -> B + Send + Sync + 'static,
    {
        match self {
            Ref::Direct(r) => Ref::Direct(r.map(f)),
            Ref::Recovering(r) => Ref::Recovering(r.map(f)),
        }
    }

    /// Chain a reference-producing function. Recovering references always
    /// recover first.
    pub fn flat_map<B, F>(&self, f: F) -> Ref<B, T>
    where
        B: Send + Sync + 'static,
        F: FnOnce(Arc<A>) -> Ref<B, T>,
    {
        match self {
            Ref::Direct(r) => r.flat_map(f),
            Ref::Recovering(r) => r.flat_map(f),
        }
    }

    /// Move to tier `U`.
    pub fn to_tier<U: TierKind>(self) -> Ref<A, U> {
        match self {
            Ref::Direct(r) => Ref::Direct(r.to_tier()),
            Ref::Recovering(r) => Ref::Recovering(r.to_tier()),
        }
    }

    /// Move to the hard tier. Recovering references recover first.
    pub fn to_hard(self) -> Ref<A, Hard> {
        self.to_tier()
    }

    /// Move to the soft tier.
    pub fn to_soft(self) -> Ref<A, Soft> {
        self.to_tier()
    }

    /// Move to the weak tier.
    pub fn to_weak(self) -> Ref<A, Weak> {
        self.to_tier()
    }

    /// Discard the builder, keeping a direct snapshot of the payload.
    /// `force_refresh` recovers first. Direct references are returned as is.
    pub fn stripped(self, force_refresh: bool) -> Ref<A, T> {
        match self {
            Ref::Direct(r) => Ref::Direct(r.stripped()),
            Ref::Recovering(r) => Ref::Direct(r.stripped(force_refresh)),
        }
    }

    /// The direct reference, if this is one.
    pub fn as_direct(&self) -> Option<&DirectRef<A, T>> {
        match self {
            Ref::Direct(r) => Some(r),
            Ref::Recovering(_) => None,
        }
    }

    /// The recovering reference, if this is one.
    pub fn as_recovering(&self) -> Option<&RecoveringRef<A, T>> {
        match self {
            Ref::Direct(_) => None,
            Ref::Recovering(r) => Some(r),
        }
    }
}

impl<A, T> From<DirectRef<A, T>> for Ref<A, T> {
    fn from(r: DirectRef<A, T>) -> Self {
        Ref::Direct(r)
    }
}

impl<A, T> From<RecoveringRef<A, T>> for Ref<A, T> {
    fn from(r: RecoveringRef<A, T>) -> Self {
        Ref::Recovering(r)
    }
}

impl<A, T: TierKind> fmt::Debug for Ref<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ref::Direct(r) => f.debug_tuple("Direct").field(r).finish(),
            Ref::Recovering(r) => f.debug_tuple("Recovering").field(r).finish(),
        }
    }
}
