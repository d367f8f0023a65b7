//! Direct references: a payload and nothing to rebuild it with.
//!
//! A hard direct reference owns its payload outright. A soft or weak one
//! wraps a [`Handle`](crate::Handle); once the heap reclaims the payload the
//! reference is empty for good.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{RefError, Result};
use crate::handle::Holder;
use crate::heap::Heap;
use crate::reference::Ref;
use crate::tier::{Hard, Soft, Tier, TierKind, Weak};

/// A reference without recovery capability.
pub struct DirectRef<A, T> {
    heap: Heap,
    holder: Holder<A>,
    _tier: PhantomData<T>,
}

impl<A, T> DirectRef<A, T>
where
    A: Send + Sync + 'static,
    T: TierKind,
{
    /// Hold `value` in tier `T`.
    pub fn new(heap: &Heap, value: A) -> Self {
        Self::from_arc(heap, Arc::new(value))
    }

    /// Hold an already shared payload in tier `T`.
    pub fn from_arc(heap: &Heap, value: Arc<A>) -> Self {
        Self::from_holder(heap.clone(), Holder::new(heap, T::TIER, value))
    }

    /// Hold `value` if present, otherwise build an absent reference.
    pub fn from_option(heap: &Heap, value: Option<A>) -> Self {
        Self::from_holder(
            heap.clone(),
            Holder::from_option(heap, T::TIER, value.map(Arc::new)),
        )
    }

    /// An absent reference. It carries no payload-typed state, so it exists
    /// at every element type.
    pub fn absent(heap: &Heap) -> Self {
        Self::from_holder(heap.clone(), Holder::Empty)
    }

    pub(crate) fn from_holder(heap: Heap, holder: Holder<A>) -> Self {
        Self {
            heap,
            holder,
            _tier: PhantomData,
        }
    }

    /// Tier of this reference.
    pub fn tier(&self) -> Tier {
        T::TIER
    }

    /// Heap this reference roots its payload in.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The payload, if it is still there.
    pub fn current_value(&self) -> Option<Arc<A>> {
        self.holder.value()
    }

    /// The payload, or [`RefError::Empty`].
    pub fn get(&self) -> Result<Arc<A>> {
        self.current_value().ok_or(RefError::Empty { tier: T::TIER })
    }

    /// The payload, or `default`.
    pub fn get_or_else(&self, default: impl Into<Arc<A>>) -> Arc<A> {
        self.current_value().unwrap_or_else(|| default.into())
    }

    /// The payload, or the result of `f`.
    pub fn get_or_else_with(&self, f: impl FnOnce() -> A) -> Arc<A> {
        self.current_value().unwrap_or_else(|| Arc::new(f()))
    }

    /// Whether the payload is present.
    ///
    /// For soft and weak references the collector may clear the payload
    /// right after this returns `true`. Use [`current_value`](Self::current_value)
    /// when the payload is needed.
    pub fn exists(&self) -> bool {
        self.holder.is_live()
    }

    /// `self` if the payload is present, else `alternative`.
    pub fn or_else(self, alternative: Ref<A, T>) -> Ref<A, T> {
        if self.exists() {
            Ref::Direct(self)
        } else {
            alternative
        }
    }

    /// Apply `f` to the payload now. An absent reference maps to an absent
    /// reference.
    pub fn map<B, F>(&self, f: F) -> DirectRef<B, T>
    where
        B: Send + Sync + 'static,
        F: FnOnce(&A) -> B,
    {
        match self.current_value() {
            Some(value) => DirectRef::new(&self.heap, f(&*value)),
            None => DirectRef::absent(&self.heap),
        }
    }

    /// Apply `f` to the payload if present, else yield an absent reference.
    pub fn flat_map<B, F>(&self, f: F) -> Ref<B, T>
    where
        B: Send + Sync + 'static,
        F: FnOnce(Arc<A>) -> Ref<B, T>,
    {
        match self.current_value() {
            Some(value) => f(value),
            None => Ref::Direct(DirectRef::absent(&self.heap)),
        }
    }

    /// Move to tier `U`.
    ///
    /// Same tier: `self`, untouched. Otherwise the current payload (if any)
    /// is re-homed in the new tier.
    pub fn to_tier<U: TierKind>(self) -> DirectRef<A, U> {
        if T::TIER == U::TIER {
            return DirectRef::from_holder(self.heap, self.holder);
        }
        let value = self.holder.value();
        let holder = Holder::from_option(&self.heap, U::TIER, value);
        DirectRef::from_holder(self.heap, holder)
    }

    /// Move to the hard tier.
    pub fn to_hard(self) -> DirectRef<A, Hard> {
        self.to_tier()
    }

    /// Move to the soft tier.
    pub fn to_soft(self) -> DirectRef<A, Soft> {
        self.to_tier()
    }

    /// Move to the weak tier.
    pub fn to_weak(self) -> DirectRef<A, Weak> {
        self.to_tier()
    }

    /// A direct reference has no builder to strip.
    pub fn stripped(self) -> Self {
        self
    }
}

impl<A, T: TierKind> fmt::Debug for DirectRef<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectRef")
            .field("tier", &T::TIER)
            .field("holder", &self.holder)
            .finish()
    }
}
