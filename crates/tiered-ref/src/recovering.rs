//! Auto-recovering references
//!
//! A recovering reference keeps a [`Builder`] next to a single-slot cache.
//! The cache is either empty or holds the last payload the reference built
//! or was given (as a plain `Arc` for hard, a [`Handle`](crate::Handle) for
//! soft and weak). Whenever a recovering accessor finds the cache empty or
//! reclaimed, it runs the builder once and refills the cache.
//!
//! ## States
//!
//! - **Empty**: no payload cached, or the heap reclaimed it. The reference
//!   does not notice a reclamation until its next accessor call
//! - **Populated**: a live payload is cached
//!
//! Recovering accessors: [`get`](RecoveringRef::get),
//! [`current_value`](RecoveringRef::current_value),
//! [`get_or_else`](RecoveringRef::get_or_else),
//! [`flat_map`](RecoveringRef::flat_map) and conversion to the hard tier.
//! [`exists`](RecoveringRef::exists) only looks at the cache.
//!
//! The cache is a `RefCell`, so a recovering reference is `Send` but not
//! `Sync`: one instance is never shared between threads.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::builder::Builder;
use crate::direct::DirectRef;
use crate::error::{RefError, Result};
use crate::handle::Holder;
use crate::heap::Heap;
use crate::reference::Ref;
use crate::tier::{Hard, Soft, Tier, TierKind, Weak};

/// A reference that rebuilds its payload on demand.
pub struct RecoveringRef<A, T> {
    heap: Heap,
    builder: Builder<A>,
    cache: RefCell<Holder<A>>,
    _tier: PhantomData<T>,
}

impl<A, T> RecoveringRef<A, T>
where
    A: Send + Sync + 'static,
    T: TierKind,
{
    /// A lazy reference: the builder runs on first access.
    pub fn new(heap: &Heap, builder: Builder<A>) -> Self {
        Self::with_cached(heap, builder, None)
    }

    /// Run the builder now and cache its result.
    pub fn eager(heap: &Heap, builder: Builder<A>) -> Self {
        let value = builder.build();
        Self::with_cached(heap, builder, value)
    }

    /// Cache `value` and keep `builder` to rebuild it. The two are trusted
    /// to agree.
    pub fn with_value(heap: &Heap, builder: Builder<A>, value: A) -> Self {
        Self::with_cached(heap, builder, Some(Arc::new(value)))
    }

    pub(crate) fn with_cached(heap: &Heap, builder: Builder<A>, cached: Option<Arc<A>>) -> Self {
        Self {
            heap: heap.clone(),
            cache: RefCell::new(Holder::from_option(heap, T::TIER, cached)),
            builder,
            _tier: PhantomData,
        }
    }

    /// Tier of this reference.
    pub fn tier(&self) -> Tier {
        T::TIER
    }

    /// Heap this reference roots its cached payload in.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The builder this reference recovers with.
    pub fn builder(&self) -> &Builder<A> {
        &self.builder
    }

    /// The cached payload, without recovering.
    pub fn cached(&self) -> Option<Arc<A>> {
        self.cache.borrow().value()
    }

    /// Drop the cached payload. The next recovering accessor rebuilds it.
    pub fn invalidate(&self) {
        let old = self.cache.replace(Holder::Empty);
        drop(old);
    }

    /// Cached payload, or a freshly built one stored in the cache.
    fn recover(&self) -> Option<Arc<A>> {
        if let Some(value) = self.cached() {
            return Some(value);
        }

        // No borrow is held while the builder runs.
        let value = self.builder.build()?;

        #[cfg(feature = "ref_logging")]
        tracing::trace!(
            target: "tiered_ref::recover",
            tier = T::TIER.name(),
            "rebuilt payload"
        );

        let refreshed = Holder::new(&self.heap, T::TIER, value.clone());
        let stale = self.cache.replace(refreshed);
        drop(stale);
        Some(value)
    }

    /// The payload, recovering it if needed. Empty only when the builder
    /// produces nothing.
    pub fn current_value(&self) -> Option<Arc<A>> {
        self.recover()
    }

    /// The payload, recovering it if needed, or [`RefError::Empty`] when the
    /// builder produces nothing.
    pub fn get(&self) -> Result<Arc<A>> {
        self.recover().ok_or(RefError::Empty { tier: T::TIER })
    }

    /// The payload, recovering it if needed, or `default` when the builder
    /// produces nothing.
    pub fn get_or_else(&self, default: impl Into<Arc<A>>) -> Arc<A> {
        self.recover().unwrap_or_else(|| default.into())
    }

    /// As [`get_or_else`](Self::get_or_else), with a lazy default.
    pub fn get_or_else_with(&self, f: impl FnOnce() -> A) -> Arc<A> {
        self.recover().unwrap_or_else(|| Arc::new(f()))
    }

    /// Whether a payload is cached right now. Never runs the builder.
    pub fn exists(&self) -> bool {
        self.cache.borrow().is_live()
    }

    /// Always `self`: a recovering reference counts as present, so
    /// `alternative` is dropped unread.
    pub fn or_else(self, _alternative: Ref<A, T>) -> Ref<A, T> {
        Ref::Recovering(self)
    }

    /// A recovering reference whose builder is `f` after this builder.
    ///
    /// `f` only runs now when a payload is cached, to seed the new cache.
    pub fn map<B, F>(&self, f: F) -> RecoveringRef<B, T>
    where
        B: Send + Sync + 'static,
        F: Fn(&A) -> B + Send + Sync + 'static,
    {
        let seed = self.cached().map(|value| Arc::new(f(&*value)));
        let builder = self.builder.map(f);
        RecoveringRef::with_cached(&self.heap, builder, seed)
    }

    /// Recover the payload, then apply `f`. If the builder produces nothing
    /// the result is an absent direct reference.
    pub fn flat_map<B, F>(&self, f: F) -> Ref<B, T>
    where
        B: Send + Sync + 'static,
        F: FnOnce(Arc<A>) -> Ref<B, T>,
    {
        match self.recover() {
            Some(value) => f(value),
            None => Ref::Direct(DirectRef::absent(&self.heap)),
        }
    }

    /// A new recovering reference in tier `U` sharing this builder.
    ///
    /// Moving to the hard tier recovers first, so the result holds a payload
    /// whenever the builder can produce one. Any other move carries the
    /// cached payload over if there is one and stays empty otherwise. A
    /// move within the same tier keeps the existing cache and its root.
    pub fn to_tier<U: TierKind>(self) -> RecoveringRef<A, U> {
        if T::TIER == U::TIER {
            let RecoveringRef {
                heap,
                builder,
                cache,
                ..
            } = self;
            return RecoveringRef {
                heap,
                builder,
                cache,
                _tier: PhantomData,
            };
        }

        let cached = match U::TIER {
            Tier::Hard => self.recover(),
            Tier::Soft | Tier::Weak => self.cached(),
        };
        RecoveringRef::with_cached(&self.heap, self.builder.clone(), cached)
    }

    /// Move to the hard tier, recovering first.
    pub fn to_hard(self) -> RecoveringRef<A, Hard> {
        self.to_tier()
    }

    /// Move to the soft tier without recovering.
    pub fn to_soft(self) -> RecoveringRef<A, Soft> {
        self.to_tier()
    }

    /// Move to the weak tier without recovering.
    pub fn to_weak(self) -> RecoveringRef<A, Weak> {
        self.to_tier()
    }

    /// A direct reference holding the current payload; the builder is gone
    /// for good. With `force_refresh` the payload is recovered first.
    pub fn stripped(self, force_refresh: bool) -> DirectRef<A, T> {
        if force_refresh {
            self.recover();
        }
        DirectRef::from_holder(self.heap, self.cache.into_inner())
    }
}

impl<A, T: TierKind> fmt::Debug for RecoveringRef<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("RecoveringRef");
        s.field("tier", &T::TIER);
        match self.cache.try_borrow() {
            Ok(cache) => s.field("cache", &*cache),
            Err(_) => s.field("cache", &"<borrowed>"),
        };
        s.finish()
    }
}
