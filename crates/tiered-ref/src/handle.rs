//! Reclaimable handles: the native soft and weak reference.
//!
//! The key property of [`Handle`] is that it does NOT own its payload: the
//! heap roots it, and the handle keeps only a [`std::sync::Weak`]. Once the
//! heap releases the root and no caller holds the payload, the handle reads
//! as cleared, permanently.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::heap::{Heap, SlotId};
use crate::tier::Tier;

/// A soft or weak reference to a heap-rooted payload.
pub struct Handle<A> {
    heap: Heap,
    slot: SlotId,
    tier: Tier,
    target: Weak<A>,
}

impl<A: Send + Sync + 'static> Handle<A> {
    /// Root `value` in `heap` under a reclaimable `tier`.
    ///
    /// Returns `None` for [`Tier::Hard`]: hard payloads are held directly.
    pub fn new(heap: &Heap, tier: Tier, value: Arc<A>) -> Option<Self> {
        tier.is_reclaimable().then(|| Self::rooted(heap, tier, value))
    }

    /// Root `value` without checking the tier. Callers pass soft or weak.
    pub(crate) fn rooted(heap: &Heap, tier: Tier, value: Arc<A>) -> Self {
        debug_assert!(tier.is_reclaimable());
        let target = Arc::downgrade(&value);
        let slot = heap.register(tier, value);
        Self {
            heap: heap.clone(),
            slot,
            tier,
            target,
        }
    }
}

impl<A> Handle<A> {
    /// The payload, if it has not been reclaimed.
    ///
    /// This is the combined check-and-fetch: the returned `Arc` keeps the
    /// payload alive for as long as the caller holds it.
    pub fn get(&self) -> Option<Arc<A>> {
        self.target.upgrade()
    }

    /// Whether the payload is still alive. Does not pin it, so the answer
    /// may be stale by the time the caller acts on it.
    pub fn is_live(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Tier this handle was rooted under.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Heap that roots the payload.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }
}

impl<A> Drop for Handle<A> {
    fn drop(&mut self) {
        self.heap.release(self.slot);
    }
}

impl<A> fmt::Debug for Handle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("tier", &self.tier)
            .field("slot", &self.slot)
            .field("alive", &self.is_live())
            .finish()
    }
}

/// Storage for one payload in a given tier: a plain `Arc` for hard, a
/// [`Handle`] for soft and weak, or nothing.
pub(crate) enum Holder<A> {
    Strong(Arc<A>),
    Reclaimable(Handle<A>),
    Empty,
}

impl<A: Send + Sync + 'static> Holder<A> {
    /// Hold `value` under `tier`, rooting it in `heap` if reclaimable.
    pub(crate) fn new(heap: &Heap, tier: Tier, value: Arc<A>) -> Self {
        match tier {
            Tier::Hard => Holder::Strong(value),
            Tier::Soft | Tier::Weak => Holder::Reclaimable(Handle::rooted(heap, tier, value)),
        }
    }

    pub(crate) fn from_option(heap: &Heap, tier: Tier, value: Option<Arc<A>>) -> Self {
        match value {
            Some(value) => Self::new(heap, tier, value),
            None => Holder::Empty,
        }
    }
}

impl<A> Holder<A> {
    pub(crate) fn value(&self) -> Option<Arc<A>> {
        match self {
            Holder::Strong(value) => Some(value.clone()),
            Holder::Reclaimable(handle) => handle.get(),
            Holder::Empty => None,
        }
    }

    pub(crate) fn is_live(&self) -> bool {
        match self {
            Holder::Strong(_) => true,
            Holder::Reclaimable(handle) => handle.is_live(),
            Holder::Empty => false,
        }
    }
}

impl<A> fmt::Debug for Holder<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holder::Strong(_) => f.write_str("Strong"),
            Holder::Reclaimable(handle) => fmt::Debug::fmt(handle, f),
            Holder::Empty => f.write_str("Empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_cleared_by_collection() {
        let heap = Heap::new();
        let handle = Handle::new(&heap, Tier::Weak, Arc::new(String::from("x"))).unwrap();
        assert!(handle.is_live());
        assert_eq!(handle.get().as_deref().map(String::as_str), Some("x"));

        heap.collect();
        assert!(!handle.is_live());
        assert!(handle.get().is_none());
    }

    #[test]
    fn test_pinned_payload_survives_collection() {
        let heap = Heap::new();
        let handle = Handle::new(&heap, Tier::Weak, Arc::new(5u64)).unwrap();
        let pinned = handle.get();

        heap.collect_under_pressure();
        assert!(handle.is_live());
        drop(pinned);
        assert!(!handle.is_live());
    }

    #[test]
    fn test_drop_releases_root() {
        let heap = Heap::new();
        let handle = Handle::new(&heap, Tier::Soft, Arc::new(1u8)).unwrap();
        assert_eq!(heap.root_count(), 1);
        drop(handle);
        assert_eq!(heap.root_count(), 0);
    }

    #[test]
    fn test_hard_handle_rejected() {
        let heap = Heap::new();
        assert!(Handle::new(&heap, Tier::Hard, Arc::new(0u8)).is_none());
        assert_eq!(heap.root_count(), 0);
    }

    #[test]
    fn test_holder_tiers() {
        let heap = Heap::new();
        let hard = Holder::new(&heap, Tier::Hard, Arc::new(1i32));
        let soft = Holder::new(&heap, Tier::Soft, Arc::new(2i32));
        assert_eq!(heap.root_count(), 1);

        heap.collect_under_pressure();
        assert!(hard.is_live());
        assert_eq!(hard.value().as_deref(), Some(&1));
        assert!(!soft.is_live());
        assert!(Holder::<i32>::Empty.value().is_none());
    }
}
