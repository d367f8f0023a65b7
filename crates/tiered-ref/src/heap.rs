//! Reference heap: the roots that keep soft and weak payloads alive
//!
//! ## Design
//!
//! - **Roots**: every soft or weak payload is rooted by exactly one entry in
//!   the heap's root table; the reference itself only keeps a
//!   [`std::sync::Weak`] to it
//! - **Collection**: releasing a root is what "reclaiming" means here. The
//!   payload dies once no caller holds an `Arc` to it any more
//! - **Ordinary cycle** ([`Heap::collect`]): releases every weak root and the
//!   oldest soft roots beyond [`HeapConfig::soft_retention`]
//! - **Pressure cycle** ([`Heap::collect_under_pressure`]): releases every
//!   soft and weak root
//!
//! Hard payloads never touch the heap.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::tier::Tier;

/// Heap configuration
#[derive(Debug, Clone)]
pub struct HeapConfig {
    /// Soft roots kept across an ordinary collection (default: unbounded).
    /// The oldest soft roots beyond this count are released.
    pub soft_retention: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            soft_retention: usize::MAX,
        }
    }
}

/// Kind of collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// Clears weak payloads; soft payloads only beyond the retention limit
    Ordinary,
    /// Clears soft and weak payloads
    Pressure,
}

/// Heap statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeapStats {
    /// Number of collections (of either kind)
    pub collections: usize,
    /// Number of pressure collections
    pub pressure_collections: usize,
    /// Roots released by the last collection
    pub last_released: usize,
    /// Soft roots currently registered
    pub live_soft: usize,
    /// Weak roots currently registered
    pub live_weak: usize,
}

/// Identifier of a root in the heap's root table. Monotonic, so lower ids
/// are older roots.
pub(crate) type SlotId = u64;

struct Root {
    tier: Tier,
    /// Strong payload; type-erased since one heap roots payloads of any type
    value: Arc<dyn Any + Send + Sync>,
}

struct HeapInner {
    config: HeapConfig,
    roots: Mutex<FxHashMap<SlotId, Root>>,
    next_slot: AtomicU64,
    collections: AtomicUsize,
    pressure_collections: AtomicUsize,
    last_released: AtomicUsize,
}

/// Handle to a reference heap.
///
/// Cloning is cheap and every clone refers to the same root table. The heap
/// is `Send + Sync`, so a collection may be triggered from any thread.
#[derive(Clone)]
pub struct Heap {
    inner: Arc<HeapInner>,
}

static GLOBAL_HEAP: OnceLock<Heap> = OnceLock::new();

impl Heap {
    /// Create new heap with default config
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// Create new heap with custom config
    pub fn with_config(config: HeapConfig) -> Self {
        Self {
            inner: Arc::new(HeapInner {
                config,
                roots: Mutex::new(FxHashMap::default()),
                next_slot: AtomicU64::new(0),
                collections: AtomicUsize::new(0),
                pressure_collections: AtomicUsize::new(0),
                last_released: AtomicUsize::new(0),
            }),
        }
    }

    /// The process-wide heap used by the free factory functions and the
    /// decoration sugar.
    pub fn global() -> Heap {
        GLOBAL_HEAP.get_or_init(Heap::new).clone()
    }

    /// Get config
    pub fn config(&self) -> &HeapConfig {
        &self.inner.config
    }

    /// Whether two handles refer to the same heap.
    pub fn same_heap(&self, other: &Heap) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Root `value` under `tier` and return its slot.
    pub(crate) fn register<A>(&self, tier: Tier, value: Arc<A>) -> SlotId
    where
        A: Send + Sync + 'static,
    {
        debug_assert!(tier.is_reclaimable(), "hard payloads are never rooted");
        let slot = self.inner.next_slot.fetch_add(1, Ordering::Relaxed);
        self.inner.roots.lock().insert(slot, Root { tier, value });
        slot
    }

    /// Release a root, if the collector has not already done so.
    pub(crate) fn release(&self, slot: SlotId) {
        // Bind the removed root so the payload drops after the lock guard:
        // its destructor may release roots of its own.
        let removed = self.inner.roots.lock().remove(&slot);
        drop(removed);
    }

    /// Run an ordinary collection. Returns the number of roots released.
    pub fn collect(&self) -> usize {
        self.run(CollectionKind::Ordinary)
    }

    /// Run a memory-pressure collection. Returns the number of roots released.
    pub fn collect_under_pressure(&self) -> usize {
        self.run(CollectionKind::Pressure)
    }

    /// Run a collection of the given kind.
    pub fn run(&self, kind: CollectionKind) -> usize {
        let released: Vec<Root> = {
            let mut roots = self.inner.roots.lock();

            #[cfg(feature = "ref_logging")]
            tracing::debug!(
                target: "tiered_ref::heap",
                ?kind,
                roots = roots.len(),
                "collection starting"
            );

            let mut doomed: Vec<SlotId> = roots
                .iter()
                .filter(|(_, root)| match kind {
                    CollectionKind::Ordinary => root.tier == Tier::Weak,
                    CollectionKind::Pressure => root.tier.is_reclaimable(),
                })
                .map(|(&slot, _)| slot)
                .collect();

            if kind == CollectionKind::Ordinary {
                let mut soft: Vec<SlotId> = roots
                    .iter()
                    .filter(|(_, root)| root.tier == Tier::Soft)
                    .map(|(&slot, _)| slot)
                    .collect();
                let excess = soft.len().saturating_sub(self.inner.config.soft_retention);
                if excess > 0 {
                    soft.sort_unstable();
                    doomed.extend_from_slice(&soft[..excess]);
                }
            }

            doomed
                .into_iter()
                .filter_map(|slot| roots.remove(&slot))
                .collect()
        };

        let count = released.len();
        self.inner.collections.fetch_add(1, Ordering::Relaxed);
        if kind == CollectionKind::Pressure {
            self.inner.pressure_collections.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.last_released.store(count, Ordering::Relaxed);

        // Payload destructors run here, outside the lock.
        drop(released);

        #[cfg(feature = "ref_logging")]
        {
            let stats = self.stats();
            tracing::info!(
                target: "tiered_ref::heap",
                ?kind,
                collection = stats.collections,
                released = count,
                live_soft = stats.live_soft,
                live_weak = stats.live_weak,
                "collection complete"
            );
        }

        count
    }

    /// Snapshot of the heap statistics.
    pub fn stats(&self) -> HeapStats {
        let (live_soft, live_weak) = {
            let roots = self.inner.roots.lock();
            roots
                .values()
                .fold((0, 0), |(soft, weak), root| match root.tier {
                    Tier::Soft => (soft + 1, weak),
                    Tier::Weak => (soft, weak + 1),
                    Tier::Hard => (soft, weak),
                })
        };
        HeapStats {
            collections: self.inner.collections.load(Ordering::Relaxed),
            pressure_collections: self.inner.pressure_collections.load(Ordering::Relaxed),
            last_released: self.inner.last_released.load(Ordering::Relaxed),
            live_soft,
            live_weak,
        }
    }

    /// Number of roots currently registered.
    pub fn root_count(&self) -> usize {
        self.inner.roots.lock().len()
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("roots", &self.root_count())
            .field("config", &self.inner.config)
            .finish()
    }
}
