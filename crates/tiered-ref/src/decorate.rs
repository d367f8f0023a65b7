//! Attach a tier to any value.
//!
//! ```
//! use tiered_ref::{Heap, Soft, TierExt};
//!
//! let heap = Heap::new();
//! let r = "payload".to_string().tier_ref_in::<Soft>(&heap);
//! assert_eq!(r.get().unwrap().as_str(), "payload");
//! ```

use crate::direct::DirectRef;
use crate::heap::Heap;
use crate::reference::Ref;
use crate::tier::{Hard, Soft, TierKind, Weak};

/// Turn a value into a direct reference of a chosen tier.
pub trait TierExt: Sized + Send + Sync + 'static {
    /// Direct reference of tier `T` on `heap`.
    fn tier_ref_in<T: TierKind>(self, heap: &Heap) -> Ref<Self, T> {
        Ref::Direct(DirectRef::new(heap, self))
    }

    /// Direct reference of tier `T` on the global heap.
    fn tier_ref<T: TierKind>(self) -> Ref<Self, T> {
        self.tier_ref_in(&Heap::global())
    }

    /// Hard direct reference on the global heap.
    fn hard_ref(self) -> Ref<Self, Hard> {
        self.tier_ref()
    }

    /// Soft direct reference on the global heap.
    fn soft_ref(self) -> Ref<Self, Soft> {
        self.tier_ref()
    }

    /// Weak direct reference on the global heap.
    fn weak_ref(self) -> Ref<Self, Weak> {
        self.tier_ref()
    }
}

impl<A: Send + Sync + 'static> TierExt for A {}
