//! Reference factories
//!
//! Every factory exists twice: as a method on [`Heap`], and as a free
//! function of the same name that uses [`Heap::global`].
//!
//! | form                   | hard              | soft              | weak              |
//! |------------------------|-------------------|-------------------|-------------------|
//! | value                  | `hard`            | `soft`            | `weak`            |
//! | builder, lazy          | `hard_from`       | `soft_from`       | `weak_from`       |
//! | builder, evaluated now | `hard_from_eager` | `soft_from_eager` | `weak_from_eager` |
//! | value and builder      | `hard_with`       | `soft_with`       | `weak_with`       |
//!
//! The value-and-builder form trusts the caller that the builder would
//! produce an equivalent value.

use crate::builder::Builder;
use crate::direct::DirectRef;
use crate::heap::Heap;
use crate::recovering::RecoveringRef;
use crate::reference::Ref;
use crate::tier::{Hard, Soft, TierKind, Weak};

impl Heap {
    /// A direct reference in tier `T`, absent when `value` is `None`.
    pub fn direct<A, T>(&self, value: Option<A>) -> Ref<A, T>
    where
        A: Send + Sync + 'static,
        T: TierKind,
    {
        Ref::Direct(DirectRef::from_option(self, value))
    }

    /// An absent direct reference in tier `T`.
    pub fn absent<A, T>(&self) -> Ref<A, T>
    where
        A: Send + Sync + 'static,
        T: TierKind,
    {
        Ref::Direct(DirectRef::absent(self))
    }

    /// A recovering reference in tier `T`, with `initial` cached if given.
    pub fn recovering<A, T>(&self, builder: Builder<A>, initial: Option<A>) -> Ref<A, T>
    where
        A: Send + Sync + 'static,
        T: TierKind,
    {
        let r = match initial {
            Some(value) => RecoveringRef::with_value(self, builder, value),
            None => RecoveringRef::new(self, builder),
        };
        Ref::Recovering(r)
    }

    /// A recovering reference in tier `T` whose builder has already run.
    pub fn recovering_eager<A, T>(&self, builder: Builder<A>) -> Ref<A, T>
    where
        A: Send + Sync + 'static,
        T: TierKind,
    {
        Ref::Recovering(RecoveringRef::eager(self, builder))
    }

    /// Hard direct reference.
    pub fn hard<A: Send + Sync + 'static>(&self, value: A) -> Ref<A, Hard> {
        self.direct(Some(value))
    }

    /// Soft direct reference.
    pub fn soft<A: Send + Sync + 'static>(&self, value: A) -> Ref<A, Soft> {
        self.direct(Some(value))
    }

    /// Weak direct reference.
    pub fn weak<A: Send + Sync + 'static>(&self, value: A) -> Ref<A, Weak> {
        self.direct(Some(value))
    }

    /// Lazy hard recovering reference.
    pub fn hard_from<A, F>(&self, f: F) -> Ref<A, Hard>
    where
        A: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.recovering(Builder::new(f), None)
    }

    /// Lazy soft recovering reference.
    pub fn soft_from<A, F>(&self, f: F) -> Ref<A, Soft>
    where
        A: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.recovering(Builder::new(f), None)
    }

    /// Lazy weak recovering reference.
    pub fn weak_from<A, F>(&self, f: F) -> Ref<A, Weak>
    where
        A: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.recovering(Builder::new(f), None)
    }

    /// Hard recovering reference, built now.
    pub fn hard_from_eager<A, F>(&self, f: F) -> Ref<A, Hard>
    where
        A: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.recovering_eager(Builder::new(f))
    }

    /// Soft recovering reference, built now.
    pub fn soft_from_eager<A, F>(&self, f: F) -> Ref<A, Soft>
    where
        A: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.recovering_eager(Builder::new(f))
    }

    /// Weak recovering reference, built now.
    pub fn weak_from_eager<A, F>(&self, f: F) -> Ref<A, Weak>
    where
        A: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.recovering_eager(Builder::new(f))
    }

    /// Hard recovering reference holding `value`, rebuilt by `f`.
    pub fn hard_with<A, F>(&self, value: A, f: F) -> Ref<A, Hard>
    where
        A: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.recovering(Builder::new(f), Some(value))
    }

    /// Soft recovering reference holding `value`, rebuilt by `f`.
    pub fn soft_with<A, F>(&self, value: A, f: F) -> Ref<A, Soft>
    where
        A: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.recovering(Builder::new(f), Some(value))
    }

    /// Weak recovering reference holding `value`, rebuilt by `f`.
    pub fn weak_with<A, F>(&self, value: A, f: F) -> Ref<A, Weak>
    where
        A: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        self.recovering(Builder::new(f), Some(value))
    }
}

macro_rules! global_factories {
    ($($(#[$doc:meta])* $name:ident($($arg:ident: $ty:ty),*) -> $tier:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name<A, F>($($arg: $ty),*) -> Ref<A, $tier>
            where
                A: Send + Sync + 'static,
                F: Fn() -> A + Send + Sync + 'static,
            {
                Heap::global().$name($($arg),*)
            }
        )*
    };
}

/// Hard direct reference on the global heap.
pub fn hard<A: Send + Sync + 'static>(value: A) -> Ref<A, Hard> {
    Heap::global().hard(value)
}

/// Soft direct reference on the global heap.
pub fn soft<A: Send + Sync + 'static>(value: A) -> Ref<A, Soft> {
    Heap::global().soft(value)
}

/// Weak direct reference on the global heap.
pub fn weak<A: Send + Sync + 'static>(value: A) -> Ref<A, Weak> {
    Heap::global().weak(value)
}

/// Direct reference in tier `T` on the global heap, absent for `None`.
pub fn direct<A, T>(value: Option<A>) -> Ref<A, T>
where
    A: Send + Sync + 'static,
    T: TierKind,
{
    Heap::global().direct(value)
}

global_factories! {
    /// Lazy hard recovering reference on the global heap.
    hard_from(f: F) -> Hard;
    /// Lazy soft recovering reference on the global heap.
    soft_from(f: F) -> Soft;
    /// Lazy weak recovering reference on the global heap.
    weak_from(f: F) -> Weak;
    /// Hard recovering reference on the global heap, built now.
    hard_from_eager(f: F) -> Hard;
    /// Soft recovering reference on the global heap, built now.
    soft_from_eager(f: F) -> Soft;
    /// Weak recovering reference on the global heap, built now.
    weak_from_eager(f: F) -> Weak;
    /// Hard recovering reference on the global heap holding `value`.
    hard_with(value: A, f: F) -> Hard;
    /// Soft recovering reference on the global heap holding `value`.
    soft_with(value: A, f: F) -> Soft;
    /// Weak recovering reference on the global heap holding `value`.
    weak_with(value: A, f: F) -> Weak;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Tier;

    #[test]
    fn test_value_factories_are_direct() {
        let heap = Heap::new();
        assert!(!heap.hard(1u8).is_recovering());
        assert!(!heap.soft(1u8).is_recovering());
        assert!(!heap.weak(1u8).is_recovering());
        assert_eq!(heap.weak(1u8).tier(), Tier::Weak);
    }

    #[test]
    fn test_builder_factories() {
        let heap = Heap::new();
        let lazy = heap.soft_from(|| 3u16);
        assert!(lazy.is_recovering());
        assert!(!lazy.exists());

        let eager = heap.weak_from_eager(|| 3u16);
        assert!(eager.exists());

        let paired = heap.hard_with(4u16, || 3u16);
        // The supplied value wins until it is invalidated
        assert_eq!(*paired.get().unwrap(), 4);
    }

    #[test]
    fn test_generic_factories() {
        let heap = Heap::new();
        let r: Ref<u8, Soft> = heap.direct(None);
        assert!(!r.exists());
        let r: Ref<u8, Weak> = heap.absent();
        assert!(r.get().is_err());
        let r: Ref<u8, Hard> = heap.recovering(Builder::new(|| 1), Some(2));
        assert!(r.exists());
    }

    #[test]
    fn test_global_factories() {
        let r = hard_from(|| String::from("global"));
        assert_eq!(r.get().unwrap().as_str(), "global");
        assert!(r.heap().same_heap(&Heap::global()));
        assert_eq!(*hard(5i32).get().unwrap(), 5);
    }

    #[test]
    fn test_global_paired_and_eager_factories() {
        let paired = soft_with(1u32, || 2u32);
        assert_eq!(*paired.get().unwrap(), 1);
        paired.as_recovering().unwrap().invalidate();
        assert_eq!(*paired.get().unwrap(), 2);

        let eager = weak_from_eager(|| 3u32);
        assert!(eager.is_recovering());
        assert!(eager.as_recovering().unwrap().cached().is_some());
        assert!(eager.heap().same_heap(&Heap::global()));
    }
}
