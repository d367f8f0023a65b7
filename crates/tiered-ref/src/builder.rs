//! Payload builders

use std::fmt;
use std::sync::Arc;

type BuildFn<A> = dyn Fn() -> Option<Arc<A>> + Send + Sync;

/// A shared zero-argument function that (re)produces a payload.
///
/// Builders are assumed cheap, synchronous and free of observable side
/// effects: a recovering reference may call one any number of times and
/// relies on each call yielding an equivalent payload. Nothing checks that.
pub struct Builder<A> {
    build: Arc<BuildFn<A>>,
}

impl<A: Send + Sync + 'static> Builder<A> {
    /// Wrap a builder that always produces a payload.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> A + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(move || Some(Arc::new(f()))),
        }
    }

    /// Wrap a builder that may produce nothing.
    pub fn partial<F>(f: F) -> Self
    where
        F: Fn() -> Option<A> + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(move || f().map(Arc::new)),
        }
    }

    /// Compose `f` after this builder. The result keeps this builder alive
    /// and never runs either function until it is itself invoked.
    pub fn map<B, F>(&self, f: F) -> Builder<B>
    where
        B: Send + Sync + 'static,
        F: Fn(&A) -> B + Send + Sync + 'static,
    {
        let inner = self.build.clone();
        Builder {
            build: Arc::new(move || inner().map(|a| Arc::new(f(&*a)))),
        }
    }
}

impl<A> Builder<A> {
    /// Invoke the builder.
    pub fn build(&self) -> Option<Arc<A>> {
        (self.build)()
    }

    /// Whether both builders are the same shared function.
    pub fn ptr_eq(&self, other: &Builder<A>) -> bool {
        Arc::ptr_eq(&self.build, &other.build)
    }
}

impl<A> Clone for Builder<A> {
    fn clone(&self) -> Self {
        Self {
            build: self.build.clone(),
        }
    }
}

impl<A> fmt::Debug for Builder<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_map_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let base = Builder::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            21
        });

        let doubled = base.map(|n: &i32| n * 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(doubled.build().as_deref(), Some(&42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_partial_builder() {
        let nothing = Builder::<u8>::partial(|| None);
        assert!(nothing.build().is_none());
        assert!(nothing.map(|n: &u8| n + 1).build().is_none());
    }

    #[test]
    fn test_clone_shares_function() {
        let base = Builder::new(|| 1u8);
        assert!(base.ptr_eq(&base.clone()));
        assert!(!base.ptr_eq(&Builder::new(|| 1u8)));
    }
}
