//! # Tiered references
//!
//! Hard, soft and weak references behind one type, [`Ref`], with payloads
//! that can be rebuilt after the heap reclaims them.
//!
//! ## Design
//!
//! - **Tiers**: hard payloads are owned by the reference; soft and weak
//!   payloads are rooted in a [`Heap`] and reclaimed by its collections
//!   (weak on every cycle, soft under pressure)
//! - **Direct references**: a payload and nothing else. Reclaimed means gone
//! - **Recovering references**: a [`Builder`] plus a cached payload. A
//!   reclaimed payload is rebuilt on the next access, and `map` composes
//!   into the builder instead of running eagerly
//! - **Re-tiering**: `to_hard` / `to_soft` / `to_weak` move a reference
//!   between tiers; `stripped` drops the builder
//!
//! ```
//! use tiered_ref::Heap;
//!
//! let heap = Heap::new();
//! let r = heap.weak_from(|| "A".to_string());
//! assert_eq!(r.get().unwrap().as_str(), "A");
//!
//! heap.collect();
//! let mapped = r.map(|s| format!("{s}B"));
//! assert_eq!(mapped.get().unwrap().as_str(), "AB");
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod builder;
pub mod decorate;
pub mod direct;
pub mod error;
pub mod factory;
pub mod handle;
pub mod heap;
pub mod recovering;
pub mod reference;
pub mod tier;

pub use builder::Builder;
pub use decorate::TierExt;
pub use direct::DirectRef;
pub use error::{RefError, Result};
pub use handle::Handle;
pub use heap::{CollectionKind, Heap, HeapConfig, HeapStats};
pub use recovering::RecoveringRef;
pub use reference::Ref;
pub use tier::{Hard, Soft, Tier, TierKind, Weak};
