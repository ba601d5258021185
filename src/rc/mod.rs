//! Reference counting - deterministic, acyclic, single-threaded
//!
//! Design: An owning smart pointer replaces manual retain/release pairing:
//! 1. `RefCount::new` allocates with a count of 1
//! 2. `retain`/`clone` increments and hands back a new owner
//! 3. `release`/drop decrements and destroys exactly at zero
//!
//! There is no cycle collector. Callers build acyclic graphs only.

mod refcount;
mod stats;


pub use refcount::{RefCount, Release};
pub use stats::{stats, RcStats};
