#![forbid(unsafe_code)]

//! Building blocks shared by cmdstack containers.
//!
//! - [`notify`]: synchronous publish/subscribe with RAII [`Subscription`]s
//! - [`enumerate`]: frozen, indexed traversal via [`Enumerable`] and [`Snapshot`]
//!
//! Nothing here knows about commands or history; the types are generic over
//! whatever the owning container wants to announce or expose.

pub mod enumerate;
pub mod notify;

pub use enumerate::{Enumerable, Snapshot};
pub use notify::{Notifier, Subscription};
