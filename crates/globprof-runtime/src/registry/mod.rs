//! Mutation and listener registries.
//!
//! Both are plain ordered lists owned by the profiler; nothing here is shared
//! across threads.

pub mod callbacks;

pub use callbacks::{Listener, ListenerRegistry, Mutation, MutationRegistry};
