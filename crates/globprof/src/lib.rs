//! Top-level facade crate for globprof.
//!
//! Re-exports core types and the runtime library so users can depend on a single crate.

pub mod core {
    pub use globprof_core::*;
}

pub mod runtime {
    pub use globprof_runtime::*;
}
