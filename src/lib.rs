//! Decode the in-memory layout of libc++ containers from process memory
//! snapshots, producing per-value summaries and lazy element sequences.

/// libc++ layout decoding engine and snapshot data source.
pub mod libcxx;
