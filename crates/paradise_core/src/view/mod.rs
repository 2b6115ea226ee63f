//! Derived views over the loaded task collection.
//!
//! Everything here is a pure function of its inputs; nothing is cached or
//! persisted.

pub mod filter;
