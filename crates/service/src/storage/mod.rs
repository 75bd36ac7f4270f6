//! Storage helpers for the service layer
//!
//! File-backed persistence for small collections that are rewritten as a whole.

pub mod json_mirror;
