//! # Core Module
//!
//! Concurrency primitives shared across the crate. The only resident today is
//! [`MtResource`], the thread-safe chunk container handed between the chunk
//! manager and its workers.

pub mod mt_resource;

pub use mt_resource::MtResource;
