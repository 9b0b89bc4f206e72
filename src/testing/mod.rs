//! Testing utilities for the GraphDB provider.
//!
//! Provides an in-memory [`MockGraphDb`] for exercising resources and data
//! sources without a running server.

mod mock;

pub use mock::{MockCall, MockGraphDb};
