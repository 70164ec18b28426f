//! Common test utilities and fixtures for the keypunk-core test suite.
//!
//! Shared master secrets, alphabets and pinned outputs used by integration,
//! stress and property-based tests.

pub mod fixtures;
