//! Internal test modules - whitebox tests with crate access
//!
//! This module contains tests that require internal access to crate types.
//! Tests here exercise whole-pipeline scenarios and cross-module
//! invariants that unit tests cannot see.
