//! Integration test crate for the Verso platform.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise end-to-end collaboration and curation flows across
//! multiple workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p verso-integration-tests
//! ```
