//! Integration tests for the convkit crates.
//!
//! This crate contains end-to-end tests that run BMP files through the
//! filter pipeline.
