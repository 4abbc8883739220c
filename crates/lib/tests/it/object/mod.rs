//! Object integration tests
//!
//! Tests are organized by area: path addressing, typed getters, and
//! merging and conversions.

mod conversion_tests;
mod getter_tests;
mod path_tests;
