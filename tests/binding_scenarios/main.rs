//! Binding Scenario Tests
//!
//! End-to-end conversions through the public API: scalars, records,
//! lists, leaf bindings, ancestor resolution and round-trip properties.

mod common;

mod enumerations;
mod leaf_bindings;
mod lists;
mod properties;
mod records;
mod resolution;
mod scalars;
