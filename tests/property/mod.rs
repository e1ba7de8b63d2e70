//! Property-based tests

mod details_proptest;
