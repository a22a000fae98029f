//! Integration tests driving the full router

pub mod config_test;
