//! Test suite for the anonymous feedback backend
//!
//! This module organizes all tests

pub mod integration;
pub mod property;
