//! Integration tests for placekeep
//!
//! These tests verify that multiple components work together correctly.

#[path = "../common/mod.rs"]
pub mod common;

pub mod cli_flow;
pub mod relaunch_flow;
