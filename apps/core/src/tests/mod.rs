//! Test Module
//!
//! Cross-module test suites for the PageMood core.
//!
//! ## Test Categories
//! - `classifier_tests`: Record properties over realistic page text
//! - `database_tests`: Key-value store and `SqliteCache`
//! - `actor_tests`: Orchestrator and display behavior
//! - `integration_tests`: Full flow from a page file to a rendered view

pub mod actor_tests;
