//! PageMood core
//!
//! Classifies the emotional tone of a page's visible text and delivers the
//! result to a display through an actor-based orchestrator.

pub mod actors;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod database;
pub mod error;
pub mod fs_manager;
pub mod page_extract;
pub mod telemetry;

#[cfg(test)]
mod tests;
