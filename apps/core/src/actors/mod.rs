pub mod display;
pub mod messages;
pub mod orchestrator;
pub mod traits;
