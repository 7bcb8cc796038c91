// Core moderation module - contains the link guard business logic.
// Following the same pattern as the other core modules.

pub mod link_detector;
pub mod moderation_models;
pub mod moderation_service;
pub mod reprieve_scheduler;

pub use link_detector::*;
pub use moderation_models::*;
pub use moderation_service::*;
pub use reprieve_scheduler::*;
