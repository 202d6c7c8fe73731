//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, codec and generation calls into user actions.
//! - Keep the CLI decoupled from storage details.

pub mod capture_service;
pub mod post_service;
pub mod topic_service;
