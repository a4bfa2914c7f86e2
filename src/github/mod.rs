//! GitHub Integration Module
//!
//! Payload models and a small REST client for the queries the action
//! performs against the GitHub API.
//!
//! # Structure
//!
//! - [`client`]: reqwest-based REST client
//! - [`events`]: `workflow_run` webhook payload model
//! - [`models`]: job listing and rate limit response models

pub mod client;
pub mod events;
pub mod models;

pub use client::{GitHubClient, GitHubError};
pub use events::WorkflowRunEvent;
pub use models::{JobsListing, RateLimit, WorkflowJob};
