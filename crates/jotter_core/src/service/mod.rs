//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and renderer calls into use-case level APIs.
//! - Keep the web shell decoupled from storage details.

pub mod note_service;
