//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep controller layers decoupled from storage details.

pub mod body_service;
