//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, selection and projections into use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod note_editor;
pub mod task_service;
