//! `surveybar-core`: shared building blocks for the topbar engine.
//!
//! This crate contains **pure** primitives (no collaborator concerns).

pub mod data;
pub mod error;
pub mod id;

pub use data::{Configuration, DataBag};
pub use error::{TopbarError, TopbarResult};
pub use id::SurveyId;
