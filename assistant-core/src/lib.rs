//! # assistant-core
//!
//! Core types and traits for the dental assistant: [`Turn`], [`Role`], the
//! [`ChatError`] taxonomy, tracing initialization, and the image-classification
//! collaborator interface. Transport-agnostic; used by every other crate in the
//! workspace.

pub mod classifier;
pub mod error;
pub mod logger;
pub mod types;

pub use classifier::{Classifier, ClassifierError, DiseaseLabel, Prediction};
pub use error::{ChatError, Result};
pub use logger::init_tracing;
pub use types::{Role, Turn};
