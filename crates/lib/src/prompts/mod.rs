//! # Prompt Template Modules
//!
//! This module organizes the prompt templates used by the pipeline's
//! language-model stages.

pub mod analyst;
