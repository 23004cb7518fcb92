//! Configuration module for Omtale.
//!
//! Handles loading and managing application settings and the prompt template.

mod settings;
mod template;

pub use settings::{ChatSettings, GeneralSettings, PromptSettings, SearchSettings, Settings};
pub use template::{FileTemplate, TemplateSource};
