//! Prompt system for the juris answer synthesizer.
//!
//! Provides Handlebars-based rendering of the synthesis instruction prompt,
//! with a built-in default template that can be overridden per workspace.

pub mod builder;
pub mod loader;
pub mod templates;
pub mod types;

pub use builder::build_prompt;
pub use loader::load_prompt;
pub use templates::{default_synthesis_prompt, SYNTHESIS_PROMPT_ID};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
