//! Prompt binding
//!
//! Turns a validated request value into the natural-language instruction
//! sent to the reasoning service. Rendering is a pure function of
//! (template, request).

mod binder;
mod template;
mod templates;

pub use binder::{BindError, PromptBinder};
pub use template::{FieldPath, Segment, Template, TemplateError};
pub use templates::template_for;
