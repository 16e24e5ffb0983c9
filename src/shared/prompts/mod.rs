//! Prompt template rendering.
//!
//! Templates use Jinja2 syntax (`{{ variable }}`, `{% for %}`, `{% if %}`) and
//! are rendered with [minijinja]. Everything here is side-effect free.
//!
//! # Usage
//!
//! ```ignore
//! use std::collections::BTreeMap;
//! use crate::shared::prompts::render;
//!
//! let mut vars = BTreeMap::new();
//! vars.insert("name".to_string(), "World".to_string());
//!
//! let rendered = render("Hello {{name}}", &vars)?;
//! assert_eq!(rendered.text, "Hello World");
//! ```

pub mod engine;

pub use engine::{
    render, template_variables, validate_template, RenderedPrompt, TemplateError,
    TemplateErrorKind,
};
