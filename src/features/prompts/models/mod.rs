pub mod prompt;

pub use prompt::{NewPromptVersion, PromptVersion};
