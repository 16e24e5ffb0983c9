//! Template engine for prompt rendering using Jinja2 syntax.
//!
//! Rendering is a pure function of the template text and the supplied
//! variables. Before rendering, the template is parsed to find every variable
//! it references; that set is compared with the supplied names so callers get
//! the complete list of missing variables up front instead of the first
//! undefined-value error minijinja would raise.

use minijinja::{Environment, UndefinedBehavior, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use utoipa::ToSchema;

/// Names the default environment provides as globals. They show up as
/// undeclared when parsing but are never user variables.
const BUILTIN_GLOBALS: &[&str] = &["range", "dict", "debug", "namespace"];

/// Name under which ad-hoc templates are compiled
const INLINE_TEMPLATE_NAME: &str = "prompt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TemplateErrorKind {
    MissingVariable,
    SyntaxError,
}

/// Errors that can occur while rendering a prompt template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Referenced variables with no (or an empty) value, sorted by name.
    /// `unused` carries the supplied names the template never reads.
    #[error("Missing template variables: {}", .missing.join(", "))]
    MissingVariable {
        missing: Vec<String>,
        unused: Vec<String>,
    },

    #[error("Template syntax error: {0}")]
    Syntax(String),
}

impl TemplateError {
    pub fn kind(&self) -> TemplateErrorKind {
        match self {
            TemplateError::MissingVariable { .. } => TemplateErrorKind::MissingVariable,
            TemplateError::Syntax(_) => TemplateErrorKind::SyntaxError,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            TemplateError::MissingVariable { missing, .. } => missing.join(", "),
            TemplateError::Syntax(detail) => detail.clone(),
        }
    }

    /// Missing variable names; empty for syntax errors
    pub fn missing_variables(&self) -> &[String] {
        match self {
            TemplateError::MissingVariable { missing, .. } => missing.as_slice(),
            TemplateError::Syntax(_) => &[],
        }
    }

    /// Supplied variables the template never references; empty for syntax errors
    pub fn unused_variables(&self) -> &[String] {
        match self {
            TemplateError::MissingVariable { unused, .. } => unused.as_slice(),
            TemplateError::Syntax(_) => &[],
        }
    }
}

/// Output of a successful render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub text: String,
    /// Supplied variables the template never references
    pub unused_variables: Vec<String>,
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

fn syntax_error(err: minijinja::Error) -> TemplateError {
    TemplateError::Syntax(err.to_string())
}

/// Check that a template compiles.
pub fn validate_template(template: &str) -> Result<(), TemplateError> {
    let env = environment();
    env.template_from_named_str(INLINE_TEMPLATE_NAME, template)
        .map(|_| ())
        .map_err(syntax_error)
}

/// Top-level variable names the template reads from its context.
///
/// Names bound inside the template (`for` targets, `set`, macro arguments)
/// and builtin globals are excluded. For `{{ user.name }}` only `user` is
/// reported.
pub fn template_variables(template: &str) -> Result<BTreeSet<String>, TemplateError> {
    let env = environment();
    let tmpl = env
        .template_from_named_str(INLINE_TEMPLATE_NAME, template)
        .map_err(syntax_error)?;

    Ok(tmpl
        .undeclared_variables(false)
        .into_iter()
        .filter(|name| !BUILTIN_GLOBALS.contains(&name.as_str()))
        .collect())
}

fn is_blank(value: &Value) -> bool {
    value.is_undefined() || value.is_none() || value.as_str() == Some("")
}

/// Render `template` with `variables`.
///
/// Fails with [`TemplateError::MissingVariable`] naming every referenced
/// variable that is absent, null, or an empty string. Supplied variables the
/// template never uses are reported as warnings, on the result or alongside
/// the missing names.
pub fn render<V: Serialize>(
    template: &str,
    variables: &BTreeMap<String, V>,
) -> Result<RenderedPrompt, TemplateError> {
    let env = environment();
    let tmpl = env
        .template_from_named_str(INLINE_TEMPLATE_NAME, template)
        .map_err(syntax_error)?;

    let referenced: BTreeSet<String> = tmpl
        .undeclared_variables(false)
        .into_iter()
        .filter(|name| !BUILTIN_GLOBALS.contains(&name.as_str()))
        .collect();

    let context: BTreeMap<&str, Value> = variables
        .iter()
        .map(|(name, value)| (name.as_str(), Value::from_serialize(value)))
        .collect();

    let unused_variables: Vec<String> = variables
        .keys()
        .filter(|name| !referenced.contains(*name))
        .cloned()
        .collect();

    let missing: Vec<String> = referenced
        .iter()
        .filter(|name| context.get(name.as_str()).map_or(true, is_blank))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(TemplateError::MissingVariable {
            missing,
            unused: unused_variables,
        });
    }

    let text = tmpl
        .render(Value::from_iter(context))
        .map_err(syntax_error)?;

    Ok(RenderedPrompt {
        text,
        unused_variables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_simple_greeting() {
        let rendered = render("Hello {{name}}", &vars(&[("name", "World")])).unwrap();
        assert_eq!(rendered.text, "Hello World");
        assert!(rendered.unused_variables.is_empty());
    }

    #[test]
    fn test_render_keeps_trailing_newline() {
        let rendered = render("Hi {{ who }}\n", &vars(&[("who", "there")])).unwrap();
        assert_eq!(rendered.text, "Hi there\n");
    }

    #[test]
    fn test_missing_variables_are_named_exactly() {
        let template = "{{ greeting }}, {{ name }}! Today is {{ day }}.";
        let err = render(template, &vars(&[("greeting", "Hi")])).unwrap_err();

        assert_eq!(err.kind(), TemplateErrorKind::MissingVariable);
        assert_eq!(
            err,
            TemplateError::MissingVariable {
                missing: vec!["day".to_string(), "name".to_string()],
                unused: Vec::new(),
            }
        );
        assert_eq!(err.detail(), "day, name");
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = render("Hello {{name}}", &vars(&[("name", "")])).unwrap_err();
        assert_eq!(err.missing_variables(), ["name".to_string()]);
    }

    #[test]
    fn test_unused_variables_are_warnings() {
        let rendered = render(
            "Summarize: {{ text }}",
            &vars(&[("text", "abc"), ("tone", "formal"), ("audience", "kids")]),
        )
        .unwrap();

        assert_eq!(rendered.text, "Summarize: abc");
        assert_eq!(rendered.unused_variables, vec!["audience", "tone"]);
    }

    #[test]
    fn test_unused_variables_survive_missing_ones() {
        let err = render("Summarize {{ text }}", &vars(&[("tone", "formal")])).unwrap_err();

        assert_eq!(err.missing_variables(), ["text".to_string()]);
        assert_eq!(err.unused_variables(), ["tone".to_string()]);
    }

    #[test]
    fn test_syntax_error() {
        let err = render("Hello {{ name", &vars(&[("name", "x")])).unwrap_err();
        assert_eq!(err.kind(), TemplateErrorKind::SyntaxError);
        assert!(validate_template("{% if %}").is_err());
        assert!(validate_template("{% if x %}y{% endif %}").is_ok());
    }

    #[test]
    fn test_loops_and_conditionals() {
        let mut variables = BTreeMap::new();
        variables.insert("items".to_string(), json!(["a", "b", "c"]));
        variables.insert("formal".to_string(), json!(true));

        let template =
            "{% if formal %}Dear reader{% else %}Hey{% endif %}:{% for item in items %} {{ item }}{% endfor %}";
        let rendered = render(template, &variables).unwrap();
        assert_eq!(rendered.text, "Dear reader: a b c");
    }

    #[test]
    fn test_template_variables_excludes_bound_names_and_globals() {
        let template = "{% set prefix = 'Q' %}{% for i in range(count) %}{{ prefix }}{{ i }} {{ item.title }}{% endfor %}{{ loop_free }}";
        let names = template_variables(template).unwrap();

        let expected: BTreeSet<String> = ["count", "item", "loop_free"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_template_without_variables() {
        let rendered = render::<String>("static text", &BTreeMap::new()).unwrap();
        assert_eq!(rendered.text, "static text");
        assert!(template_variables("static text").unwrap().is_empty());
    }
}
