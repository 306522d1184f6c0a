//! `{{NAME}}` substitution for prompt templates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::models::Prompt;
use crate::errors::AppError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilledVariable {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPrompt {
    pub id: String,
    pub title: String,
    pub rendered: String,
    pub filled_variables: Vec<FilledVariable>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Missing required variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Validation(e.to_string())
    }
}

pub fn placeholder(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// Fills a prompt's template.
///
/// Declared variables take the supplied value, else their default. A
/// required variable with neither is an error; an optional one renders
/// empty. Supplied values for undeclared names are substituted only where
/// the template mentions them, and unknown names are ignored.
pub fn render_prompt(
    prompt: &Prompt,
    values: &BTreeMap<String, String>,
) -> Result<RenderedPrompt, RenderError> {
    let supplied = |name: &str| {
        values
            .get(name)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    };

    let missing: Vec<String> = prompt
        .variables
        .iter()
        .filter(|v| v.required && supplied(&v.name).is_none() && v.default.is_none())
        .map(|v| v.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(RenderError::MissingVariables(missing));
    }

    let mut rendered = prompt.content.clone();
    let mut filled = Vec::new();

    for var in &prompt.variables {
        let value = supplied(&var.name)
            .or(var.default.as_deref())
            .unwrap_or_default()
            .to_string();
        rendered = rendered.replace(&placeholder(&var.name), &value);
        if !value.is_empty() {
            filled.push(FilledVariable {
                name: var.name.clone(),
                value,
            });
        }
    }

    for (name, value) in values {
        if prompt.variables.iter().any(|v| &v.name == name) {
            continue;
        }
        let token = placeholder(name);
        if rendered.contains(&token) {
            rendered = rendered.replace(&token, value);
            filled.push(FilledVariable {
                name: name.clone(),
                value: value.clone(),
            });
        }
    }

    Ok(RenderedPrompt {
        id: prompt.id.clone(),
        title: prompt.title.clone(),
        rendered,
        filled_variables: filled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{PromptVariable, VariableType};

    fn var(name: &str, required: bool, default: Option<&str>) -> PromptVariable {
        PromptVariable {
            name: name.to_string(),
            var_type: VariableType::Text,
            required,
            description: None,
            default: default.map(str::to_string),
        }
    }

    fn template(content: &str, variables: Vec<PromptVariable>) -> Prompt {
        Prompt {
            id: "t".to_string(),
            title: "Template".to_string(),
            content: content.to_string(),
            description: None,
            category: None,
            tags: vec![],
            variables,
            featured: false,
            version: None,
            author: None,
        }
    }

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_supplied_values_and_defaults_fill_template() {
        let p = template(
            "Test {{CODE}} with {{FRAMEWORK}}.",
            vec![var("CODE", true, None), var("FRAMEWORK", false, Some("pytest"))],
        );
        let out = render_prompt(&p, &values(&[("CODE", "fn main() {}")])).unwrap();
        assert_eq!(out.rendered, "Test fn main() {} with pytest.");
        assert_eq!(
            out.filled_variables,
            vec![
                FilledVariable { name: "CODE".into(), value: "fn main() {}".into() },
                FilledVariable { name: "FRAMEWORK".into(), value: "pytest".into() },
            ]
        );
    }

    #[test]
    fn test_missing_required_variables_are_listed() {
        let p = template(
            "{{A}} {{B}} {{C}}",
            vec![var("A", true, None), var("B", true, None), var("C", false, None)],
        );
        let err = render_prompt(&p, &values(&[("B", "   ")])).unwrap_err();
        assert_eq!(err, RenderError::MissingVariables(vec!["A".into(), "B".into()]));
        assert_eq!(err.to_string(), "Missing required variables: A, B");
    }

    #[test]
    fn test_optional_without_value_renders_empty() {
        let p = template("[{{NOTE}}]", vec![var("NOTE", false, None)]);
        let out = render_prompt(&p, &BTreeMap::new()).unwrap();
        assert_eq!(out.rendered, "[]");
        assert!(out.filled_variables.is_empty());
    }

    #[test]
    fn test_undeclared_values_fill_only_mentioned_placeholders() {
        let p = template("Hello {{NAME}}", vec![]);
        let out = render_prompt(&p, &values(&[("NAME", "Ada"), ("UNUSED", "x")])).unwrap();
        assert_eq!(out.rendered, "Hello Ada");
        assert_eq!(out.filled_variables.len(), 1);
    }
}
