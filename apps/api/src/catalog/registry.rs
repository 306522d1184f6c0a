//! Built-in prompt registry served by the catalog endpoints.

use crate::catalog::models::{Prompt, PromptVariable, VariableType};
use crate::catalog::render::placeholder;

fn prompt(
    id: &str,
    title: &str,
    category: &str,
    description: &str,
    tags: &[&str],
    featured: bool,
    content: &str,
) -> Prompt {
    Prompt {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        description: Some(description.to_string()),
        category: Some(category.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        variables: Vec::new(),
        featured,
        version: Some("1.0.0".to_string()),
        author: Some("Prompt Library".to_string()),
    }
}

fn variable(name: &str, var_type: VariableType, description: &str) -> PromptVariable {
    PromptVariable {
        name: name.to_string(),
        var_type,
        required: true,
        description: Some(description.to_string()),
        default: None,
    }
}

/// Every placeholder the bundled templates use. A prompt declares the ones
/// its content mentions.
fn known_variables() -> Vec<PromptVariable> {
    vec![
        variable("CODE", VariableType::Multiline, "The code to work on"),
        variable("REPORT", VariableType::Multiline, "The bug report or symptom"),
        variable("DIFF", VariableType::Multiline, "Output of git diff"),
        variable("FEATURE", VariableType::Multiline, "What the feature does"),
        PromptVariable {
            required: false,
            default: Some("the project's existing test framework".to_string()),
            ..variable("FRAMEWORK", VariableType::Text, "Test framework to target")
        },
    ]
}

pub fn bundled_prompts() -> Vec<Prompt> {
    let mut prompts = vec![
        prompt(
            "code-review",
            "Code Review Assistant",
            "debugging",
            "Structured review covering bugs, performance and security",
            &["review", "quality"],
            true,
            "Review this code for:\n1. Bugs and edge cases\n2. Performance problems\n3. Security issues\n4. Readability\n\n{{CODE}}\n\nGive specific, actionable feedback.",
        ),
        prompt(
            "explain-code",
            "Code Explainer",
            "documentation",
            "Walk through what unfamiliar code does and why",
            &["explain", "learning"],
            true,
            "Explain this code step by step:\n\n{{CODE}}\n\nCover the overall purpose, the key functions and any notable patterns.",
        ),
        prompt(
            "write-tests",
            "Test Writer",
            "testing",
            "Generate focused unit tests including edge cases",
            &["tests", "quality"],
            false,
            "Write unit tests for the code below using {{FRAMEWORK}}. Include edge cases and failure paths.\n\n{{CODE}}",
        ),
        prompt(
            "refactor-plan",
            "Refactoring Planner",
            "refactoring",
            "Plan an incremental refactor that keeps behavior intact",
            &["refactor", "architecture"],
            false,
            "Propose a step-by-step refactoring plan for this code. Each step must keep the tests passing.\n\n{{CODE}}",
        ),
        prompt(
            "bug-hunter",
            "Bug Hunter",
            "debugging",
            "Trace a reported symptom back to its root cause",
            &["debug", "root-cause"],
            true,
            "Here is a bug report and the relevant code. Identify the most likely root cause and a minimal fix.\n\nReport: {{REPORT}}\n\n{{CODE}}",
        ),
        prompt(
            "commit-message",
            "Commit Message Writer",
            "workflow",
            "Summarize a diff as a clear commit message",
            &["git", "writing"],
            false,
            "Write a concise commit message for this diff. Subject under 72 characters, then a short body.\n\n{{DIFF}}",
        ),
        prompt(
            "api-docs",
            "API Documentation",
            "documentation",
            "Produce reference docs for a public interface",
            &["docs", "api"],
            false,
            "Write reference documentation for this interface: purpose, parameters, return values, errors, and one example each.\n\n{{CODE}}",
        ),
        prompt(
            "threat-model",
            "Threat Model Sketch",
            "security",
            "List likely attack surfaces and mitigations for a feature",
            &["security", "review"],
            false,
            "Describe the feature below, then list its attack surfaces, likely threats and a mitigation for each.\n\n{{FEATURE}}",
        ),
    ];

    let known = known_variables();
    for p in prompts.iter_mut() {
        p.variables = known
            .iter()
            .filter(|v| p.content.contains(&placeholder(&v.name)))
            .cloned()
            .collect();
    }
    prompts
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_bundled_prompts_have_unique_ids() {
        let prompts = bundled_prompts();
        let ids: HashSet<_> = prompts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), prompts.len());
    }

    #[test]
    fn test_bundled_prompts_have_required_fields() {
        for p in bundled_prompts() {
            assert!(!p.title.is_empty());
            assert!(!p.content.is_empty());
            assert!(p.category.is_some());
        }
    }

    #[test]
    fn test_featured_prompts_exist() {
        assert!(bundled_prompts().iter().any(|p| p.featured));
    }

    #[test]
    fn test_variables_declared_where_used() {
        let prompts = bundled_prompts();
        let names = |id: &str| -> Vec<String> {
            let p = prompts.iter().find(|p| p.id == id).unwrap();
            p.variables.iter().map(|v| v.name.clone()).collect()
        };
        assert_eq!(names("code-review"), ["CODE"]);
        assert_eq!(names("commit-message"), ["DIFF"]);
        assert_eq!(names("bug-hunter"), ["CODE", "REPORT"]);
        assert_eq!(names("write-tests"), ["CODE", "FRAMEWORK"]);
    }

    #[test]
    fn test_every_placeholder_is_declared() {
        for p in bundled_prompts() {
            let mut rest = p.content.as_str();
            while let Some(start) = rest.find("{{") {
                let end = rest[start..].find("}}").unwrap() + start;
                let name = &rest[start + 2..end];
                assert!(
                    p.variables.iter().any(|v| v.name == name),
                    "{} uses undeclared {{{{{name}}}}}",
                    p.id
                );
                rest = &rest[end + 2..];
            }
        }
    }
}
