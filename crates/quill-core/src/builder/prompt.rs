//! Shared prompt assembly used by every builder family.

use super::input::GenerationInput;

/// Compose the user prompt: task statement, blueprint context, category
/// inputs, and the optional homepage reference.
pub(crate) fn compose_user_prompt(task: &str, input: &GenerationInput) -> String {
    let mut prompt = format!("# Task\n{task}\n");

    let context = input.context_block();
    if !context.is_empty() {
        prompt.push_str("\n# Project Context\n");
        prompt.push_str(&context);
        prompt.push('\n');
    }

    let fields = input.fields_block();
    if !fields.is_empty() {
        prompt.push_str("\n# Inputs\n");
        prompt.push_str(&fields);
        prompt.push('\n');
    }

    if let Some(reference) = input.homepage_reference.as_deref() {
        if !reference.trim().is_empty() {
            prompt.push_str("\n# Existing Homepage (match its voice)\n");
            prompt.push_str(reference);
            prompt.push('\n');
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::input::FieldValue;

    #[test]
    fn omits_empty_blocks() {
        let prompt = compose_user_prompt("Write a headline.", &GenerationInput::default());
        assert!(prompt.starts_with("# Task\nWrite a headline."));
        assert!(!prompt.contains("# Project Context"));
        assert!(!prompt.contains("# Existing Homepage"));
    }

    #[test]
    fn includes_homepage_reference_when_present() {
        let input = GenerationInput {
            field_values: vec![FieldValue::new("Audience", "founders")],
            homepage_reference: Some("We build honest tools.".to_string()),
            ..Default::default()
        };
        let prompt = compose_user_prompt("Write an about page.", &input);
        assert!(prompt.contains("Audience: founders"));
        assert!(prompt.contains("# Existing Homepage"));
        assert!(prompt.contains("We build honest tools."));
    }
}
