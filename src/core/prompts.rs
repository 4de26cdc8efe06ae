// src/core/prompts.rs
//! Translation prompt and response schema

use serde_json::{json, Value};

use crate::error::CvError;
use crate::types::cv_data::ParsedSection;

const TRANSLATION_PROMPT: &str = r#"Translate the following Arabic CV data into professional English. For each section, provide an appropriate Font Awesome icon class. The output must be a valid JSON array. Each object in the array should represent a section and have these properties: "ar_title" (the original Arabic title, copied exactly), "en_title" (the English translation of the title), "en_items" (an array of English translations of the items), and "icon" (a relevant Font Awesome icon class like "fas fa-user-circle").

CV Data:
"#;

pub fn translation_prompt(sections: &[ParsedSection]) -> Result<String, CvError> {
    let data = serde_json::to_string_pretty(sections)
        .map_err(|e| CvError::Translation(format!("Failed to serialize CV data: {}", e)))?;

    Ok(format!("{}{}\n", TRANSLATION_PROMPT, data))
}

/// Gemini response schema for an array of translated sections
pub fn translation_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "ar_title": {
                    "type": "STRING",
                    "description": "Original Arabic section title."
                },
                "en_title": {
                    "type": "STRING",
                    "description": "English translation of the section title."
                },
                "en_items": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Array of English translations of the section items."
                },
                "icon": {
                    "type": "STRING",
                    "description": "A single Font Awesome class, e.g., 'fas fa-briefcase'."
                }
            },
            "required": ["ar_title", "en_title", "en_items", "icon"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_sections() {
        let sections = vec![ParsedSection {
            title: "المهارات".to_string(),
            items: vec!["البرمجة".to_string()],
        }];
        let prompt = translation_prompt(&sections).unwrap();

        assert!(prompt.starts_with("Translate the following Arabic CV data"));
        assert!(prompt.contains("\"title\": \"المهارات\""));
        assert!(prompt.contains("\"البرمجة\""));
    }

    #[test]
    fn test_schema_requires_every_field() {
        let schema = translation_schema();
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert_eq!(schema["items"]["properties"]["en_items"]["type"], "ARRAY");
    }
}
