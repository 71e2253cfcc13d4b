use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct RecipeRequest {
    /// A missing field deserializes to the empty string and fails validation
    /// the same way an explicit empty prompt does.
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub recipe: String,
}

fn not_blank(prompt: &str) -> Result<(), ValidationError> {
    if prompt.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("Prompt is required".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_prompt_fails_validation() {
        let request: RecipeRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn whitespace_only_prompt_fails_validation() {
        let request = RecipeRequest {
            prompt: "   \n\t ".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn non_blank_prompt_passes_validation() {
        let request = RecipeRequest {
            prompt: "eggs, spinach".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
