use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No macro profile for ingredient {name:?}{}", suggestion_hint(.suggestion))]
    UnknownIngredient {
        name: String,
        suggestion: Option<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean {s:?}?)"),
        None => String::new(),
    }
}

impl OptimizerError {
    /// Whether the error was caused by the request rather than the environment.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            OptimizerError::InvalidInput(_) | OptimizerError::UnknownIngredient { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
