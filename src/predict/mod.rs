use tracing::{debug, warn};

use crate::inference::InferenceClient;
use crate::prompt::build_prompt;

/// Outcome of one form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// No symptoms after trimming; nothing was sent
    Empty,
    /// Model text, exactly as returned
    Prediction(String),
    /// User-visible error line
    Failed(String),
}

/// Run one submission end to end.
///
/// Service failures never escape: they come back as [`Submission::Failed`]
/// carrying `An error occurred: <details>`.
pub async fn submit(client: &InferenceClient, raw_symptoms: &str) -> Submission {
    let Some(payload) = build_prompt(raw_symptoms) else {
        return Submission::Empty;
    };

    match client.predict(&payload).await {
        Ok(text) => {
            debug!(bytes = text.len(), "Prediction received");
            Submission::Prediction(text)
        }
        Err(e) => {
            warn!("Prediction failed: {}", e);
            Submission::Failed(error_line(&e))
        }
    }
}

pub fn error_line(err: &dyn std::fmt::Display) -> String {
    format!("An error occurred: {}", err)
}
