use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Markdown returned by one generation request.
///
/// Lives in memory only and is replaced wholesale by the next generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub id: Uuid,
    pub markdown: String,
    pub generated_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(markdown: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            markdown,
            generated_at: Utc::now(),
        }
    }
}
