//! Content-generation collaborator seam.
//!
//! The pipeline never talks to a generation backend directly; it goes
//! through `ContentGenerator`, and every reply is normalized at this
//! boundary into a single `CollaboratorReply { text }` regardless of which
//! of the three wire shapes the backend produced.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorRole {
    IntentClassification,
    ContentOrganization,
    StructurePlanning,
    SectionContent,
    QuickSummary,
}

impl GeneratorRole {
    pub fn stage_name(&self) -> &'static str {
        match self {
            Self::IntentClassification => "intent_resolver",
            Self::ContentOrganization => "content_organizer",
            Self::StructurePlanning => "structure_planner",
            Self::SectionContent => "section_content_generator",
            Self::QuickSummary => "quick_summary",
        }
    }
}

/// Request-scoped hints passed alongside the primary input text.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GeneratorContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_preview: Option<String>,
    pub has_prior_document: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_sections: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_question: Option<String>,
}

/// The three reply shapes a generation backend may produce: a single
/// message object, a message batch, or a bare value.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GeneratorResponse {
    Message { content: String },
    Batch(Vec<String>),
    Raw(serde_json::Value),
}

impl GeneratorResponse {
    /// Collapse whichever shape arrived into plain text. A batch keeps its
    /// final entry, matching the convention that earlier entries are
    /// intermediate turns.
    pub fn normalize(self) -> CollaboratorReply {
        let text = match self {
            Self::Message { content } => content,
            Self::Batch(items) => items.into_iter().last().unwrap_or_default(),
            Self::Raw(serde_json::Value::String(text)) => text,
            Self::Raw(value) => value.to_string(),
        };
        CollaboratorReply { text }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollaboratorReply {
    pub text: String,
}

impl CollaboratorReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Reply text with any markdown code fence stripped; generation
    /// backends routinely wrap JSON answers in ```json fences.
    pub fn stripped(&self) -> &str {
        strip_code_fences(&self.text)
    }
}

pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("content generation transport failed: {0}")]
    Transport(String),
    #[error("content generation service returned status {status}")]
    Status { status: u16 },
    #[error("content generation reply was malformed: {0}")]
    Malformed(String),
    #[error("content generation timed out after {0}s")]
    Timeout(u64),
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        role: GeneratorRole,
        input: &str,
        context: &GeneratorContext,
    ) -> Result<CollaboratorReply, GeneratorError>;
}

#[cfg(test)]
mod tests {
    use super::{strip_code_fences, CollaboratorReply, GeneratorResponse};

    #[test]
    fn message_shape_normalizes_to_its_content() {
        let reply =
            GeneratorResponse::Message { content: "organized text".to_string() }.normalize();
        assert_eq!(reply.text, "organized text");
    }

    #[test]
    fn batch_shape_keeps_the_last_entry() {
        let reply = GeneratorResponse::Batch(vec![
            "thinking...".to_string(),
            "final answer".to_string(),
        ])
        .normalize();
        assert_eq!(reply.text, "final answer");
    }

    #[test]
    fn raw_string_shape_unwraps_the_string() {
        let reply = GeneratorResponse::Raw(serde_json::json!("bare text")).normalize();
        assert_eq!(reply.text, "bare text");
    }

    #[test]
    fn raw_object_shape_stringifies() {
        let reply = GeneratorResponse::Raw(serde_json::json!({"intent": "processing_request"}))
            .normalize();
        assert!(reply.text.contains("processing_request"));
    }

    #[test]
    fn untagged_deserialization_picks_the_right_shape() {
        let message: GeneratorResponse =
            serde_json::from_str(r#"{"content": "hello"}"#).expect("parse");
        assert_eq!(message.normalize().text, "hello");

        let batch: GeneratorResponse = serde_json::from_str(r#"["a", "b"]"#).expect("parse");
        assert_eq!(batch.normalize().text, "b");
    }

    #[test]
    fn fences_are_stripped_from_json_replies() {
        let fenced = "```json\n{\"confidence\": 0.9}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"confidence\": 0.9}");

        let plain = CollaboratorReply::new("{\"confidence\": 0.9}");
        assert_eq!(plain.stripped(), "{\"confidence\": 0.9}");

        let bare_fence = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fences(bare_fence), "[1, 2]");
    }
}
