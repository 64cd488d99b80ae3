use serde::Deserialize;

use deckwright_core::intent::{
    self, AmbiguityLevel, DocumentType, Intent, IntentAnalysis,
};

use crate::collaborator::{ContentGenerator, GeneratorContext, GeneratorRole};

/// Collaborator-backed intent classification with the confidence gate from
/// `deckwright_core::intent` layered on top. Collaborator failure or an
/// unparseable reply drops to the keyword fallback; the resolver always
/// commits to one of the two defined intents.
pub struct IntentResolver<'g, G> {
    generator: &'g G,
    preview_chars: usize,
}

/// Collaborator replies frequently omit fields; parse permissively and fill
/// the gaps with the same defaults the gate would assume.
#[derive(Deserialize)]
struct RawAnalysis {
    intent: Option<Intent>,
    confidence: Option<f64>,
    document_type: Option<DocumentType>,
    action: Option<String>,
    reasoning: Option<String>,
}

impl<'g, G> IntentResolver<'g, G>
where
    G: ContentGenerator,
{
    pub fn new(generator: &'g G, preview_chars: usize) -> Self {
        Self { generator, preview_chars }
    }

    pub async fn classify(
        &self,
        instruction: &str,
        document_text: &str,
        has_prior_document: bool,
    ) -> IntentAnalysis {
        let preview = preview_of(document_text, self.preview_chars);
        let context = GeneratorContext {
            document_preview: Some(preview.clone()),
            has_prior_document,
            ..GeneratorContext::default()
        };

        let reply = match self
            .generator
            .generate(GeneratorRole::IntentClassification, instruction, &context)
            .await
        {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(
                    event_name = "intent.collaborator_failed",
                    error = %error,
                    "intent classification failed, using keyword fallback"
                );
                return intent::keyword_fallback(instruction, &preview);
            }
        };

        match serde_json::from_str::<RawAnalysis>(reply.stripped()) {
            Ok(raw) => {
                let analysis = complete_analysis(raw);
                intent::apply_confidence_gate(analysis, &preview)
            }
            Err(error) => {
                tracing::warn!(
                    event_name = "intent.reply_unparseable",
                    error = %error,
                    "intent classification reply was not valid JSON, using keyword fallback"
                );
                intent::keyword_fallback(instruction, &preview)
            }
        }
    }
}

fn complete_analysis(raw: RawAnalysis) -> IntentAnalysis {
    let document_type = raw.document_type.unwrap_or(DocumentType::General);
    IntentAnalysis {
        intent: raw.intent.unwrap_or(Intent::ProcessingRequest),
        confidence: raw.confidence.unwrap_or(0.6),
        document_type,
        action: raw.action.unwrap_or_else(|| intent::action_for(document_type).to_string()),
        reasoning: raw.reasoning.unwrap_or_else(|| "classifier reply without reasoning".to_string()),
        ambiguity_level: AmbiguityLevel::Medium,
        fallback_used: false,
    }
}

pub fn preview_of(text: &str, preview_chars: usize) -> String {
    if text.chars().count() <= preview_chars {
        text.to_string()
    } else {
        text.chars().take(preview_chars).collect()
    }
}
