//! Intent analysis types and the rule-based half of intent resolution.
//!
//! The classifier collaborator proposes an analysis; the functions here
//! supply the confidence-gated enhancement and the keyword fallback used
//! when the collaborator is unavailable or unparseable. The `Intent` enum
//! deliberately has no "unclear" member: ambiguity is always resolved to a
//! committed guess with a recorded reasoning string.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    #[serde(alias = "INFORMATION_REQUEST")]
    InformationRequest,
    #[serde(alias = "PROCESSING_REQUEST")]
    ProcessingRequest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[serde(alias = "CV")]
    Cv,
    #[serde(alias = "GENERAL")]
    General,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityLevel {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub intent: Intent,
    pub confidence: f64,
    pub document_type: DocumentType,
    pub action: String,
    pub reasoning: String,
    pub ambiguity_level: AmbiguityLevel,
    pub fallback_used: bool,
}

/// Below this confidence the collaborator's guess is overridden wholesale.
pub const LOW_CONFIDENCE_CUTOFF: f64 = 0.5;
/// At or above this confidence the guess passes through unchanged.
pub const HIGH_CONFIDENCE_CUTOFF: f64 = 0.7;

const CV_INDICATORS: &[&str] =
    &["resume", "cv", "experience", "education", "skills", "work history"];

const QUESTION_WORDS: &[&str] = &["what", "tell", "explain", "show", "describe"];

pub fn document_type_from_preview(preview: &str) -> DocumentType {
    let lowered = preview.to_lowercase();
    if CV_INDICATORS.iter().any(|indicator| lowered.contains(indicator)) {
        DocumentType::Cv
    } else {
        DocumentType::General
    }
}

pub fn action_for(document_type: DocumentType) -> &'static str {
    match document_type {
        DocumentType::Cv => "process_cv",
        DocumentType::General => "process_general",
    }
}

/// Confidence-gated enhancement applied to every collaborator analysis.
///
/// Below 0.5 the intent is forced to processing and the document type is
/// re-derived from the preview; the keyword scan wins over whatever the
/// collaborator proposed. The 0.5–0.7 band passes through as medium
/// ambiguity, 0.7 and above as low.
pub fn apply_confidence_gate(mut analysis: IntentAnalysis, preview: &str) -> IntentAnalysis {
    if analysis.confidence < LOW_CONFIDENCE_CUTOFF {
        analysis.intent = Intent::ProcessingRequest;
        analysis.document_type = document_type_from_preview(preview);
        analysis.action = action_for(analysis.document_type).to_string();
        analysis.ambiguity_level = AmbiguityLevel::High;
        analysis.fallback_used = true;
        analysis.reasoning.push_str(" | applied processing defaults for ambiguous request");
    } else if analysis.confidence < HIGH_CONFIDENCE_CUTOFF {
        analysis.ambiguity_level = AmbiguityLevel::Medium;
    } else {
        analysis.ambiguity_level = AmbiguityLevel::Low;
    }
    analysis
}

/// Local fallback when the classifier collaborator fails outright or
/// returns something unparseable. Question-style wording maps to an
/// information request, everything else to processing with the document
/// type taken from the preview scan.
pub fn keyword_fallback(instruction: &str, preview: &str) -> IntentAnalysis {
    let lowered = instruction.to_lowercase();
    if QUESTION_WORDS.iter().any(|word| lowered.contains(word)) {
        return IntentAnalysis {
            intent: Intent::InformationRequest,
            confidence: 0.7,
            document_type: DocumentType::General,
            action: "quick_summary".to_string(),
            reasoning: "fallback: question words indicate an information request".to_string(),
            ambiguity_level: AmbiguityLevel::High,
            fallback_used: true,
        };
    }

    let document_type = document_type_from_preview(preview);
    IntentAnalysis {
        intent: Intent::ProcessingRequest,
        confidence: 0.6,
        document_type,
        action: action_for(document_type).to_string(),
        reasoning: "fallback: defaulting to processing for ambiguous request".to_string(),
        ambiguity_level: AmbiguityLevel::High,
        fallback_used: true,
    }
}

/// A tagged upload with no instruction text at all is an unambiguous
/// processing signal; no collaborator call is needed.
pub fn direct_upload_analysis(preview: &str) -> IntentAnalysis {
    let document_type = document_type_from_preview(preview);
    IntentAnalysis {
        intent: Intent::ProcessingRequest,
        confidence: 0.9,
        document_type,
        action: action_for(document_type).to_string(),
        reasoning: "direct document upload without user text indicates a processing request"
            .to_string(),
        ambiguity_level: AmbiguityLevel::Low,
        fallback_used: false,
    }
}
