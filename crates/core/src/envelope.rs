//! Response envelope and output assembly.
//!
//! Every request, successful or not, is answered with the same envelope
//! shape; optional fields are omitted from the wire rather than serialized
//! as null.

use serde::{Deserialize, Serialize};

use crate::conversation::ConversationMessage;
use crate::intent::IntentAnalysis;
use crate::tag::SourceKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Completed,
    NeedsClarification,
    WaitingForFile,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    CurrentMessage,
    PreviousConversation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    CapabilitiesInfo,
    QuickSummary,
    DocumentGeneration,
    ClarificationRequest,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<SourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_source: Option<ContextSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_sections: Option<usize>,
}

/// Rendered artifact reference: base64 payload plus a suggested filename.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArtifact {
    pub data: String,
    pub filename: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: ResponseStatus,
    pub session_id: String,
    pub conversation_history: Vec<ConversationMessage>,
    pub processing_info: ProcessingInfo,
    pub pipeline_info: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_artifact: Option<OutputArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Builds the final envelope for one request. Consumes the session id and
/// transcript once, so a request produces exactly one response.
pub struct OutputAssembler {
    session_id: String,
    conversation: Vec<ConversationMessage>,
    pipeline_info: Vec<String>,
}

impl OutputAssembler {
    pub fn new(
        session_id: String,
        conversation: Vec<ConversationMessage>,
        pipeline_info: Vec<String>,
    ) -> Self {
        Self { session_id, conversation, pipeline_info }
    }

    pub fn completed(
        self,
        processing_info: ProcessingInfo,
        output_artifact: Option<OutputArtifact>,
    ) -> ResponseEnvelope {
        ResponseEnvelope {
            status: ResponseStatus::Completed,
            session_id: self.session_id,
            conversation_history: self.conversation,
            processing_info,
            pipeline_info: self.pipeline_info,
            output_artifact,
            error_message: None,
        }
    }

    pub fn needs_clarification(self, processing_info: ProcessingInfo) -> ResponseEnvelope {
        ResponseEnvelope {
            status: ResponseStatus::NeedsClarification,
            session_id: self.session_id,
            conversation_history: self.conversation,
            processing_info,
            pipeline_info: self.pipeline_info,
            output_artifact: None,
            error_message: None,
        }
    }

    pub fn waiting_for_file(self, processing_info: ProcessingInfo) -> ResponseEnvelope {
        ResponseEnvelope {
            status: ResponseStatus::WaitingForFile,
            session_id: self.session_id,
            conversation_history: self.conversation,
            processing_info,
            pipeline_info: self.pipeline_info,
            output_artifact: None,
            error_message: None,
        }
    }

    pub fn error(self, error_message: impl Into<String>) -> ResponseEnvelope {
        ResponseEnvelope {
            status: ResponseStatus::Error,
            session_id: self.session_id,
            conversation_history: self.conversation,
            processing_info: ProcessingInfo::default(),
            pipeline_info: self.pipeline_info,
            output_artifact: None,
            error_message: Some(error_message.into()),
        }
    }
}
