//! Per-request pipeline orchestration.
//!
//! One orchestrator value handles one request; nothing is shared across
//! requests. Stages run sequentially, each collaborator-backed stage
//! degrades to its local fallback on failure, and only the final rendering
//! stage can abort the request with an error envelope.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use deckwright_core::config::PipelineConfig;
use deckwright_core::conversation::ConversationMessage;
use deckwright_core::envelope::{
    ContextSource, OutputArtifact, OutputAssembler, ProcessingInfo, ResponseEnvelope, ResponseType,
};
use deckwright_core::intent::{self, Intent, IntentAnalysis};
use deckwright_core::resolver;
use deckwright_core::session;
use deckwright_core::tag::{self, DocumentPayload, SourceKind};

use crate::collaborator::{ContentGenerator, GeneratorContext, GeneratorRole};
use crate::content::{ContentOrganizer, SectionExpander};
use crate::deck;
use crate::intent::{preview_of, IntentResolver};
use crate::planner::PlanResolver;
use crate::render::{DocumentRenderer, RenderInput};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    ParsingInput,
    ResolvingContext,
    ClassifyingIntent,
    InformationPath,
    ProcessingPath,
    WaitingForInput,
    Done,
    Error,
}

impl PipelineState {
    fn name(&self) -> &'static str {
        match self {
            Self::ParsingInput => "parsing_input",
            Self::ResolvingContext => "resolving_context",
            Self::ClassifyingIntent => "classifying_intent",
            Self::InformationPath => "information_path",
            Self::ProcessingPath => "processing_path",
            Self::WaitingForInput => "waiting_for_input",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PipelineRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationMessage>,
    pub user_message: String,
}

const QUICK_SUMMARY_PREVIEW_CHARS: usize = 200;

const CAPABILITIES_INFO: &str = "I can create professional presentation documents from your uploaded files.\n\n\
- Bounded section plans with intelligent content organization\n\
- Automatic table detection for budget, timeline, and metric data\n\
- Deterministic layout assignment against the rendering template\n\
- Support for PDF and Word document input\n\n\
Upload a document and I will create a structured presentation from it.";

const UPLOAD_PROMPT: &str = "Please upload a PDF or Word document to create a presentation from. \
I will organize the content, plan the sections, and return the rendered document.";

const RENDER_APOLOGY: &str = "I encountered an error generating your document. \
Please try again or upload a different document.";

pub struct PipelineOrchestrator<G, R> {
    generator: G,
    renderer: R,
    pipeline: PipelineConfig,
}

impl<G, R> PipelineOrchestrator<G, R>
where
    G: ContentGenerator,
    R: DocumentRenderer,
{
    pub fn new(generator: G, renderer: R, pipeline: PipelineConfig) -> Self {
        Self { generator, renderer, pipeline }
    }

    pub async fn process(&self, request: PipelineRequest) -> ResponseEnvelope {
        let session_id = request
            .session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| session::generate_session_id(&self.pipeline.session_prefix));
        let mut conversation = request.conversation_history;
        let user_message = request.user_message.trim().to_string();

        let mut state = PipelineState::ParsingInput;

        if user_message.is_empty() {
            transition(&mut state, PipelineState::Error, &session_id);
            return OutputAssembler::new(session_id, conversation, Vec::new())
                .error("user message required");
        }

        conversation.push(ConversationMessage::user(&user_message));
        let mut stages = vec!["tag_parser".to_string()];
        let parsed = tag::parse(&user_message);

        transition(&mut state, PipelineState::ResolvingContext, &session_id);
        stages.push("conversation_resolver".to_string());

        let mut context_source = ContextSource::CurrentMessage;
        let mut instruction = parsed.instruction;
        let payload = match parsed.payload {
            Some(payload) => Some(payload),
            None if resolver::is_continuation(&user_message, &conversation) => {
                context_source = ContextSource::PreviousConversation;
                instruction = Some(user_message.clone());
                resolver::find_prior_document(&conversation)
            }
            None => None,
        };

        let Some(payload) = payload else {
            transition(&mut state, PipelineState::WaitingForInput, &session_id);
            let (guidance, response_type) = if mentions_document_work(&user_message) {
                (UPLOAD_PROMPT, None)
            } else {
                (CAPABILITIES_INFO, Some(ResponseType::CapabilitiesInfo))
            };
            conversation.push(ConversationMessage::assistant(guidance));
            return OutputAssembler::new(session_id, conversation, stages).waiting_for_file(
                ProcessingInfo { response_type, ..ProcessingInfo::default() },
            );
        };

        transition(&mut state, PipelineState::ClassifyingIntent, &session_id);
        stages.push("intent_resolver".to_string());

        let has_prior_document = context_source == ContextSource::PreviousConversation;
        let analysis = match instruction.as_deref() {
            None | Some("") => intent::direct_upload_analysis(&preview_of(
                &payload.raw_text,
                self.pipeline.preview_chars,
            )),
            Some(text) => {
                IntentResolver::new(&self.generator, self.pipeline.preview_chars)
                    .classify(text, &payload.raw_text, has_prior_document)
                    .await
            }
        };

        match analysis.intent {
            Intent::InformationRequest => {
                transition(&mut state, PipelineState::InformationPath, &session_id);
                self.run_information_path(
                    session_id,
                    conversation,
                    stages,
                    analysis,
                    payload,
                    instruction.unwrap_or_default(),
                    context_source,
                    &mut state,
                )
                .await
            }
            Intent::ProcessingRequest => {
                transition(&mut state, PipelineState::ProcessingPath, &session_id);
                self.run_processing_path(
                    session_id,
                    conversation,
                    stages,
                    analysis,
                    payload,
                    context_source,
                    &mut state,
                )
                .await
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_information_path(
        &self,
        session_id: String,
        mut conversation: Vec<ConversationMessage>,
        mut stages: Vec<String>,
        analysis: IntentAnalysis,
        payload: DocumentPayload,
        user_question: String,
        context_source: ContextSource,
        state: &mut PipelineState,
    ) -> ResponseEnvelope {
        stages.push("quick_summary".to_string());
        let summary = self.quick_summary(&payload.raw_text, &user_question).await;
        conversation.push(ConversationMessage::assistant(summary));

        stages.push("output_assembler".to_string());
        transition(state, PipelineState::Done, &session_id);
        OutputAssembler::new(session_id, conversation, stages).completed(
            ProcessingInfo {
                intent: Some(analysis),
                file_type: Some(payload.source_kind),
                response_type: Some(ResponseType::QuickSummary),
                context_source: Some(context_source),
                ..ProcessingInfo::default()
            },
            None,
        )
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_processing_path(
        &self,
        session_id: String,
        mut conversation: Vec<ConversationMessage>,
        mut stages: Vec<String>,
        analysis: IntentAnalysis,
        payload: DocumentPayload,
        context_source: ContextSource,
        state: &mut PipelineState,
    ) -> ResponseEnvelope {
        stages.push("content_organizer".to_string());
        let organized = ContentOrganizer::new(&self.generator).organize(&payload.raw_text).await;

        stages.push("structure_planner".to_string());
        let plan = PlanResolver::new(
            &self.generator,
            self.pipeline.bounds(),
            self.pipeline.default_sections,
        )
        .plan(&organized)
        .await;

        stages.push("section_content_generator".to_string());
        let bodies = SectionExpander::new(&self.generator).expand(&plan).await;

        stages.push("layout_synthesizer".to_string());
        let available_slots = self.renderer.content_slots().len();
        let deck = deck::synthesize(&plan, &bodies, available_slots);
        let section_count = deck.section_count();

        stages.push("document_renderer".to_string());
        match self.renderer.render(&RenderInput::Deck(deck)).await {
            Ok(bytes) => {
                let artifact = OutputArtifact {
                    data: BASE64.encode(bytes),
                    filename: format!(
                        "presentation_{session_id}.{}",
                        self.renderer.file_extension()
                    ),
                };
                conversation.push(ConversationMessage::assistant(success_message(
                    payload.source_kind,
                    context_source,
                    section_count,
                )));

                stages.push("output_assembler".to_string());
                transition(state, PipelineState::Done, &session_id);
                OutputAssembler::new(session_id, conversation, stages).completed(
                    ProcessingInfo {
                        intent: Some(analysis),
                        file_type: Some(payload.source_kind),
                        response_type: Some(ResponseType::DocumentGeneration),
                        context_source: Some(context_source),
                        section_count: Some(section_count),
                        requested_sections: Some(plan.planning.target_count),
                    },
                    Some(artifact),
                )
            }
            Err(error) => {
                tracing::error!(
                    event_name = "pipeline.render_failed",
                    session_id = %session_id,
                    error = %error,
                    "document rendering failed"
                );
                conversation.push(ConversationMessage::assistant(RENDER_APOLOGY));
                transition(state, PipelineState::Error, &session_id);
                OutputAssembler::new(session_id, conversation, stages)
                    .error(format!("document rendering failed: {error}"))
            }
        }
    }

    /// The information path calls only the lightweight summarizer; failure
    /// degrades to a canned preview of the document head.
    async fn quick_summary(&self, document_text: &str, user_question: &str) -> String {
        let context = GeneratorContext {
            user_question: if user_question.is_empty() {
                None
            } else {
                Some(user_question.to_string())
            },
            ..GeneratorContext::default()
        };

        match self
            .generator
            .generate(GeneratorRole::QuickSummary, document_text, &context)
            .await
        {
            Ok(reply) if !reply.text.trim().is_empty() => reply.text,
            Ok(_) | Err(_) => {
                format!(
                    "I can see this document contains information about: {}...",
                    preview_of(document_text, QUICK_SUMMARY_PREVIEW_CHARS)
                )
            }
        }
    }
}

fn transition(state: &mut PipelineState, next: PipelineState, session_id: &str) {
    tracing::debug!(
        event_name = "pipeline.state_transition",
        session_id = %session_id,
        from = state.name(),
        to = next.name(),
        "pipeline state transition"
    );
    *state = next;
}

fn mentions_document_work(message: &str) -> bool {
    let lowered = message.to_lowercase();
    ["upload", "presentation", "slides", "deck", "document", "file", "pdf", "word"]
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

fn success_message(
    source_kind: SourceKind,
    context_source: ContextSource,
    section_count: usize,
) -> String {
    match context_source {
        ContextSource::PreviousConversation => format!(
            "I've created a presentation from the {} document as requested. \
             It contains {section_count} sections with structured formatting.",
            source_kind.label()
        ),
        ContextSource::CurrentMessage => format!(
            "I've created a professional presentation from your {} document. \
             It contains {section_count} sections with structured formatting.",
            source_kind.label()
        ),
    }
}
