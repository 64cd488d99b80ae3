use async_trait::async_trait;

use deckwright_agent::collaborator::{
    CollaboratorReply, ContentGenerator, GeneratorContext, GeneratorError, GeneratorRole,
};
use deckwright_agent::pipeline::{PipelineOrchestrator, PipelineRequest};
use deckwright_agent::render::{
    DocumentRenderer, MarkdownRenderer, RenderError, RenderInput, SlotDescriptor,
};
use deckwright_core::config::PipelineConfig;
use deckwright_core::conversation::{ConversationMessage, Role};
use deckwright_core::envelope::{ContextSource, ResponseStatus, ResponseType};
use deckwright_core::intent::{DocumentType, Intent};
use deckwright_core::tag::SourceKind;

/// Per-role canned replies; roles without a script fail with a transport
/// error so the stage fallback is exercised.
#[derive(Default)]
struct ScriptedGenerator {
    intent: Option<String>,
    organize: Option<String>,
    plan: Option<String>,
    sections: Option<String>,
    summary: Option<String>,
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        role: GeneratorRole,
        _input: &str,
        _context: &GeneratorContext,
    ) -> Result<CollaboratorReply, GeneratorError> {
        let script = match role {
            GeneratorRole::IntentClassification => &self.intent,
            GeneratorRole::ContentOrganization => &self.organize,
            GeneratorRole::StructurePlanning => &self.plan,
            GeneratorRole::SectionContent => &self.sections,
            GeneratorRole::QuickSummary => &self.summary,
        };
        script
            .clone()
            .map(CollaboratorReply::new)
            .ok_or_else(|| GeneratorError::Transport("no backend".to_string()))
    }
}

struct FailingRenderer;

#[async_trait]
impl DocumentRenderer for FailingRenderer {
    fn content_slots(&self) -> Vec<SlotDescriptor> {
        vec![
            SlotDescriptor { index: 0, name: "title" },
            SlotDescriptor { index: 1, name: "content" },
        ]
    }

    fn file_extension(&self) -> &'static str {
        "pptx"
    }

    async fn render(&self, _input: &RenderInput) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Backend("template store unreachable".to_string()))
    }
}

fn pipeline_config() -> PipelineConfig {
    PipelineConfig {
        min_sections: 5,
        max_sections: 15,
        default_sections: 12,
        session_prefix: "DOC".to_string(),
        preview_chars: 800,
    }
}

fn orchestrator<G: ContentGenerator>(
    generator: G,
) -> PipelineOrchestrator<G, MarkdownRenderer> {
    PipelineOrchestrator::new(generator, MarkdownRenderer::new(), pipeline_config())
}

fn request(message: &str, history: Vec<ConversationMessage>) -> PipelineRequest {
    PipelineRequest {
        session_id: None,
        conversation_history: history,
        user_message: message.to_string(),
    }
}

#[tokio::test]
async fn information_request_returns_a_summary_without_an_artifact() {
    let generator = ScriptedGenerator {
        intent: Some(
            r#"{"intent": "INFORMATION_REQUEST", "confidence": 0.92, "document_type": "CV",
                "action": "quick_summary", "reasoning": "direct question about content"}"#
                .to_string(),
        ),
        summary: Some("This is Jane Doe's resume covering 5 years of Python work.".to_string()),
        ..ScriptedGenerator::default()
    };

    let envelope = orchestrator(generator)
        .process(request("what is this[document]Resume: Jane Doe, 5 years Python", vec![]))
        .await;

    assert_eq!(envelope.status, ResponseStatus::Completed);
    assert!(envelope.output_artifact.is_none());
    assert_eq!(
        envelope.processing_info.response_type,
        Some(ResponseType::QuickSummary)
    );

    let analysis = envelope.processing_info.intent.expect("intent analysis");
    assert_eq!(analysis.intent, Intent::InformationRequest);

    let last = envelope.conversation_history.last().expect("assistant reply");
    assert_eq!(last.role, Role::Assistant);
    assert!(last.content.contains("resume"));
    assert!(envelope.pipeline_info.contains(&"quick_summary".to_string()));
    assert!(!envelope.pipeline_info.contains(&"document_renderer".to_string()));
}

#[tokio::test]
async fn bare_upload_is_processed_without_asking_questions() {
    // no scripts at all: every collaborator stage fails and every fallback
    // must carry the request to a rendered artifact
    let envelope = orchestrator(ScriptedGenerator::default())
        .process(request("[document]Resume: Jane Doe, 5 years Python experience", vec![]))
        .await;

    assert_eq!(envelope.status, ResponseStatus::Completed);

    let analysis = envelope.processing_info.intent.expect("intent analysis");
    assert_eq!(analysis.intent, Intent::ProcessingRequest);
    assert_eq!(analysis.document_type, DocumentType::Cv);
    assert!(analysis.confidence >= 0.9);

    let artifact = envelope.output_artifact.expect("artifact");
    assert!(artifact.filename.ends_with(".md"));
    assert!(!artifact.data.is_empty());

    let section_count = envelope.processing_info.section_count.expect("count");
    assert!((5..=15).contains(&section_count));
    assert_eq!(envelope.processing_info.requested_sections, Some(section_count));
}

#[tokio::test]
async fn continuation_recovers_the_prior_document() {
    let history = vec![
        ConversationMessage::user(
            "what's in this[pdf_extraction]Project Phoenix: CRM modernization overview",
        ),
        ConversationMessage::assistant("It describes the Project Phoenix initiative."),
    ];
    let generator = ScriptedGenerator {
        intent: Some(
            r#"{"intent": "PROCESSING_REQUEST", "confidence": 0.85, "document_type": "GENERAL",
                "action": "process_general", "reasoning": "explicit create request"}"#
                .to_string(),
        ),
        ..ScriptedGenerator::default()
    };

    let envelope =
        orchestrator(generator).process(request("create the summary", history)).await;

    assert_eq!(envelope.status, ResponseStatus::Completed);
    assert_eq!(
        envelope.processing_info.context_source,
        Some(ContextSource::PreviousConversation)
    );
    assert_eq!(envelope.processing_info.file_type, Some(SourceKind::Pdf));
    assert!(envelope.output_artifact.is_some());

    let last = envelope.conversation_history.last().expect("assistant reply");
    assert!(last.content.contains("as requested"));
}

#[tokio::test]
async fn oversized_plan_proposal_is_limited_to_the_maximum() {
    let sections: Vec<String> = (1..=20)
        .map(|n| {
            format!(
                r#"{{"number": {n}, "type": "content", "title": "Topic {n}",
                    "content_outline": ["Detail one for the topic", "Detail two for the topic"]}}"#
            )
        })
        .collect();
    let plan_json = format!(
        r#"{{"analysis": {{"main_topics": ["Scale"], "complexity": "heavy"}},
            "planning": {{"target_count": 20, "reasoning": "content is dense", "hard_max": 15}},
            "sections": [{}]}}"#,
        sections.join(",")
    );
    let generator = ScriptedGenerator { plan: Some(plan_json), ..ScriptedGenerator::default() };

    let envelope = orchestrator(generator)
        .process(request("[document]A very long strategy document body", vec![]))
        .await;

    assert_eq!(envelope.status, ResponseStatus::Completed);
    assert_eq!(envelope.processing_info.section_count, Some(15));
    assert_eq!(envelope.processing_info.requested_sections, Some(15));
}

#[tokio::test]
async fn renderer_failure_is_fatal_with_a_safe_transcript_message() {
    let orchestrator = PipelineOrchestrator::new(
        ScriptedGenerator::default(),
        FailingRenderer,
        pipeline_config(),
    );

    let envelope = orchestrator
        .process(request("[document]Quarterly results and projections", vec![]))
        .await;

    assert_eq!(envelope.status, ResponseStatus::Error);
    let detail = envelope.error_message.expect("error detail");
    assert!(detail.contains("rendering failed"));

    // the transcript gets an apology, not the internal failure detail
    let last = envelope.conversation_history.last().expect("assistant reply");
    assert_eq!(last.role, Role::Assistant);
    assert!(last.content.contains("encountered an error"));
    assert!(!last.content.contains("template store"));
    assert!(envelope.output_artifact.is_none());
}

#[tokio::test]
async fn empty_message_fails_before_any_stage_runs() {
    let envelope = orchestrator(ScriptedGenerator::default())
        .process(request("   ", vec![]))
        .await;

    assert_eq!(envelope.status, ResponseStatus::Error);
    assert_eq!(envelope.error_message.as_deref(), Some("user message required"));
    assert!(envelope.pipeline_info.is_empty());
    assert!(envelope.conversation_history.is_empty());
}

#[tokio::test]
async fn message_without_any_document_waits_for_a_file() {
    let envelope = orchestrator(ScriptedGenerator::default())
        .process(request("can you make me a presentation?", vec![]))
        .await;

    assert_eq!(envelope.status, ResponseStatus::WaitingForFile);
    assert!(envelope.output_artifact.is_none());

    let last = envelope.conversation_history.last().expect("assistant reply");
    assert!(last.content.contains("upload"));
}

#[tokio::test]
async fn small_talk_without_a_document_gets_capability_guidance() {
    let envelope = orchestrator(ScriptedGenerator::default())
        .process(request("hello, how are you?", vec![]))
        .await;

    assert_eq!(envelope.status, ResponseStatus::WaitingForFile);
    assert_eq!(
        envelope.processing_info.response_type,
        Some(ResponseType::CapabilitiesInfo)
    );
    let last = envelope.conversation_history.last().expect("assistant reply");
    assert!(last.content.contains("Upload a document"));
}

#[tokio::test]
async fn session_id_is_generated_when_absent_and_preserved_when_present() {
    let generated = orchestrator(ScriptedGenerator::default())
        .process(request("[document]body text", vec![]))
        .await;
    assert!(generated.session_id.starts_with("DOC"));

    let preserved = orchestrator(ScriptedGenerator::default())
        .process(PipelineRequest {
            session_id: Some("DOC01012026DEADBEEF".to_string()),
            conversation_history: vec![],
            user_message: "[document]body text".to_string(),
        })
        .await;
    assert_eq!(preserved.session_id, "DOC01012026DEADBEEF");
}

#[tokio::test]
async fn processing_pipeline_reports_every_stage_in_order() {
    let envelope = orchestrator(ScriptedGenerator::default())
        .process(request("[document]body text for the deck", vec![]))
        .await;

    let expected = [
        "tag_parser",
        "conversation_resolver",
        "intent_resolver",
        "content_organizer",
        "structure_planner",
        "section_content_generator",
        "layout_synthesizer",
        "document_renderer",
        "output_assembler",
    ];
    assert_eq!(envelope.pipeline_info, expected);
}

#[tokio::test]
async fn quick_summary_failure_degrades_to_a_preview() {
    let generator = ScriptedGenerator {
        intent: Some(
            r#"{"intent": "INFORMATION_REQUEST", "confidence": 0.9,
                "reasoning": "question words"}"#
                .to_string(),
        ),
        ..ScriptedGenerator::default()
    };

    let envelope = orchestrator(generator)
        .process(request("what is this[document]Board meeting minutes for March", vec![]))
        .await;

    assert_eq!(envelope.status, ResponseStatus::Completed);
    let last = envelope.conversation_history.last().expect("assistant reply");
    assert!(last.content.contains("Board meeting minutes"));
}

#[tokio::test]
async fn rendered_markdown_contains_table_for_tabular_content() {
    let plan_json = r#"{
        "analysis": {"main_topics": ["Budget"], "complexity": "light"},
        "planning": {"target_count": 5, "reasoning": "compact", "hard_max": 15},
        "sections": [
            {"number": 1, "type": "title", "title": "Budget Review", "content_outline": ["Overview of spending"]},
            {"number": 2, "type": "introduction", "title": "Introduction", "content_outline": ["Context for the quarter", "Scope of the review"]},
            {"number": 3, "type": "insight", "title": "Spending Breakdown", "content_outline": ["Budget: $50,000", "Ops: $30,000", "Support: $20,000"]},
            {"number": 4, "type": "recommendations", "title": "Recommendations", "content_outline": ["Hold spending steady", "Review vendor contracts"]},
            {"number": 5, "type": "thank_you", "title": "Thank You", "content_outline": ["Questions welcome"]}
        ]
    }"#;
    let generator = ScriptedGenerator {
        plan: Some(plan_json.to_string()),
        ..ScriptedGenerator::default()
    };

    let envelope = orchestrator(generator)
        .process(request("[document]Budget: $50,000 across teams", vec![]))
        .await;

    assert_eq!(envelope.status, ResponseStatus::Completed);
    let artifact = envelope.output_artifact.expect("artifact");
    let decoded = {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.decode(artifact.data).expect("base64")
    };
    let markdown = String::from_utf8(decoded).expect("utf8");

    assert!(markdown.contains("| Item | Amount |"));
    assert!(markdown.contains("| Budget | $50,000 |"));
    assert!(markdown.contains("## Spending Breakdown"));
}
