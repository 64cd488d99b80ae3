//! Pipeline orchestration and collaborator seams.
//!
//! This crate drives one conversational document-transformation request
//! end to end:
//! 1. **Context reconstruction** - tag parsing and prior-document recovery
//!    (delegated to `deckwright-core`)
//! 2. **Intent resolution** (`intent`) - collaborator-backed classification
//!    with a confidence-gated override and a keyword fallback
//! 3. **Content pipeline** (`content`, `planner`) - organization, structure
//!    planning, and section expansion, each with an independent rule-based
//!    fallback
//! 4. **Synthesis and rendering** (`deck`, `render`) - table detection,
//!    layout assignment, and the renderer seam
//!
//! # Key Types
//!
//! - `PipelineOrchestrator` - per-request state machine (see `pipeline`)
//! - `ContentGenerator` - pluggable text-generation collaborator
//! - `DocumentRenderer` - pluggable artifact renderer with an explicit
//!   content-slot capability
//!
//! # Degradation Principle
//!
//! Every collaborator call before rendering follows catch, degrade,
//! continue: a failed stage substitutes its deterministic fallback and the
//! request keeps moving. Only the final rendering stage aborts the request.

pub mod client;
pub mod collaborator;
pub mod content;
pub mod deck;
pub mod intent;
pub mod pipeline;
pub mod planner;
pub mod render;

pub use client::HttpGenerator;
pub use collaborator::{
    CollaboratorReply, ContentGenerator, GeneratorContext, GeneratorError, GeneratorResponse,
    GeneratorRole,
};
pub use deck::{DeckDocument, DeckSection};
pub use pipeline::{PipelineOrchestrator, PipelineRequest, PipelineState};
pub use render::{DocumentRenderer, MarkdownRenderer, RenderError, RenderInput, SlotDescriptor};
