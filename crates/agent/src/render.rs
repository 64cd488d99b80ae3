//! Document renderer seam and the default markdown renderer.
//!
//! Renderers expose their slot inventory explicitly through
//! `content_slots()`; the synthesis stage maps sections onto those indices
//! up front instead of probing placeholders at render time. Rendering is
//! the one pipeline stage whose failure is fatal to the request.

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::deck::DeckDocument;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotDescriptor {
    pub index: usize,
    pub name: &'static str,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer rejected the document: {0}")]
    Rejected(String),
    #[error("rendering backend failed: {0}")]
    Backend(String),
}

#[derive(Clone, Debug)]
pub enum RenderInput {
    Deck(DeckDocument),
    Markdown(String),
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Physical layout slots this renderer's template exposes, in index
    /// order. The inventory may be smaller than the ideal mapping assumes.
    fn content_slots(&self) -> Vec<SlotDescriptor>;

    /// File extension for artifacts this renderer produces.
    fn file_extension(&self) -> &'static str;

    async fn render(&self, input: &RenderInput) -> Result<Vec<u8>, RenderError>;
}

/// Default renderer: emits the deck as a pandoc-style markdown document
/// (YAML front matter, one `##` heading per section, bullet lists or
/// markdown tables). Binary PDF/PPTX rendering stays behind an external
/// renderer implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownRenderer;

const TEMPLATE_SLOTS: [&str; 13] = [
    "title",
    "agenda",
    "introduction",
    "content",
    "summary",
    "recommendations",
    "standout",
    "two_column",
    "quote",
    "image_left",
    "image_right",
    "blank",
    "closing",
];

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentRenderer for MarkdownRenderer {
    fn content_slots(&self) -> Vec<SlotDescriptor> {
        TEMPLATE_SLOTS
            .iter()
            .enumerate()
            .map(|(index, name)| SlotDescriptor { index, name })
            .collect()
    }

    fn file_extension(&self) -> &'static str {
        "md"
    }

    async fn render(&self, input: &RenderInput) -> Result<Vec<u8>, RenderError> {
        let markdown = match input {
            RenderInput::Markdown(markdown) => {
                if markdown.trim().is_empty() {
                    return Err(RenderError::Rejected("markdown document is empty".to_string()));
                }
                markdown.clone()
            }
            RenderInput::Deck(deck) => {
                if deck.sections.is_empty() {
                    return Err(RenderError::Rejected("deck has no sections".to_string()));
                }
                deck_to_markdown(deck)
            }
        };
        Ok(markdown.into_bytes())
    }
}

pub fn deck_to_markdown(deck: &DeckDocument) -> String {
    let mut output = String::new();
    output.push_str("---\n");
    output.push_str(&format!("title: \"{}\"\n", deck.title.replace('"', "'")));
    output.push_str(&format!("date: \"{}\"\n", Utc::now().format("%Y-%m-%d")));
    output.push_str("---\n\n");
    output.push_str(&format!("# {}\n", deck.title));

    for section in &deck.sections {
        output.push_str("\n---\n\n");
        output.push_str(&format!("## {}\n\n", section.title));

        match &section.table {
            Some(table) => {
                output.push_str(&format!("| {} |\n", table.headers.join(" | ")));
                output.push_str(&format!(
                    "|{}|\n",
                    table.headers.iter().map(|_| "---").collect::<Vec<_>>().join("|")
                ));
                for row in &table.rows {
                    output.push_str(&format!("| {} |\n", row.join(" | ")));
                }
            }
            None => {
                for item in &section.body {
                    output.push_str(&format!("- {item}\n"));
                }
            }
        }
    }

    output
}
