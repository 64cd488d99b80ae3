//! Content organization and section-content expansion stages.
//!
//! Both stages delegate to the generation collaborator and both degrade
//! independently: organization falls back to the raw document text,
//! expansion falls back to the plan's own outlines filtered for
//! substantive items.

use serde::Deserialize;

use deckwright_core::plan::PresentationPlan;

use crate::collaborator::{ContentGenerator, GeneratorContext, GeneratorRole};

/// Bullet budget per section, matching what a rendered layout can hold.
const MAX_SECTION_ITEMS: usize = 6;
/// Outline items at or below this length are headings or stubs, not body
/// content worth rendering on their own.
const SUBSTANTIVE_ITEM_CHARS: usize = 10;

pub struct ContentOrganizer<'g, G> {
    generator: &'g G,
}

impl<'g, G> ContentOrganizer<'g, G>
where
    G: ContentGenerator,
{
    pub fn new(generator: &'g G) -> Self {
        Self { generator }
    }

    /// Reorganize raw extracted text into presentation-ready prose. On any
    /// collaborator failure the raw text passes through unchanged.
    pub async fn organize(&self, raw_text: &str) -> String {
        match self
            .generator
            .generate(GeneratorRole::ContentOrganization, raw_text, &GeneratorContext::default())
            .await
        {
            Ok(reply) if !reply.text.trim().is_empty() => reply.text,
            Ok(_) => raw_text.to_string(),
            Err(error) => {
                tracing::warn!(
                    event_name = "organizer.collaborator_failed",
                    error = %error,
                    "content organization failed, passing raw text through"
                );
                raw_text.to_string()
            }
        }
    }
}

#[derive(Deserialize)]
struct SectionReply {
    #[serde(default)]
    content: Vec<String>,
}

pub struct SectionExpander<'g, G> {
    generator: &'g G,
}

impl<'g, G> SectionExpander<'g, G>
where
    G: ContentGenerator,
{
    pub fn new(generator: &'g G) -> Self {
        Self { generator }
    }

    /// Expand each planned section's outline into body lines. Returns one
    /// entry per plan section, in order. A reply that is unparseable or
    /// does not align with the plan drops to the outline-derived fallback.
    pub async fn expand(&self, plan: &PresentationPlan) -> Vec<Vec<String>> {
        let input = match serde_json::to_string(&plan.sections) {
            Ok(serialized) => serialized,
            Err(_) => return outline_bodies(plan),
        };
        let context = GeneratorContext {
            target_sections: Some(plan.planning.target_count),
            ..GeneratorContext::default()
        };

        let reply = match self
            .generator
            .generate(GeneratorRole::SectionContent, &input, &context)
            .await
        {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(
                    event_name = "expander.collaborator_failed",
                    error = %error,
                    "section content generation failed, using plan outlines"
                );
                return outline_bodies(plan);
            }
        };

        match serde_json::from_str::<Vec<SectionReply>>(reply.stripped()) {
            Ok(sections) if sections.len() == plan.sections.len() => sections
                .into_iter()
                .zip(&plan.sections)
                .map(|(section, spec)| {
                    let body: Vec<String> = section
                        .content
                        .into_iter()
                        .filter(|item| !item.trim().is_empty())
                        .take(MAX_SECTION_ITEMS)
                        .collect();
                    if body.is_empty() {
                        outline_body(&spec.content_outline)
                    } else {
                        body
                    }
                })
                .collect(),
            Ok(sections) => {
                tracing::warn!(
                    event_name = "expander.reply_misaligned",
                    expected = plan.sections.len(),
                    received = sections.len(),
                    "section content reply did not align with the plan, using outlines"
                );
                outline_bodies(plan)
            }
            Err(error) => {
                tracing::warn!(
                    event_name = "expander.reply_unparseable",
                    error = %error,
                    "section content reply was not valid JSON, using outlines"
                );
                outline_bodies(plan)
            }
        }
    }
}

fn outline_bodies(plan: &PresentationPlan) -> Vec<Vec<String>> {
    plan.sections.iter().map(|section| outline_body(&section.content_outline)).collect()
}

/// Keep outline items long enough to stand alone as bullets; when the
/// filter would leave fewer than two, fall back to the full outline so the
/// section is never empty.
fn outline_body(outline: &[String]) -> Vec<String> {
    let substantive: Vec<String> = outline
        .iter()
        .filter(|item| item.trim().chars().count() > SUBSTANTIVE_ITEM_CHARS)
        .take(MAX_SECTION_ITEMS)
        .cloned()
        .collect();

    if substantive.len() >= 2 {
        substantive
    } else {
        outline.iter().take(MAX_SECTION_ITEMS).cloned().collect()
    }
}
