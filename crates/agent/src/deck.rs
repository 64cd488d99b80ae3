//! Deck synthesis: join the plan with expanded section bodies, decide
//! bullets-versus-table per section, and pin every section to a physical
//! layout slot from the renderer's inventory.

use deckwright_core::layout;
use deckwright_core::plan::{PresentationPlan, SectionType};
use deckwright_core::table::{self, TableResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckSection {
    pub number: usize,
    pub section_type: SectionType,
    pub title: String,
    pub body: Vec<String>,
    pub table: Option<TableResult>,
    pub layout_slot: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckDocument {
    pub title: String,
    pub sections: Vec<DeckSection>,
}

impl DeckDocument {
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

/// Build the renderable deck. `bodies` must align with `plan.sections`
/// (the expander guarantees this); an insight section whose body detects
/// as tabular is promoted to a standout section so it lands on the wider
/// layout.
pub fn synthesize(plan: &PresentationPlan, bodies: &[Vec<String>], available_slots: usize) -> DeckDocument {
    let title = plan
        .sections
        .iter()
        .find(|section| section.section_type == SectionType::Title)
        .map(|section| section.title.clone())
        .unwrap_or_else(|| "Document Presentation".to_string());

    let sections = plan
        .sections
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let body = bodies.get(index).cloned().unwrap_or_else(|| spec.content_outline.clone());
            let detection = table::detect(&body);
            let table = detection.is_table.then_some(detection);

            let section_type = if table.is_some() && spec.section_type == SectionType::Insight {
                SectionType::Standout
            } else {
                spec.section_type
            };

            DeckSection {
                number: spec.number,
                section_type,
                title: spec.title.clone(),
                body,
                table,
                layout_slot: layout::map_layout(section_type, available_slots),
            }
        })
        .collect();

    DeckDocument { title, sections }
}
