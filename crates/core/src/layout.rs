//! Section-type to physical layout-slot mapping.
//!
//! The ideal mapping assumes the full slot inventory of the standard
//! rendering template. A renderer may expose fewer physical slots, so every
//! lookup degrades to a deterministic rotation over the content-slot range
//! that does exist; a section always gets a valid slot.

use serde::{Deserialize, Serialize};

use crate::plan::{PresentationPlan, SectionType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutAssignment {
    pub section_number: usize,
    pub layout_slot: usize,
}

/// Slot 0 is the title layout in every template.
pub const TITLE_SLOT: usize = 0;
/// Reserved closing layout index in the full template inventory.
pub const CLOSING_SLOT: usize = 12;

fn ideal_slot(section_type: SectionType) -> usize {
    match section_type {
        SectionType::Title => TITLE_SLOT,
        SectionType::Agenda => 1,
        SectionType::Introduction => 2,
        SectionType::Insight | SectionType::Content => 3,
        SectionType::Summary | SectionType::Conclusion => 4,
        SectionType::Recommendations => 5,
        SectionType::Standout => 6,
        SectionType::ThankYou => CLOSING_SLOT,
    }
}

/// Map a section type onto a slot index within `available_slots`. Out-of-
/// range ideals rotate through the content range (everything past slot 0)
/// by modulo; a single-slot inventory degrades everything to slot 0.
pub fn map_layout(section_type: SectionType, available_slots: usize) -> usize {
    if available_slots <= 1 {
        return 0;
    }
    let ideal = ideal_slot(section_type);
    if ideal < available_slots {
        return ideal;
    }
    1 + (ideal - 1) % (available_slots - 1)
}

pub fn assign(plan: &PresentationPlan, available_slots: usize) -> Vec<LayoutAssignment> {
    plan.sections
        .iter()
        .map(|section| LayoutAssignment {
            section_number: section.number,
            layout_slot: map_layout(section.section_type, available_slots),
        })
        .collect()
}
