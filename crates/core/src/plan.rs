//! Section planning types and the invariant-enforcing structure planner.
//!
//! A plan is valid only when `bounds.min <= sections.len() ==
//! planning.target_count <= bounds.max`. Every entry point that mutates a
//! plan re-establishes that invariant by clamping the target, truncating or
//! padding the section list, and renumbering.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Title,
    Agenda,
    Introduction,
    Insight,
    Recommendations,
    Conclusion,
    ThankYou,
    Content,
    Summary,
    Standout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentComplexity {
    Light,
    Medium,
    Heavy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub number: usize,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub content_outline: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub main_topics: Vec<String>,
    pub complexity: ContentComplexity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPlanning {
    pub target_count: usize,
    pub reasoning: String,
    pub hard_max: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationPlan {
    pub analysis: ContentAnalysis,
    pub planning: SectionPlanning,
    pub sections: Vec<SectionSpec>,
}

impl PresentationPlan {
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

/// Inclusive bounds on how many sections a plan may contain, enforced
/// regardless of upstream suggestions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionBounds {
    pub min: usize,
    pub max: usize,
}

impl SectionBounds {
    pub fn clamp(&self, count: usize) -> usize {
        count.clamp(self.min, self.max)
    }
}

impl Default for SectionBounds {
    fn default() -> Self {
        Self { min: 5, max: 15 }
    }
}

const TOPIC_LIMIT: usize = 5;
const TOPIC_PREVIEW_CHARS: usize = 50;
const FILLER_OUTLINE: [&str; 3] = ["Key information", "Supporting details", "Examples"];

// Content-volume thresholds for the fallback target count.
const LIGHT_CONTENT_CHARS: usize = 1_000;
const MEDIUM_CONTENT_CHARS: usize = 3_000;

#[derive(Clone, Copy, Debug, Default)]
pub struct StructurePlanner {
    pub bounds: SectionBounds,
}

impl StructurePlanner {
    pub fn new(bounds: SectionBounds) -> Self {
        Self { bounds }
    }

    /// Re-establish the plan invariants after any upstream mutation or
    /// collaborator proposal: clamp the target into bounds (recording why in
    /// the reasoning), then reconcile the section list length to the target
    /// by truncating or padding with generic content sections.
    pub fn normalize(&self, mut plan: PresentationPlan) -> PresentationPlan {
        if plan.planning.target_count > self.bounds.max {
            plan.planning.target_count = self.bounds.max;
            plan.planning
                .reasoning
                .push_str(&format!(" | limited to maximum {} sections", self.bounds.max));
        } else if plan.planning.target_count < self.bounds.min {
            plan.planning.target_count = self.bounds.min;
            plan.planning
                .reasoning
                .push_str(&format!(" | minimum {} sections enforced", self.bounds.min));
        }
        plan.planning.hard_max = self.bounds.max;

        let target = plan.planning.target_count;
        if plan.sections.len() > target {
            plan.sections.truncate(target);
        }
        while plan.sections.len() < target {
            let ordinal = plan.sections.len() + 1;
            plan.sections.push(SectionSpec {
                number: ordinal,
                section_type: SectionType::Content,
                title: format!("Additional Content {}", ordinal.saturating_sub(1)),
                content_outline: FILLER_OUTLINE.iter().map(|item| item.to_string()).collect(),
            });
        }

        renumber(&mut plan.sections);
        plan
    }

    /// Rule-based plan used when the planning collaborator is unavailable
    /// or returns something unparseable. Segments the content on blank
    /// lines, derives a short topic list, picks a target from content
    /// volume, and lays out the canonical outline with the insight block
    /// stretched or compressed to hit the target exactly.
    pub fn fallback_plan(&self, organized_content: &str) -> PresentationPlan {
        let segments: Vec<&str> = organized_content
            .split("\n\n")
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        let main_topics: Vec<String> =
            segments.iter().take(TOPIC_LIMIT).map(|segment| topic_preview(segment)).collect();

        let volume = organized_content.len();
        let raw_target = if volume < LIGHT_CONTENT_CHARS {
            8
        } else if volume < MEDIUM_CONTENT_CHARS {
            12
        } else {
            16
        };
        let target = self.bounds.clamp(raw_target);

        let complexity = if volume < LIGHT_CONTENT_CHARS {
            ContentComplexity::Light
        } else if volume < MEDIUM_CONTENT_CHARS {
            ContentComplexity::Medium
        } else {
            ContentComplexity::Heavy
        };

        let plan = PresentationPlan {
            analysis: ContentAnalysis { main_topics: main_topics.clone(), complexity },
            planning: SectionPlanning {
                target_count: target,
                reasoning: format!(
                    "fallback analysis: {} content segments mapped to {} sections",
                    segments.len(),
                    target
                ),
                hard_max: self.bounds.max,
            },
            sections: canonical_outline(&main_topics, target),
        };

        self.normalize(plan)
    }
}

fn renumber(sections: &mut [SectionSpec]) {
    for (index, section) in sections.iter_mut().enumerate() {
        section.number = index + 1;
    }
}

fn topic_preview(segment: &str) -> String {
    let first_line = segment.lines().next().unwrap_or(segment).trim();
    if first_line.chars().count() <= TOPIC_PREVIEW_CHARS {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(TOPIC_PREVIEW_CHARS).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Canonical fallback outline: Title, Agenda, Introduction, one insight per
/// topic, Recommendations, Conclusion, Thank You. Targets below seven use a
/// compressed skeleton since the full frame alone needs six sections.
fn canonical_outline(topics: &[String], target: usize) -> Vec<SectionSpec> {
    let mut sections = Vec::with_capacity(target);

    if target >= 7 {
        sections.push(section(SectionType::Title, "Document Presentation", title_outline()));
        sections.push(section(SectionType::Agenda, "Agenda", agenda_outline(topics)));
        sections.push(section(
            SectionType::Introduction,
            "Introduction",
            vec!["Context and background".to_string(), "Why this matters".to_string()],
        ));

        let insight_count = target - 6;
        for index in 0..insight_count {
            sections.push(insight_section(topics, index));
        }

        sections.push(section(
            SectionType::Recommendations,
            "Recommendations",
            vec!["Actionable recommendations".to_string(), "Priority next steps".to_string()],
        ));
        sections.push(section(
            SectionType::Conclusion,
            "Conclusion",
            vec!["Key takeaways".to_string(), "Main conclusions".to_string()],
        ));
        sections.push(thank_you_section());
    } else {
        sections.push(section(SectionType::Title, "Document Presentation", title_outline()));
        sections.push(section(
            SectionType::Introduction,
            "Introduction",
            vec!["Context and background".to_string(), "Why this matters".to_string()],
        ));
        sections.push(insight_section(topics, 0));
        sections.push(section(
            SectionType::Recommendations,
            "Recommendations",
            vec!["Actionable recommendations".to_string(), "Priority next steps".to_string()],
        ));
        sections.push(thank_you_section());

        // Stretch with extra insights or trim from the back to hit the
        // target exactly; a one-section plan degrades to just the title.
        while sections.len() < target {
            let insight_position = sections.len() - 2;
            sections.insert(insight_position, insight_section(topics, sections.len() - 4));
        }
        sections.truncate(target);
    }

    renumber(&mut sections);
    sections
}

fn section(section_type: SectionType, title: &str, content_outline: Vec<String>) -> SectionSpec {
    SectionSpec { number: 0, section_type, title: title.to_string(), content_outline }
}

fn title_outline() -> Vec<String> {
    vec!["Main title".to_string(), "Document overview".to_string()]
}

fn agenda_outline(topics: &[String]) -> Vec<String> {
    if topics.is_empty() {
        vec!["Overview".to_string(), "Analysis".to_string(), "Recommendations".to_string()]
    } else {
        topics.to_vec()
    }
}

fn insight_section(topics: &[String], index: usize) -> SectionSpec {
    let (title, lead) = match topics.get(index % topics.len().max(1)) {
        Some(topic) => (topic.clone(), topic.clone()),
        None => (format!("Key Insight {}", index + 1), "Key insight".to_string()),
    };
    SectionSpec {
        number: 0,
        section_type: SectionType::Insight,
        title,
        content_outline: vec![
            lead,
            "Supporting information".to_string(),
            "Key details".to_string(),
        ],
    }
}

fn thank_you_section() -> SectionSpec {
    section(
        SectionType::ThankYou,
        "Thank You",
        vec!["Questions and discussion welcome".to_string()],
    )
}
