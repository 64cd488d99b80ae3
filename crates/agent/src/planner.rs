use deckwright_core::plan::{PresentationPlan, SectionBounds, StructurePlanner};

use crate::collaborator::{ContentGenerator, GeneratorContext, GeneratorRole};

/// Input handed to the planning collaborator is capped so a large document
/// cannot blow the request budget; the full text already went through the
/// organization stage.
const PLANNING_INPUT_CHARS: usize = 2_500;

/// Collaborator-backed structure planning. The collaborator proposes a
/// target count and section list; the core planner then clamps, reconciles,
/// and renumbers so the returned plan always satisfies the bounds
/// invariant. An unusable proposal drops to the rule-based fallback plan.
pub struct PlanResolver<'g, G> {
    generator: &'g G,
    planner: StructurePlanner,
    default_sections: usize,
}

impl<'g, G> PlanResolver<'g, G>
where
    G: ContentGenerator,
{
    pub fn new(generator: &'g G, bounds: SectionBounds, default_sections: usize) -> Self {
        Self { generator, planner: StructurePlanner::new(bounds), default_sections }
    }

    pub async fn plan(&self, organized_content: &str) -> PresentationPlan {
        let input: String = organized_content.chars().take(PLANNING_INPUT_CHARS).collect();
        let context = GeneratorContext {
            target_sections: Some(self.default_sections),
            ..GeneratorContext::default()
        };

        let reply = match self
            .generator
            .generate(GeneratorRole::StructurePlanning, &input, &context)
            .await
        {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(
                    event_name = "planner.collaborator_failed",
                    error = %error,
                    "structure planning failed, using rule-based fallback"
                );
                return self.planner.fallback_plan(organized_content);
            }
        };

        match serde_json::from_str::<PresentationPlan>(reply.stripped()) {
            Ok(proposal) => self.planner.normalize(proposal),
            Err(error) => {
                tracing::warn!(
                    event_name = "planner.reply_unparseable",
                    error = %error,
                    "structure planning reply was not a valid plan, using rule-based fallback"
                );
                self.planner.fallback_plan(organized_content)
            }
        }
    }
}
