//! Built-in archetypes shipped with the `praxis` binary

use praxis_core::archetype::{Archetype, ArchetypeRegistry, BuildScope, Declarations};
use praxis_core::node::{Guideline, Rule, Section};
use praxis_core::syntax::{for_each, if_stmt, store_as, task, Store};
use praxis_core::Result;

/// Registry with every built-in archetype
pub fn registry() -> ArchetypeRegistry {
    let mut registry = ArchetypeRegistry::new();
    registry
        .register::<Brain>()
        .register::<QualityGates>()
        .register::<Explore>();
    registry
}

/// Orchestrating system prompt
#[derive(Debug, Default)]
pub struct Brain;

impl Archetype for Brain {
    fn class(&self) -> &str {
        "core.brain"
    }

    fn declare(&self, d: &mut Declarations) {
        d.meta("id", "brain")
            .meta("description", "Coordinates specialised agents")
            .purpose("Plan the work, delegate focused tasks, verify every result.")
            .rule(
                Rule::new("delegate-first")
                    .critical()
                    .text("Never explore a large codebase yourself; delegate to agent.explore.")
                    .why("Exploration floods the context window")
                    .on_violation("Stop and hand the search to a subagent"),
            )
            .include("core.quality-gates")
            .include("agent.explore");
    }

    fn handle(&self, scope: &mut BuildScope<'_, '_>) -> Result<()> {
        let language = scope.var_str("RESPONSE_LANGUAGE", "English");

        scope.add(Section::mission().text(format!(
            "Deliver working software. Answer in {}.",
            language
        )));
        scope.add(
            Section::execute()
                .text(task([
                    "Read the request",
                    store_as("PLAN", ["steps", "risks"]).as_str(),
                    "Delegate each step",
                    "Verify with core.quality-gates",
                ]))
                .child(
                    Section::guidelines().child(
                        Guideline::new("delegation_loop")
                            .goal("Every step ends in a verified result")
                            .phase(for_each(
                                &Store::var("plan"),
                                if_stmt("step is exploratory", "delegate to agent.explore", None),
                            ))
                            .phase("Collect results and mark each step completed")
                            .keyed_example("good", "Explore finds the call sites, brain edits them"),
                    ),
                ),
        );
        Ok(())
    }
}

/// Checks every change has to pass before it counts as done
#[derive(Debug, Default)]
pub struct QualityGates;

impl Archetype for QualityGates {
    fn class(&self) -> &str {
        "core.quality-gates"
    }

    fn declare(&self, d: &mut Declarations) {
        d.rule(
            Rule::new("tests-pass")
                .critical()
                .text("A task is completed only when its tests pass.")
                .why("Unverified work regresses silently"),
        )
        .rule(
            Rule::new("no-new-warnings")
                .medium()
                .text("Leave the build without new warnings."),
        )
        .guideline(
            Guideline::new("verification")
                .text("Run the narrowest check first, then the full suite.")
                .line("Unit tests for the touched module")
                .line("The whole suite before reporting success"),
        );
    }
}

/// Read-only codebase exploration subagent
#[derive(Debug, Default)]
pub struct Explore;

impl Archetype for Explore {
    fn class(&self) -> &str {
        "agent.explore"
    }

    fn model_category(&self) -> Option<&str> {
        Some("subagent")
    }

    fn declare(&self, d: &mut Declarations) {
        d.meta("id", "explore")
            .meta("model", "haiku")
            .rule(
                Rule::new("read-only")
                    .critical()
                    .text("Never modify files while exploring."),
            );
    }

    fn handle(&self, scope: &mut BuildScope<'_, '_>) -> Result<()> {
        let depth = scope.var("EXPLORE_DEPTH", 3);
        scope.add(
            Section::provides()
                .id("explore")
                .text("Fast search across the repository")
                .attribute("depth", depth)
                .child(
                    Section::guidelines().child(
                        Guideline::new("search_order")
                            .phase("Glob for candidate files")
                            .phase("Grep inside the candidates")
                            .phase("Read only the matching regions")
                            .example("Glob **/*.rs, then grep for the symbol"),
                    ),
                ),
        );
        Ok(())
    }
}
