//! Prompt Templates
//!
//! The system prompt shared by every worker plus the two cadence-specific
//! cycle prompts. The reactive template asks for an immediate 2-3 second
//! action from the instruction vocabulary; the strategic template asks
//! for multi-day planning, where an instruction block is an optional
//! minor component of the analysis.

use crate::types::CadenceKind;

/// Shared system prompt for every worker in the run.
pub const SYSTEM_PROMPT: &str = "\
You are an agent playing a farming simulation game. You see the game through \
full-screen captures and act through a small instruction vocabulary. Your task \
is to read the current game state from the screen and choose the best actions \
to manage the farm, develop skills, build relationships, and make progress.

Game objectives include, but are not limited to:
- Developing and optimizing the farm (planting crops, raising animals, building facilities)
- Completing collection bundles
- Building friendships with villagers
- Upgrading tools and skills
- Exploring mines and other areas
- Participating in seasonal festivals

Base every decision on what is visible on screen: the clock, the energy bar, \
your location, and the inventory hotbar.";

const REACTIVE_PROMPT: &str = "\
Analyze the current screenshot and produce instructions controlling the \
character for the next 2-3 seconds. Pick the single most suitable immediate \
action: crop care, resource collection, or interacting with someone nearby.

### Instruction vocabulary (one per line):
- move <up|down|left|right> [seconds] -- walk in a direction
- press <key> [seconds] -- hold a key
- tap <key> -- tap a key once (1-9 switch item slots, e opens inventory, f eats, c crafts, esc closes menus)
- click [left|right] [<x> <y>] -- use the held tool / interact
- cursor <x> <y> -- move the mouse cursor
- scroll <amount>
- wait <seconds>

### Reading the screen:
- Top right corner shows the time and energy
- The bottom bar shows item slots
- Identify the current location (farm, town, mine, ...)
- Notice any activity already in progress (watering, fishing, mining, ...)

### Priorities:
1. Urgent needs (low energy, late in the day)
2. Daily chores (watering, harvesting, animal care)
3. Resource gathering (foraging, mining, woodcutting)
4. Social activity (gifts, events)

### Output format:
Reply with ONE fenced code block containing only instructions from the \
vocabulary above, with a short # comment per step.";

const STRATEGIC_PROMPT: &str = "\
Analyze the current screenshot and develop a plan for the next several \
in-game days, up to the rest of the season.

### Consider:
- Current season and weather
- Farm layout and development stage
- Available funds and resources
- Bundle completion progress
- Skill levels and unlocked content
- Relationship standings

### Plan for:
- Seasonal crop selection and timing
- Infrastructure investment (buildings, tool upgrades)
- Which skills to prioritize
- Bundle donation order
- Which relationships to develop

### Output format:
1. Game state analysis
2. Long-term goals
3. Near-term steps
If a concrete in-game action would help right now (checking a menu, reading \
the calendar), optionally end with one fenced code block of instructions:
move <up|down|left|right> [seconds], press <key> [seconds], tap <key>, \
click [left|right] [<x> <y>], cursor <x> <y>, scroll <amount>, wait <seconds>.";

/// The per-cycle prompt for a cadence.
pub fn cycle_prompt(cadence: CadenceKind) -> &'static str {
    match cadence {
        CadenceKind::Reactive => REACTIVE_PROMPT,
        CadenceKind::Strategic => STRATEGIC_PROMPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadences_get_distinct_prompts() {
        assert_ne!(
            cycle_prompt(CadenceKind::Reactive),
            cycle_prompt(CadenceKind::Strategic)
        );
    }

    #[test]
    fn reactive_prompt_names_the_vocabulary() {
        let p = cycle_prompt(CadenceKind::Reactive);
        for verb in ["move", "press", "tap", "click", "cursor", "scroll", "wait"] {
            assert!(p.contains(verb), "missing verb {}", verb);
        }
    }
}
