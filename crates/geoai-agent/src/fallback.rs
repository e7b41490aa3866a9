//! Offline analysis: canned paragraphs picked by keyword when no provider
//! can answer.
//!
//! Keywords match as case-insensitive substrings, so "us" also hits "USA"
//! and "discuss". Each topic is a conjunction of keyword groups: every group
//! must contribute at least one hit. Topics are checked in order and the
//! first match wins.

use geoai_core::types::{ConversationMessage, Role};

const IRAN: &str = "CRITICAL ANALYSIS: Iran-Israel-US escalation represents the most dangerous Middle East crisis in decades. Iran's ballistic missile strikes on Israeli military targets have triggered massive Israeli retaliation against Iranian nuclear facilities. US carrier deployment signals potential for wider regional war. Oil markets in panic as Strait of Hormuz closure threatened.";

const UKRAINE: &str = "ONGOING CONFLICT: Russia-Ukraine war continues with systematic targeting of civilian infrastructure. Winter campaign focuses on energy warfare. Western military aid sustaining Ukrainian resistance while sanctions pressure Russian economy. Risk of NATO involvement remains if attacks spill beyond borders.";

const KASHMIR: &str = "NUCLEAR FLASHPOINT: India-Pakistan tensions over Kashmir have escalated dramatically with 300% increase in cross-border incidents. Both nuclear powers have reinforced military positions along Line of Control. Risk of miscalculation extremely high given nuclear doctrines and domestic political pressures.";

const TAIWAN: &str = "STRATEGIC CRISIS: Taiwan Strait tensions at highest level since 1996. Chinese military exercises demonstrate invasion capabilities while Taiwan enhances defensive preparations. US strategic ambiguity tested as semiconductor supply chains face disruption risk. Economic implications global.";

const NORTH_KOREA: &str = "NUCLEAR PROLIFERATION: North Korea continues to expand its missile and warhead programs in defiance of UN sanctions. Repeated ballistic missile launches over and around Japanese waters keep regional forces on alert. Deepening military cooperation with Russia reduces Pyongyang's isolation. Risk of a seventh nuclear test remains elevated.";

/// Returned when no topic matches.
pub const DEFAULT_ANALYSIS: &str = "I can provide analysis on current geopolitical situations including Iran-Israel tensions, Russia-Ukraine conflict, India-Pakistan Kashmir dispute, China-Taiwan crisis, North Korea nuclear program, and global economic security challenges. Please specify which area interests you most.";

/// A keyword group; any member may match.
type Group = &'static [&'static str];

struct Topic {
    /// Alternative conjunctions; the topic matches if any of them does.
    any_of: &'static [&'static [Group]],
    analysis: &'static str,
}

static TOPICS: &[Topic] = &[
    Topic {
        any_of: &[&[&["iran"], &["israel", "us", "america", "united states"]]],
        analysis: IRAN,
    },
    Topic {
        any_of: &[&[&["ukraine", "russia"]]],
        analysis: UKRAINE,
    },
    Topic {
        any_of: &[&[&["kashmir"]], &[&["india"], &["pakistan"]]],
        analysis: KASHMIR,
    },
    Topic {
        any_of: &[&[&["china", "chinese"], &["taiwan"]]],
        analysis: TAIWAN,
    },
    Topic {
        any_of: &[&[&["north korea", "pyongyang", "dprk"]]],
        analysis: NORTH_KOREA,
    },
];

/// Lowercased forms of the text a keyword may appear in: as typed, with
/// punctuation turned into spaces ("north-korea"), and with punctuation
/// removed ("u.s.").
fn haystacks(text: &str) -> [String; 3] {
    let lower = text.to_lowercase();
    let spaced: String = lower
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let spaced = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let squeezed: String = lower
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    [lower, spaced, squeezed]
}

/// Pick the canned analysis for a user's question.
pub fn synthesize(latest_user_text: &str) -> &'static str {
    let forms = haystacks(latest_user_text);
    let hit = |kw: &str| forms.iter().any(|form| form.contains(kw));
    TOPICS
        .iter()
        .find(|topic| {
            topic
                .any_of
                .iter()
                .any(|groups| groups.iter().all(|group| group.iter().any(|kw| hit(*kw))))
        })
        .map_or(DEFAULT_ANALYSIS, |topic| topic.analysis)
}

/// The content of the last user message, if any.
pub fn latest_user_text(messages: &[ConversationMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User && !m.is_error)
        .map(|m| m.content.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
