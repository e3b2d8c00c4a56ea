//! Lightweight reading of agent replies for display hints.

use regex::Regex;
use std::sync::OnceLock;

/// Weather mentioned in a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCondition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Windy,
    Stormy,
    Foggy,
    Hot,
    Cold,
    PartlyCloudy,
}

impl ReplyCondition {
    pub fn label(&self) -> &'static str {
        match self {
            ReplyCondition::Sunny => "Sunny",
            ReplyCondition::Cloudy => "Cloudy",
            ReplyCondition::Rainy => "Rainy",
            ReplyCondition::Snowy => "Snowy",
            ReplyCondition::Windy => "Windy",
            ReplyCondition::Stormy => "Stormy",
            ReplyCondition::Foggy => "Foggy",
            ReplyCondition::Hot => "Hot",
            ReplyCondition::Cold => "Cold",
            ReplyCondition::PartlyCloudy => "Partly Cloudy",
        }
    }
}

// Checked in order; first hit wins.
const KEYWORDS: &[(ReplyCondition, &[&str])] = &[
    (ReplyCondition::Sunny, &["sunny", "clear", "bright", "sunshine"]),
    (ReplyCondition::Cloudy, &["cloudy", "overcast", "clouds"]),
    (ReplyCondition::Rainy, &["rain", "drizzle", "shower", "wet"]),
    (ReplyCondition::Snowy, &["snow", "blizzard", "flurries"]),
    (ReplyCondition::Windy, &["windy", "breezy", "gusty"]),
    (ReplyCondition::Stormy, &["storm", "thunder", "lightning"]),
    (ReplyCondition::Foggy, &["fog", "mist", "hazy"]),
    (ReplyCondition::Hot, &["hot", "scorching", "blazing"]),
    (ReplyCondition::Cold, &["cold", "freezing", "chilly", "frost"]),
    (
        ReplyCondition::PartlyCloudy,
        &["partly cloudy", "partially cloudy", "mixed"],
    ),
];

pub fn detect_condition(text: &str) -> Option<ReplyCondition> {
    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(condition, _)| *condition)
}

pub fn has_temperature(text: &str) -> bool {
    text.contains('°') || text.contains("degrees") || text.contains("temperature")
}

/// Readings such as `21°`, `18.5 °C` or `70°F`, in order of appearance.
pub fn extract_temperatures(text: &str) -> Vec<&str> {
    static TEMPERATURE_RE: OnceLock<Regex> = OnceLock::new();
    // ASCII digits and ASCII whitespace only.
    let re = TEMPERATURE_RE.get_or_init(|| {
        Regex::new(r"[0-9]+(?:\.[0-9]+)?[ \t\n\x0B\x0C\r]*°[CF]?")
            .expect("temperature pattern is valid")
    });

    re.find_iter(text).map(|m| m.as_str()).collect()
}
