use chrono::{DateTime, Local};
use std::fmt::Write;

use weather_agent_core::chat::{ChatMessage, detect_condition, extract_temperatures};
use weather_agent_core::weather::TemperatureBand;
use weather_agent_core::{AsyncState, WeatherSnapshot};

pub fn weather(state: &AsyncState<WeatherSnapshot>, hours: usize) -> String {
    match state {
        AsyncState::Idle => "No forecast loaded yet.".to_string(),
        AsyncState::Loading => "Loading forecast...".to_string(),
        AsyncState::Failure(message) => format!("Error: {message}"),
        AsyncState::Success(snapshot) => snapshot_view(snapshot, hours),
    }
}

fn snapshot_view(snapshot: &WeatherSnapshot, hours: usize) -> String {
    let current = snapshot.current_temperature();
    let mut out = format!(
        "Now: {current:.1}°C ({})\n",
        TemperatureBand::classify(current)
    );

    if let (Some(range), Some(avg)) = (snapshot.range(), snapshot.average()) {
        let _ = writeln!(
            out,
            "High {:.0}° / Low {:.0}° / Avg {:.0}°",
            range.max, range.min, avg
        );
    }

    let window = snapshot.upcoming(hours);
    if !window.is_empty() {
        out.push('\n');
    }
    for point in window {
        let _ = writeln!(
            out,
            "{}  {:>6.1}°C",
            point.time.format("%a %d %b %H:%M"),
            point.temperature
        );
    }
    out
}

pub fn message(msg: &ChatMessage) -> String {
    let when = DateTime::from_timestamp_millis(msg.timestamp)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default();

    if msg.is_from_user {
        return format!("[{when}] You: {}", msg.content);
    }

    let mut line = format!("[{when}] Agent");
    if let Some(condition) = detect_condition(&msg.content) {
        let _ = write!(line, " ({})", condition.label());
    }
    let _ = write!(line, ": {}", msg.content);

    let readings = extract_temperatures(&msg.content);
    if !readings.is_empty() {
        let _ = write!(line, "\n    temperatures: {}", readings.join(", "));
    }
    line
}
