use crate::domain::error::DomainError;
use crate::domain::models::Mood;
use anyhow::Result;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

pub const OPENINGS: [&str; 4] = [
    "Today carries a quiet undercurrent.",
    "There's a subtle shift in the air.",
    "Something within you feels different.",
    "The day unfolds with a gentle tone.",
];

pub const CLOSINGS: [&str; 4] = [
    "Choose one meaningful step.",
    "Let the small act matter.",
    "Trust the rhythm you're in.",
    "Begin without waiting for perfect conditions.",
];

/// Lines for `mood`; empty when the label is not a known mood.
pub fn mood_lines(mood: &str) -> &'static [&'static str] {
    match Mood::from_label(mood) {
        Some(Mood::Calm) => &[
            "Stillness becomes your advantage.",
            "Peace is not passive, it is powerful.",
            "Let silence sharpen your awareness.",
        ],
        Some(Mood::Focused) => &[
            "Clarity is your compass.",
            "Your attention feels deliberate and sharp.",
            "Depth comes easily when you let it.",
        ],
        Some(Mood::Tired) => &[
            "Softness is not weakness.",
            "Rest is part of progress.",
            "Move slowly, but move kindly.",
        ],
        Some(Mood::Motivated) => &[
            "Momentum hums beneath your skin.",
            "Energy gathers around intention.",
            "This is a day for beginning.",
        ],
        None => &[],
    }
}

fn pick(rng: &mut fastrand::Rng, pool: &[&'static str]) -> &'static str {
    if pool.is_empty() {
        return "";
    }
    pool[rng.usize(..pool.len())]
}

/// Opening, mood line and closing joined by newlines.
pub fn compose(mood: &str, rng: &mut fastrand::Rng) -> String {
    let opening = pick(rng, &OPENINGS);
    let middle = pick(rng, mood_lines(mood));
    let closing = pick(rng, &CLOSINGS);
    format!("{}\n{}\n{}", opening, middle, closing).trim().to_string()
}

pub struct ReflectionGenerator {
    rng: Mutex<fastrand::Rng>,
}

impl ReflectionGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    #[instrument(skip(self))]
    pub fn generate(&self, mood: &str) -> Result<String> {
        if Mood::from_label(mood).is_none() {
            warn!("Unrecognized mood, mood line left empty");
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| DomainError::Internal("reflection rng lock poisoned".to_string()))?;
        let reflection = compose(mood, &mut rng);
        debug!(lines = reflection.lines().count(), "Reflection composed");
        Ok(reflection)
    }
}

impl Default for ReflectionGenerator {
    fn default() -> Self {
        Self::new()
    }
}
