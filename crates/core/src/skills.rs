//! Skills DNA arithmetic: progress clamping, level thresholds, and summaries.
//!
//! Progress is a percentage in `[0, 100]` per named skill. Every write path
//! funnels through [`apply_gain`] or [`validate_progress`] so stored values
//! never leave that range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest valid progress value.
pub const MIN_PROGRESS: f64 = 0.0;
/// Highest valid progress value.
pub const MAX_PROGRESS: f64 = 100.0;

/// Maximum length of a skill name.
pub const MAX_SKILL_NAME_LEN: usize = 64;

/// Names taken by static segments under `/api/skills`.
pub const RESERVED_SKILL_NAMES: &[&str] = &["goals"];

/// Progress thresholds at which each level begins (awareness starts at 0).
const KNOWLEDGE_THRESHOLD: f64 = 20.0;
const APPLICATION_THRESHOLD: f64 = 40.0;
const MASTERY_THRESHOLD: f64 = 60.0;
const EXPERTISE_THRESHOLD: f64 = 80.0;

// ---------------------------------------------------------------------------
// SkillLevel
// ---------------------------------------------------------------------------

/// Competency stage derived from a progress percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Awareness,
    Knowledge,
    Application,
    Mastery,
    Expertise,
}

impl SkillLevel {
    /// All levels in ascending order.
    pub const ALL: [SkillLevel; 5] = [
        Self::Awareness,
        Self::Knowledge,
        Self::Application,
        Self::Mastery,
        Self::Expertise,
    ];

    /// Derive the level for a progress value. Out-of-range input is clamped first.
    pub fn from_progress(progress: f64) -> Self {
        let p = clamp_progress(progress);
        if p >= EXPERTISE_THRESHOLD {
            Self::Expertise
        } else if p >= MASTERY_THRESHOLD {
            Self::Mastery
        } else if p >= APPLICATION_THRESHOLD {
            Self::Application
        } else if p >= KNOWLEDGE_THRESHOLD {
            Self::Knowledge
        } else {
            Self::Awareness
        }
    }

    /// Lowercase name as stored in `skill_progress.current_level`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Awareness => "awareness",
            Self::Knowledge => "knowledge",
            Self::Application => "application",
            Self::Mastery => "mastery",
            Self::Expertise => "expertise",
        }
    }

    /// Parse a stored level name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == s)
    }
}

// ---------------------------------------------------------------------------
// Progress arithmetic
// ---------------------------------------------------------------------------

/// Clamp a progress value into `[0, 100]`. NaN and infinities map to 0.
pub fn clamp_progress(progress: f64) -> f64 {
    if !progress.is_finite() {
        return MIN_PROGRESS;
    }
    progress.clamp(MIN_PROGRESS, MAX_PROGRESS)
}

/// Add `gain` percentage points (may be negative) to `current`, clamped.
pub fn apply_gain(current: f64, gain: f64) -> f64 {
    if !gain.is_finite() {
        return clamp_progress(current);
    }
    clamp_progress(current + gain)
}

/// Validate an explicitly supplied progress value.
pub fn validate_progress(progress: f64) -> Result<f64, CoreError> {
    if !progress.is_finite() || !(MIN_PROGRESS..=MAX_PROGRESS).contains(&progress) {
        return Err(CoreError::Validation(format!(
            "progress must be between {MIN_PROGRESS} and {MAX_PROGRESS}, got {progress}"
        )));
    }
    Ok(progress)
}

/// Validate a gain delta. Deltas larger than the whole scale are rejected.
pub fn validate_delta(delta: f64) -> Result<f64, CoreError> {
    if !delta.is_finite() || delta.abs() > MAX_PROGRESS {
        return Err(CoreError::Validation(format!(
            "delta must be between -{MAX_PROGRESS} and {MAX_PROGRESS}, got {delta}"
        )));
    }
    Ok(delta)
}

// ---------------------------------------------------------------------------
// Skill names
// ---------------------------------------------------------------------------

/// Normalize and validate a skill name (trimmed, lowercased).
///
/// Accepts 1..=64 ASCII alphanumerics, `-`, or `_`, except the
/// [`RESERVED_SKILL_NAMES`].
pub fn normalize_skill_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim().to_ascii_lowercase();
    if name.is_empty() || name.len() > MAX_SKILL_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "skill name must be 1 to {MAX_SKILL_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::Validation(format!(
            "skill name '{name}' may only contain letters, digits, '-' and '_'"
        )));
    }
    if RESERVED_SKILL_NAMES.contains(&name.as_str()) {
        return Err(CoreError::Validation(format!("skill name '{name}' is reserved")));
    }
    Ok(name)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregate view of a learner's Skills DNA.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DnaSummary {
    pub skill_count: usize,
    pub average: f64,
    pub strongest: Option<String>,
    pub weakest: Option<String>,
    pub level: SkillLevel,
    pub level_counts: BTreeMap<SkillLevel, usize>,
}

/// Summarize `(skill_name, progress)` pairs.
///
/// Ties for strongest/weakest resolve to the alphabetically first name.
pub fn summarize<'a, I>(skills: I) -> DnaSummary
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut items: Vec<(&str, f64)> = skills
        .into_iter()
        .map(|(name, p)| (name, clamp_progress(p)))
        .collect();
    items.sort_by(|a, b| a.0.cmp(b.0));

    let mut level_counts: BTreeMap<SkillLevel, usize> =
        SkillLevel::ALL.into_iter().map(|l| (l, 0)).collect();
    for (_, p) in &items {
        *level_counts.entry(SkillLevel::from_progress(*p)).or_default() += 1;
    }

    let average = if items.is_empty() {
        0.0
    } else {
        items.iter().map(|(_, p)| p).sum::<f64>() / items.len() as f64
    };

    let mut strongest: Option<(&str, f64)> = None;
    let mut weakest: Option<(&str, f64)> = None;
    for &(name, p) in &items {
        if strongest.map_or(true, |(_, best)| p > best) {
            strongest = Some((name, p));
        }
        if weakest.map_or(true, |(_, worst)| p < worst) {
            weakest = Some((name, p));
        }
    }

    DnaSummary {
        skill_count: items.len(),
        average,
        strongest: strongest.map(|(n, _)| n.to_string()),
        weakest: weakest.map(|(n, _)| n.to_string()),
        level: SkillLevel::from_progress(average),
        level_counts,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
