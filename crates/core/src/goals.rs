//! Skill goal tracking: linear days-to-target projection.
//!
//! A projection uses two historical progress samples to derive a rate in
//! percentage points per day, then extrapolates how long the learner needs
//! to reach the goal's target.

use chrono::Duration;
use serde::Serialize;

use crate::error::CoreError;
use crate::skills::{clamp_progress, MAX_PROGRESS};
use crate::types::Timestamp;

/// How far back the projection looks for its earlier sample.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// Projections further out than this are reported as stalled.
pub const MAX_PROJECTION_DAYS: f64 = 36_500.0;

const SECS_PER_DAY: f64 = 86_400.0;

/// A recorded progress value at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub recorded_at: Timestamp,
    pub progress: f64,
}

/// Outcome of projecting a goal forward.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalProjection {
    /// Current progress already meets the target.
    Reached,
    /// Fewer than two usable samples.
    InsufficientData,
    /// Progress is flat or declining.
    #[serde(rename_all = "camelCase")]
    Stalled { rate_per_day: f64 },
    /// Progress is rising; the target is expected in `days_remaining` days.
    #[serde(rename_all = "camelCase")]
    OnTrack {
        rate_per_day: f64,
        days_remaining: i64,
        projected_date: Timestamp,
    },
}

/// Whether a projection meets the goal's deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    NoDeadline,
    OnTrack,
    Behind,
}

/// Validate a goal target. Targets must be in `(0, 100]`.
pub fn validate_target(target: f64) -> Result<f64, CoreError> {
    if !target.is_finite() || target <= 0.0 || target > MAX_PROGRESS {
        return Err(CoreError::Validation(format!(
            "target must be greater than 0 and at most {MAX_PROGRESS}, got {target}"
        )));
    }
    Ok(target)
}

/// Pick the two samples a projection should use from `history`.
///
/// `history` must be sorted by `recorded_at` ascending. The later sample is
/// always the most recent one; the earlier sample is the oldest one inside the
/// lookback window, or the one immediately before the latest when the window
/// holds only a single sample.
pub fn pick_samples(history: &[Sample], now: Timestamp, lookback_days: i64) -> Option<(Sample, Sample)> {
    let (&latest, rest) = history.split_last()?;
    let window_start = now - Duration::days(lookback_days);

    let earlier = rest
        .iter()
        .find(|s| s.recorded_at >= window_start)
        .or_else(|| rest.last())?;

    Some((*earlier, latest))
}

/// Project when `target` will be reached from `current` progress.
///
/// A rate so slow that the target lies beyond [`MAX_PROJECTION_DAYS`] is
/// treated as stalled.
pub fn project(samples: Option<(Sample, Sample)>, current: f64, target: f64) -> GoalProjection {
    let current = clamp_progress(current);
    if current >= target {
        return GoalProjection::Reached;
    }

    let Some((earlier, later)) = samples else {
        return GoalProjection::InsufficientData;
    };

    let elapsed_secs = (later.recorded_at - earlier.recorded_at).num_seconds();
    if elapsed_secs <= 0 {
        return GoalProjection::InsufficientData;
    }

    let elapsed_days = elapsed_secs as f64 / SECS_PER_DAY;
    let rate_per_day = (later.progress - earlier.progress) / elapsed_days;
    if rate_per_day <= 0.0 {
        return GoalProjection::Stalled { rate_per_day };
    }

    let days = ((target - current) / rate_per_day).ceil();
    if !days.is_finite() || days > MAX_PROJECTION_DAYS {
        return GoalProjection::Stalled { rate_per_day };
    }

    let days_remaining = days as i64;
    let projected_date = Duration::try_days(days_remaining)
        .and_then(|delta| later.recorded_at.checked_add_signed(delta));
    match projected_date {
        Some(projected_date) => GoalProjection::OnTrack {
            rate_per_day,
            days_remaining,
            projected_date,
        },
        None => GoalProjection::Stalled { rate_per_day },
    }
}

/// Compare a projection against an optional deadline.
pub fn deadline_status(projection: &GoalProjection, deadline: Option<Timestamp>) -> DeadlineStatus {
    let Some(deadline) = deadline else {
        return DeadlineStatus::NoDeadline;
    };
    match projection {
        GoalProjection::Reached => DeadlineStatus::OnTrack,
        GoalProjection::OnTrack { projected_date, .. } if *projected_date <= deadline => {
            DeadlineStatus::OnTrack
        }
        _ => DeadlineStatus::Behind,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    fn sample(day: u32, progress: f64) -> Sample {
        Sample {
            recorded_at: at(day),
            progress,
        }
    }

    #[test]
    fn reached_when_current_meets_target() {
        assert_eq!(project(None, 80.0, 80.0), GoalProjection::Reached);
    }

    #[test]
    fn insufficient_without_two_samples() {
        assert_eq!(project(None, 10.0, 80.0), GoalProjection::InsufficientData);
    }

    #[test]
    fn insufficient_when_samples_share_timestamp() {
        let s = sample(1, 10.0);
        assert_eq!(project(Some((s, s)), 10.0, 80.0), GoalProjection::InsufficientData);
    }

    #[test]
    fn stalled_when_rate_is_not_positive() {
        let result = project(Some((sample(1, 50.0), sample(5, 40.0))), 40.0, 80.0);
        assert_matches!(result, GoalProjection::Stalled { rate_per_day } if rate_per_day < 0.0);
    }

    #[test]
    fn days_remaining_rounds_up() {
        // 10 points over 4 days = 2.5/day; 45 points left -> 18 days.
        let result = project(Some((sample(1, 20.0), sample(5, 30.0))), 35.0, 80.0);
        assert_matches!(
            result,
            GoalProjection::OnTrack { days_remaining: 18, projected_date, .. }
                if projected_date == at(23)
        );
    }

    #[test]
    fn near_zero_rate_is_stalled() {
        let result = project(Some((sample(1, 10.0), sample(2, 10.000_000_1))), 10.000_000_1, 80.0);
        assert_matches!(result, GoalProjection::Stalled { rate_per_day } if rate_per_day > 0.0);
    }

    #[test]
    fn slow_but_finite_rate_is_on_track() {
        // 5 points over 100 days = 0.05/day; 3 points left -> 60 days.
        let earlier = Sample {
            recorded_at: at(1) - Duration::days(100),
            progress: 5.0,
        };
        let result = project(Some((earlier, sample(1, 10.0))), 10.0, 13.0);
        assert_matches!(
            result,
            GoalProjection::OnTrack { days_remaining: 60, projected_date, .. }
                if projected_date == at(1) + Duration::days(60)
        );
    }

    #[test]
    fn pick_samples_uses_oldest_in_window() {
        let history = [sample(1, 5.0), sample(10, 20.0), sample(20, 40.0)];
        let (earlier, later) = pick_samples(&history, at(20), 15).unwrap();
        assert_eq!(earlier, history[1]);
        assert_eq!(later, history[2]);
    }

    #[test]
    fn pick_samples_falls_back_to_previous_sample() {
        let history = [sample(1, 5.0), sample(20, 40.0)];
        let (earlier, later) = pick_samples(&history, at(20), 5).unwrap();
        assert_eq!(earlier, history[0]);
        assert_eq!(later, history[1]);
    }

    #[test]
    fn pick_samples_needs_two_points() {
        assert!(pick_samples(&[sample(1, 5.0)], at(2), 30).is_none());
        assert!(pick_samples(&[], at(2), 30).is_none());
    }

    #[test]
    fn deadline_comparison() {
        let on_track = GoalProjection::OnTrack {
            rate_per_day: 1.0,
            days_remaining: 3,
            projected_date: at(10),
        };
        assert_eq!(deadline_status(&on_track, None), DeadlineStatus::NoDeadline);
        assert_eq!(deadline_status(&on_track, Some(at(12))), DeadlineStatus::OnTrack);
        assert_eq!(deadline_status(&on_track, Some(at(8))), DeadlineStatus::Behind);
        assert_eq!(
            deadline_status(&GoalProjection::Stalled { rate_per_day: 0.0 }, Some(at(8))),
            DeadlineStatus::Behind
        );
        assert_eq!(deadline_status(&GoalProjection::Reached, Some(at(1))), DeadlineStatus::OnTrack);
    }

    #[test]
    fn target_validation() {
        assert!(validate_target(50.0).is_ok());
        assert!(validate_target(100.0).is_ok());
        assert!(validate_target(0.0).is_err());
        assert!(validate_target(101.0).is_err());
    }
}
