//! Quiz and assignment scoring.
//!
//! Each question stores the index of its correct option and a point value.
//! A submission is a list of selected option indices, one per question in
//! question order; `None` means the learner skipped the question.

use serde::Serialize;

use crate::error::CoreError;

/// Minimum percentage required to pass a quiz.
pub const PASS_PERCENT: f64 = 70.0;

/// Upper bound on options per question.
pub const MAX_OPTIONS: usize = 10;

/// Upper bound on the points a single question is worth.
pub const MAX_POINTS: u32 = 1000;

/// The scoring-relevant view of a stored question.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredQuestion {
    pub question_id: i64,
    pub option_count: usize,
    pub correct_index: usize,
    pub points: u32,
}

/// Per-question outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: i64,
    pub selected_index: Option<usize>,
    pub correct: bool,
    /// The selected index does not refer to an existing option.
    pub invalid: bool,
    pub points_awarded: u32,
}

/// Aggregate score for a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub earned_points: u32,
    pub possible_points: u32,
    pub percent: f64,
    pub correct_count: usize,
    pub passed: bool,
    pub results: Vec<QuestionResult>,
}

/// Score `answers` against `questions`.
///
/// Missing and out-of-range answers score zero. Supplying more answers than
/// there are questions is rejected, as is a quiz whose point total does not
/// fit in a `u32`.
pub fn score(questions: &[ScoredQuestion], answers: &[Option<usize>]) -> Result<QuizScore, CoreError> {
    if answers.len() > questions.len() {
        return Err(CoreError::Validation(format!(
            "received {} answers for {} questions",
            answers.len(),
            questions.len()
        )));
    }

    let results: Vec<QuestionResult> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let selected = answers.get(i).copied().flatten();
            let invalid = selected.is_some_and(|s| s >= q.option_count);
            let correct = !invalid && selected == Some(q.correct_index);
            QuestionResult {
                question_id: q.question_id,
                selected_index: selected,
                correct,
                invalid,
                points_awarded: if correct { q.points } else { 0 },
            }
        })
        .collect();

    let possible_points = total_points(questions.iter().map(|q| q.points))?;
    let earned_points = total_points(results.iter().map(|r| r.points_awarded))?;
    let percent = if possible_points == 0 {
        0.0
    } else {
        f64::from(earned_points) * 100.0 / f64::from(possible_points)
    };

    Ok(QuizScore {
        earned_points,
        possible_points,
        percent,
        correct_count: results.iter().filter(|r| r.correct).count(),
        passed: possible_points > 0 && percent >= PASS_PERCENT,
        results,
    })
}

fn total_points(mut points: impl Iterator<Item = u32>) -> Result<u32, CoreError> {
    points
        .try_fold(0u32, u32::checked_add)
        .ok_or_else(|| CoreError::Validation("quiz point total is too large".into()))
}

/// Validate a question definition before it is stored.
pub fn validate_question(options: &[String], correct_index: usize, points: u32) -> Result<(), CoreError> {
    if options.len() < 2 || options.len() > MAX_OPTIONS {
        return Err(CoreError::Validation(format!(
            "a question needs between 2 and {MAX_OPTIONS} options"
        )));
    }
    if options.iter().any(|o| o.trim().is_empty()) {
        return Err(CoreError::Validation("options must not be blank".into()));
    }
    if correct_index >= options.len() {
        return Err(CoreError::Validation(format!(
            "correct_index {correct_index} is out of range for {} options",
            options.len()
        )));
    }
    if points == 0 || points > MAX_POINTS {
        return Err(CoreError::Validation(format!(
            "points must be between 1 and {MAX_POINTS}"
        )));
    }
    Ok(())
}
