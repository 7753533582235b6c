//! Deterministic course recommendations from a learner's skill gaps.
//!
//! A course scores higher the weaker the learner is in the skills it teaches,
//! scaled by how well the course level fits the learner's overall stage.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::skills::{clamp_progress, MAX_PROGRESS};
use crate::types::DbId;

/// Gap assumed for courses that declare no skill tags.
const UNTAGGED_GAP: f64 = 0.25;

const SAME_LEVEL_FIT: f64 = 1.0;
const ADJACENT_LEVEL_FIT: f64 = 0.75;
const DISTANT_LEVEL_FIT: f64 = 0.5;

/// Average progress below which a learner is a beginner.
const INTERMEDIATE_FROM: f64 = 34.0;
/// Average progress below which a learner is intermediate.
const ADVANCED_FROM: f64 = 67.0;

/// Difficulty of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(CoreError::Validation(format!(
                "unknown course level '{other}' (expected beginner, intermediate or advanced)"
            ))),
        }
    }

    /// The stage a learner with the given average progress is at.
    pub fn for_average_progress(average: f64) -> Self {
        if average < INTERMEDIATE_FROM {
            Self::Beginner
        } else if average < ADVANCED_FROM {
            Self::Intermediate
        } else {
            Self::Advanced
        }
    }

    fn rank(self) -> i32 {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
        }
    }

    fn fit(self, learner: Self) -> f64 {
        match (self.rank() - learner.rank()).abs() {
            0 => SAME_LEVEL_FIT,
            1 => ADJACENT_LEVEL_FIT,
            _ => DISTANT_LEVEL_FIT,
        }
    }
}

/// What the ranker needs to know about a course.
#[derive(Debug, Clone)]
pub struct CourseProfile {
    pub course_id: DbId,
    pub title: String,
    pub level: CourseLevel,
    pub skill_tags: Vec<String>,
}

/// A ranked course with the reasons it was chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub course_id: DbId,
    pub title: String,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Rank `courses` for a learner.
///
/// `progress` maps skill name to percentage; unknown skills count as 0.
/// Courses in `completed` are skipped, as are courses with a zero score.
pub fn rank(
    courses: &[CourseProfile],
    progress: &HashMap<String, f64>,
    completed: &HashSet<DbId>,
    limit: usize,
) -> Vec<Recommendation> {
    let average = if progress.is_empty() {
        0.0
    } else {
        progress.values().map(|p| clamp_progress(*p)).sum::<f64>() / progress.len() as f64
    };
    let stage = CourseLevel::for_average_progress(average);

    let mut ranked: Vec<Recommendation> = courses
        .iter()
        .filter(|c| !completed.contains(&c.course_id))
        .filter_map(|course| score_course(course, progress, stage))
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.course_id.cmp(&b.course_id))
    });
    ranked.truncate(limit);
    ranked
}

fn score_course(
    course: &CourseProfile,
    progress: &HashMap<String, f64>,
    stage: CourseLevel,
) -> Option<Recommendation> {
    let mut reasons = Vec::new();

    let gap = if course.skill_tags.is_empty() {
        UNTAGGED_GAP
    } else {
        let gaps: Vec<(&str, f64)> = course
            .skill_tags
            .iter()
            .map(|tag| {
                let p = clamp_progress(progress.get(tag).copied().unwrap_or(0.0));
                (tag.as_str(), (MAX_PROGRESS - p) / MAX_PROGRESS)
            })
            .collect();

        if let Some((weakest, weakest_gap)) = gaps
            .iter()
            .copied()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(b.0.cmp(a.0)))
        {
            if weakest_gap > 0.0 {
                reasons.push(format!(
                    "Builds {weakest}, where you are at {:.0}%",
                    MAX_PROGRESS * (1.0 - weakest_gap)
                ));
            }
        }

        gaps.iter().map(|(_, g)| g).sum::<f64>() / gaps.len() as f64
    };

    let fit = course.level.fit(stage);
    if course.level == stage {
        reasons.push(format!("Matches your {} level", stage.as_str()));
    }

    let score = gap * fit;
    if score <= 0.0 {
        return None;
    }

    Some(Recommendation {
        course_id: course.course_id,
        title: course.title.clone(),
        score,
        reasons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: DbId, level: CourseLevel, tags: &[&str]) -> CourseProfile {
        CourseProfile {
            course_id: id,
            title: format!("Course {id}"),
            level,
            skill_tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn progress(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn weaker_skills_rank_first() {
        let courses = [
            course(1, CourseLevel::Beginner, &["python"]),
            course(2, CourseLevel::Beginner, &["ethics"]),
        ];
        let ranked = rank(
            &courses,
            &progress(&[("python", 30.0), ("ethics", 0.0)]),
            &HashSet::new(),
            10,
        );
        assert_eq!(ranked[0].course_id, 2);
        assert_eq!(ranked[1].course_id, 1);
        assert!(ranked[0].reasons[0].contains("ethics"));
    }

    #[test]
    fn mastered_course_is_dropped() {
        let courses = [course(1, CourseLevel::Advanced, &["python"])];
        let ranked = rank(&courses, &progress(&[("python", 100.0)]), &HashSet::new(), 10);
        assert!(ranked.is_empty());
    }

    #[test]
    fn completed_courses_are_excluded() {
        let courses = [course(1, CourseLevel::Beginner, &["python"])];
        let completed: HashSet<DbId> = [1].into_iter().collect();
        assert!(rank(&courses, &HashMap::new(), &completed, 10).is_empty());
    }

    #[test]
    fn level_fit_breaks_equal_gaps() {
        // A brand-new learner is a beginner, so the beginner course wins.
        let courses = [
            course(1, CourseLevel::Advanced, &["ml"]),
            course(2, CourseLevel::Beginner, &["ml"]),
            course(3, CourseLevel::Intermediate, &["ml"]),
        ];
        let ranked = rank(&courses, &HashMap::new(), &HashSet::new(), 10);
        let ids: Vec<DbId> = ranked.iter().map(|r| r.course_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn ties_sort_by_course_id_and_limit_applies() {
        let courses = [
            course(5, CourseLevel::Beginner, &[]),
            course(3, CourseLevel::Beginner, &[]),
            course(4, CourseLevel::Beginner, &[]),
        ];
        let ranked = rank(&courses, &HashMap::new(), &HashSet::new(), 2);
        let ids: Vec<DbId> = ranked.iter().map(|r| r.course_id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn learner_stage_from_average() {
        assert_eq!(CourseLevel::for_average_progress(0.0), CourseLevel::Beginner);
        assert_eq!(CourseLevel::for_average_progress(50.0), CourseLevel::Intermediate);
        assert_eq!(CourseLevel::for_average_progress(90.0), CourseLevel::Advanced);
    }

    #[test]
    fn level_parsing() {
        assert_eq!(CourseLevel::parse("advanced").unwrap(), CourseLevel::Advanced);
        assert!(CourseLevel::parse("expert").is_err());
    }
}
