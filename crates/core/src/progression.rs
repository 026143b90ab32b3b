//! Step-gated course progression: lock and completion derivation.
//!
//! A step is one module paired with its single lesson and optional
//! published quiz. Lock state is derived, never persisted: the caller
//! pre-loads modules, lesson progress, and quiz outcomes, and this module
//! computes the same answer every time for the same inputs — the UI's
//! refresh strategy is "rebuild from scratch" after every write.

use serde::Serialize;

use crate::grading::is_passing;
use crate::types::{DbId, Timestamp};

/// A lesson's per-student completion state.
#[derive(Debug, Clone, Copy)]
pub struct LessonState {
    pub lesson_id: DbId,
    pub completed: bool,
}

/// A quiz's per-student pass state (derived from the latest attempt).
#[derive(Debug, Clone, Copy)]
pub struct QuizState {
    pub quiz_id: DbId,
    pub passed: bool,
}

/// One module's pre-loaded inputs, in course position order.
#[derive(Debug, Clone)]
pub struct StepSource {
    pub module_id: DbId,
    /// The module's single lesson, if any.
    pub lesson: Option<LessonState>,
    /// The module's published quiz, if any.
    pub quiz: Option<QuizState>,
}

/// Derived per-step state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepStatus {
    pub module_id: DbId,
    /// 1-based display number.
    pub step_number: i32,
    pub lesson_id: Option<DbId>,
    pub quiz_id: Option<DbId>,
    pub is_completed: bool,
    pub is_locked: bool,
}

/// Derive lock and completion state for an ordered list of steps.
///
/// Step 0 is never locked. Step `i > 0` is locked unless the previous
/// step's lesson is complete and, when the previous step has a quiz, that
/// quiz is passed. A previous step with no lesson gates nothing.
pub fn derive_steps(sources: &[StepSource]) -> Vec<StepStatus> {
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| {
            let is_locked = if index == 0 {
                false
            } else {
                let prev = &sources[index - 1];
                match prev.lesson {
                    Some(lesson) => {
                        let prev_completed = lesson.completed;
                        match prev.quiz {
                            Some(quiz) => !prev_completed || !quiz.passed,
                            None => !prev_completed,
                        }
                    }
                    None => false,
                }
            };

            StepStatus {
                module_id: source.module_id,
                step_number: (index + 1) as i32,
                lesson_id: source.lesson.map(|l| l.lesson_id),
                quiz_id: source.quiz.map(|q| q.quiz_id),
                is_completed: source.lesson.map(|l| l.completed).unwrap_or(false),
                is_locked,
            }
        })
        .collect()
}

/// Index of the first unlocked step, used as the initial active step.
pub fn first_unlocked(steps: &[StepStatus]) -> Option<usize> {
    steps.iter().position(|s| !s.is_locked)
}

/// A submitted attempt's fields relevant to the pass check.
#[derive(Debug, Clone, Copy)]
pub struct AttemptSnapshot {
    pub submitted_at: Timestamp,
    pub percentage: f64,
}

/// Whether the student's most recent submitted attempt passes the quiz.
///
/// The latest attempt by `submitted_at` governs; earlier attempts are
/// history only. No attempts means not passed.
pub fn quiz_passed(attempts: &[AttemptSnapshot], passing_score: i32) -> bool {
    attempts
        .iter()
        .max_by_key(|a| a.submitted_at)
        .map(|latest| is_passing(latest.percentage, passing_score))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn step(module_id: DbId, completed: Option<bool>, quiz_passed: Option<bool>) -> StepSource {
        StepSource {
            module_id,
            lesson: completed.map(|c| LessonState {
                lesson_id: module_id * 10,
                completed: c,
            }),
            quiz: quiz_passed.map(|p| QuizState {
                quiz_id: module_id * 100,
                passed: p,
            }),
        }
    }

    #[test]
    fn test_first_step_never_locked() {
        let steps = derive_steps(&[step(1, Some(false), Some(false))]);
        assert!(!steps[0].is_locked);
    }

    #[test]
    fn test_lock_follows_previous_lesson_without_quiz() {
        let sources = vec![step(1, Some(false), None), step(2, Some(false), None)];
        let steps = derive_steps(&sources);
        assert!(steps[1].is_locked);

        let sources = vec![step(1, Some(true), None), step(2, Some(false), None)];
        let steps = derive_steps(&sources);
        assert!(!steps[1].is_locked);
    }

    #[test]
    fn test_quiz_gate_requires_both_completion_and_pass() {
        // Lesson complete but quiz failed: still locked.
        let sources = vec![step(1, Some(true), Some(false)), step(2, Some(false), None)];
        assert!(derive_steps(&sources)[1].is_locked);

        // Quiz passed but lesson incomplete: still locked.
        let sources = vec![step(1, Some(false), Some(true)), step(2, Some(false), None)];
        assert!(derive_steps(&sources)[1].is_locked);

        // Both: unlocked.
        let sources = vec![step(1, Some(true), Some(true)), step(2, Some(false), None)];
        assert!(!derive_steps(&sources)[1].is_locked);
    }

    #[test]
    fn test_previous_step_without_lesson_gates_nothing() {
        let sources = vec![step(1, None, None), step(2, Some(false), None)];
        assert!(!derive_steps(&sources)[1].is_locked);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let sources = vec![
            step(1, Some(true), Some(true)),
            step(2, Some(true), None),
            step(3, Some(false), Some(false)),
            step(4, Some(false), None),
        ];
        let first = derive_steps(&sources);
        let second = derive_steps(&sources);
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_unlocked() {
        assert_eq!(first_unlocked(&[]), None);

        let sources = vec![
            step(1, Some(true), None),
            step(2, Some(false), None),
            step(3, Some(false), None),
        ];
        let steps = derive_steps(&sources);
        // Step 0 is never locked, so a nonempty course always starts there.
        assert_eq!(first_unlocked(&steps), Some(0));
        assert!(!steps[1].is_locked, "previous step is complete");
        assert!(steps[2].is_locked);
    }

    fn attempt(secs: i64, percentage: f64) -> AttemptSnapshot {
        AttemptSnapshot {
            submitted_at: Utc.timestamp_opt(secs, 0).unwrap(),
            percentage,
        }
    }

    #[test]
    fn test_no_attempts_is_not_passed() {
        assert!(!quiz_passed(&[], 70));
    }

    #[test]
    fn test_latest_attempt_governs() {
        // Failed first, passed on retry: passed.
        let attempts = vec![attempt(100, 0.0), attempt(200, 100.0)];
        assert!(quiz_passed(&attempts, 70));

        // Passed first, failed later: the newer attempt governs.
        let attempts = vec![attempt(100, 100.0), attempt(200, 0.0)];
        assert!(!quiz_passed(&attempts, 70));
    }

    #[test]
    fn test_pass_boundary() {
        let attempts = vec![attempt(100, 70.0)];
        assert!(quiz_passed(&attempts, 70));
    }
}
