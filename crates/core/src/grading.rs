//! Quiz grading: per-question verdicts, score, and pass threshold.
//!
//! Grading runs against the answer key pre-loaded by the caller; nothing
//! here touches the database. A question is correct iff the selected
//! option-id set is exactly the set of options flagged correct — supersets
//! and subsets both fail.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Valid question type strings (stored in `questions.qtype`).
pub const QTYPE_SINGLE: &str = "single";
pub const QTYPE_MULTIPLE: &str = "multiple";

/// All valid question types.
pub const VALID_QTYPES: &[&str] = &[QTYPE_SINGLE, QTYPE_MULTIPLE];

/// How many options a student may select on a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Exactly one option; a new selection replaces the previous one.
    Single,
    /// A cumulative set of options, toggled individually.
    Multiple,
}

impl QuestionKind {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            QTYPE_SINGLE => Ok(Self::Single),
            QTYPE_MULTIPLE => Ok(Self::Multiple),
            _ => Err(format!(
                "Invalid question type '{s}'. Must be one of: {}",
                VALID_QTYPES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => QTYPE_SINGLE,
            Self::Multiple => QTYPE_MULTIPLE,
        }
    }
}

/// One question of the answer key, as loaded by the caller.
#[derive(Debug, Clone)]
pub struct KeyQuestion {
    pub question_id: DbId,
    /// Ids of the options flagged `is_correct`.
    pub correct_option_ids: Vec<DbId>,
}

/// The student's selected options for one question.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub question_id: DbId,
    pub selected_option_ids: Vec<DbId>,
}

/// Verdict for a single question.
#[derive(Debug, Clone, Serialize)]
pub struct GradedQuestion {
    pub question_id: DbId,
    pub selected_option_ids: Vec<DbId>,
    pub is_correct: bool,
    /// 1 if the whole question was judged correct, else 0.
    pub marks_obtained: i32,
}

/// Result of grading a full answer set against a quiz's answer key.
#[derive(Debug, Clone, Serialize)]
pub struct QuizGrade {
    pub questions: Vec<GradedQuestion>,
    /// Count of correctly answered questions.
    pub score: i32,
    /// Total question count.
    pub max_score: i32,
    /// `100 * score / max_score`; per-question mark weights are not
    /// factored in.
    pub percentage: f64,
}

/// Grade an answer set against the key.
///
/// Every key question receives a verdict; questions the student left
/// unanswered are graded with an empty selection (incorrect unless the
/// question has no correct option at all). Answers for unknown question
/// ids are ignored.
pub fn grade(key: &[KeyQuestion], answers: &[AnswerInput]) -> QuizGrade {
    let mut graded = Vec::with_capacity(key.len());
    let mut score = 0;

    for question in key {
        let selected: Vec<DbId> = answers
            .iter()
            .find(|a| a.question_id == question.question_id)
            .map(|a| a.selected_option_ids.clone())
            .unwrap_or_default();

        let selected_set: HashSet<DbId> = selected.iter().copied().collect();
        let correct_set: HashSet<DbId> =
            question.correct_option_ids.iter().copied().collect();

        let is_correct = selected_set == correct_set;
        if is_correct {
            score += 1;
        }

        graded.push(GradedQuestion {
            question_id: question.question_id,
            selected_option_ids: selected,
            is_correct,
            marks_obtained: if is_correct { 1 } else { 0 },
        });
    }

    let max_score = key.len() as i32;
    let percentage = if max_score == 0 {
        0.0
    } else {
        f64::from(score) * 100.0 / f64::from(max_score)
    };

    QuizGrade {
        questions: graded,
        score,
        max_score,
        percentage,
    }
}

/// An attempt passes iff its percentage meets or exceeds the quiz's
/// passing score. The boundary case counts as passed.
pub fn is_passing(percentage: f64, passing_score: i32) -> bool {
    percentage >= f64::from(passing_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_q(id: DbId, correct: &[DbId]) -> KeyQuestion {
        KeyQuestion {
            question_id: id,
            correct_option_ids: correct.to_vec(),
        }
    }

    fn answer(id: DbId, selected: &[DbId]) -> AnswerInput {
        AnswerInput {
            question_id: id,
            selected_option_ids: selected.to_vec(),
        }
    }

    #[test]
    fn test_exact_set_equality() {
        // Options: 1 (correct), 2 (correct), 3 (wrong).
        let key = vec![key_q(10, &[1, 2])];

        let subset = grade(&key, &[answer(10, &[1])]);
        assert!(!subset.questions[0].is_correct, "subset must fail");

        let exact = grade(&key, &[answer(10, &[2, 1])]);
        assert!(exact.questions[0].is_correct, "exact set must pass");

        let superset = grade(&key, &[answer(10, &[1, 2, 3])]);
        assert!(!superset.questions[0].is_correct, "superset must fail");
    }

    #[test]
    fn test_percentage_is_question_count_weighted() {
        let key = vec![key_q(1, &[11]), key_q(2, &[21]), key_q(3, &[31])];
        let answers = vec![answer(1, &[11]), answer(2, &[21]), answer(3, &[99])];

        let result = grade(&key, &answers);
        assert_eq!(result.score, 2);
        assert_eq!(result.max_score, 3);
        assert!((result.percentage - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_unanswered_question_is_incorrect() {
        let key = vec![key_q(1, &[11]), key_q(2, &[21])];
        let result = grade(&key, &[answer(1, &[11])]);

        assert_eq!(result.score, 1);
        assert_eq!(result.questions[1].question_id, 2);
        assert!(!result.questions[1].is_correct);
        assert!(result.questions[1].selected_option_ids.is_empty());
    }

    #[test]
    fn test_unknown_answer_ids_ignored() {
        let key = vec![key_q(1, &[11])];
        let result = grade(&key, &[answer(1, &[11]), answer(999, &[1])]);

        assert_eq!(result.questions.len(), 1);
        assert_eq!(result.score, 1);
    }

    #[test]
    fn test_empty_quiz_grades_zero() {
        let result = grade(&[], &[]);
        assert_eq!(result.max_score, 0);
        assert_eq!(result.percentage, 0.0);
    }

    #[test]
    fn test_pass_boundary_counts_as_passed() {
        assert!(is_passing(70.0, 70));
        assert!(is_passing(70.1, 70));
        assert!(!is_passing(69.9, 70));
    }

    #[test]
    fn test_marks_mirror_question_verdict() {
        let key = vec![key_q(1, &[11]), key_q(2, &[21])];
        let result = grade(&key, &[answer(1, &[11]), answer(2, &[22])]);

        assert_eq!(result.questions[0].marks_obtained, 1);
        assert_eq!(result.questions[1].marks_obtained, 0);
    }

    #[test]
    fn test_qtype_round_trip() {
        for s in VALID_QTYPES {
            assert_eq!(QuestionKind::from_str_value(s).unwrap().as_str(), *s);
        }
        assert!(QuestionKind::from_str_value("essay").is_err());
    }
}
