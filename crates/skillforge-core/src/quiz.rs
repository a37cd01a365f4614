//! Quiz grading.
//!
//! Grades a set of answers against a quiz's answer key. Like the rest of
//! the engine, this is a pure computation; quiz content and answer storage
//! live with the catalog collaborators.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Score percentage required to pass a quiz.
pub const QUIZ_PASS_THRESHOLD: u32 = 75;

/// One question with its expected answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    /// The accepted answer. Comparison ignores case and surrounding
    /// whitespace.
    pub answer: String,
}

/// The outcome of one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    /// What the learner answered, if anything.
    #[serde(default)]
    pub answer: Option<String>,
    pub correct: bool,
}

/// The graded result of one quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAssessment {
    pub quiz_id: String,
    pub user_id: String,
    pub correct: u32,
    pub total: u32,
    /// Integer percentage score.
    pub score: u32,
    pub passed: bool,
    pub outcomes: Vec<QuestionOutcome>,
}

fn answers_match(expected: &str, given: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(given.trim())
}

/// Grade a quiz attempt against its answer key.
///
/// Unanswered questions count as incorrect. A quiz with no questions
/// scores 0 and does not pass.
pub fn grade_quiz(
    quiz_id: &str,
    user_id: &str,
    questions: &[QuizQuestion],
    answers: &HashMap<String, String>,
) -> QuizAssessment {
    let mut outcomes = Vec::with_capacity(questions.len());
    let mut correct = 0u32;

    for question in questions {
        let given = answers.get(&question.id);
        let is_correct = given.is_some_and(|a| answers_match(&question.answer, a));
        if is_correct {
            correct += 1;
        }
        outcomes.push(QuestionOutcome {
            question_id: question.id.clone(),
            answer: given.cloned(),
            correct: is_correct,
        });
    }

    let total = questions.len() as u32;
    let score = if total == 0 { 0 } else { correct * 100 / total };

    QuizAssessment {
        quiz_id: quiz_id.to_string(),
        user_id: user_id.to_string(),
        correct,
        total,
        score,
        passed: total > 0 && score >= QUIZ_PASS_THRESHOLD,
        outcomes,
    }
}
