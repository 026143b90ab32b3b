//! Repository for the `quizzes`, `questions`, and `options` tables.

use std::collections::HashMap;

use sqlx::PgPool;
use stepwise_core::types::DbId;

use crate::models::question::{
    AnswerOption, Question, QuestionInput, QuestionWithOptions,
};
use crate::models::quiz::{CreateQuiz, Quiz, UpdateQuiz};

/// Column list for `quizzes` queries.
const QUIZ_COLUMNS: &str = "id, module_id, course_id, title, description, created_by, \
                             is_published, passing_score, max_attempts, created_at, updated_at";

/// Column list for `questions` queries.
const QUESTION_COLUMNS: &str = "id, quiz_id, text, qtype, marks, explanation, position, created_at";

/// Column list for `options` queries.
const OPTION_COLUMNS: &str = "id, question_id, text, is_correct, position";

/// Provides CRUD operations for quizzes and their question sets.
pub struct QuizRepo;

impl QuizRepo {
    /// Insert a new quiz, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateQuiz) -> Result<Quiz, sqlx::Error> {
        let query = format!(
            "INSERT INTO quizzes (module_id, course_id, title, description, created_by,
                                  is_published, passing_score)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {QUIZ_COLUMNS}"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(input.module_id)
            .bind(input.course_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.created_by)
            .bind(input.is_published)
            .bind(input.passing_score)
            .fetch_one(pool)
            .await
    }

    /// Find a quiz by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1");
        sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a module's quiz, if one exists.
    pub async fn find_by_module(
        pool: &PgPool,
        module_id: DbId,
    ) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE module_id = $1");
        sqlx::query_as::<_, Quiz>(&query)
            .bind(module_id)
            .fetch_optional(pool)
            .await
    }

    /// List published quizzes for a set of modules. Learner scope: an
    /// unpublished quiz gates nothing and is invisible.
    pub async fn list_published_by_modules(
        pool: &PgPool,
        module_ids: &[DbId],
    ) -> Result<Vec<Quiz>, sqlx::Error> {
        let query = format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes
             WHERE module_id = ANY($1) AND is_published = TRUE
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(module_ids)
            .fetch_all(pool)
            .await
    }

    /// List quizzes created by the given user, newest first.
    pub async fn list_by_creator(
        pool: &PgPool,
        created_by: DbId,
    ) -> Result<Vec<Quiz>, sqlx::Error> {
        let query = format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE created_by = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(created_by)
            .fetch_all(pool)
            .await
    }

    /// Update quiz metadata. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuiz,
    ) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!(
            "UPDATE quizzes SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                is_published = COALESCE($4, is_published),
                passing_score = COALESCE($5, passing_score),
                max_attempts = COALESCE($6, max_attempts)
             WHERE id = $1
             RETURNING {QUIZ_COLUMNS}"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_published)
            .bind(input.passing_score)
            .bind(input.max_attempts)
            .fetch_optional(pool)
            .await
    }

    /// Delete a quiz. Questions, options, and attempt rows cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load a quiz's questions with their options, both in position order.
    pub async fn questions_with_options(
        pool: &PgPool,
        quiz_id: DbId,
    ) -> Result<Vec<QuestionWithOptions>, sqlx::Error> {
        let query = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions
             WHERE quiz_id = $1 ORDER BY position ASC, id ASC"
        );
        let questions = sqlx::query_as::<_, Question>(&query)
            .bind(quiz_id)
            .fetch_all(pool)
            .await?;

        let question_ids: Vec<DbId> = questions.iter().map(|q| q.id).collect();
        let query = format!(
            "SELECT {OPTION_COLUMNS} FROM options
             WHERE question_id = ANY($1) ORDER BY position ASC, id ASC"
        );
        let options = sqlx::query_as::<_, AnswerOption>(&query)
            .bind(&question_ids)
            .fetch_all(pool)
            .await?;

        let mut by_question: HashMap<DbId, Vec<AnswerOption>> = HashMap::new();
        for option in options {
            by_question.entry(option.question_id).or_default().push(option);
        }

        Ok(questions
            .into_iter()
            .map(|question| {
                let options = by_question.remove(&question.id).unwrap_or_default();
                QuestionWithOptions { question, options }
            })
            .collect())
    }

    /// Replace a quiz's entire question set.
    ///
    /// Deletes all existing questions (options cascade) and reinserts the
    /// posted set in one transaction. Question and option ids are NOT
    /// stable across saves; `question_responses.question_id` is severed to
    /// NULL by its FK rather than dropped.
    pub async fn replace_questions(
        pool: &PgPool,
        quiz_id: DbId,
        inputs: &[QuestionInput],
    ) -> Result<Vec<QuestionWithOptions>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .execute(&mut *tx)
            .await?;

        let mut saved = Vec::with_capacity(inputs.len());
        for (q_index, input) in inputs.iter().enumerate() {
            let query = format!(
                "INSERT INTO questions (quiz_id, text, qtype, explanation, position)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {QUESTION_COLUMNS}"
            );
            let question = sqlx::query_as::<_, Question>(&query)
                .bind(quiz_id)
                .bind(&input.text)
                .bind(&input.qtype)
                .bind(&input.explanation)
                .bind(q_index as i32)
                .fetch_one(&mut *tx)
                .await?;

            let mut saved_options = Vec::with_capacity(input.options.len());
            for (o_index, option) in input.options.iter().enumerate() {
                let query = format!(
                    "INSERT INTO options (question_id, text, is_correct, position)
                     VALUES ($1, $2, $3, $4)
                     RETURNING {OPTION_COLUMNS}"
                );
                let saved_option = sqlx::query_as::<_, AnswerOption>(&query)
                    .bind(question.id)
                    .bind(&option.text)
                    .bind(option.is_correct)
                    .bind(o_index as i32)
                    .fetch_one(&mut *tx)
                    .await?;
                saved_options.push(saved_option);
            }

            saved.push(QuestionWithOptions {
                question,
                options: saved_options,
            });
        }

        tx.commit().await?;
        Ok(saved)
    }
}
