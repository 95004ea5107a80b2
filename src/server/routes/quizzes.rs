use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    server::{app::AppState, deserializers::deserialize_category_selector, error::ApiError},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{ApiJson, ApiResponse};

#[derive(Deserialize)]
struct QuizRequest {
    previous_questions: Option<Vec<i64>>,
    quiz_category: Option<QuizCategory>,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_category_selector")]
    id: Option<i64>,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Question,
}

/// Uniform pick over the whole selection. Previously asked ids are accepted
/// but do not narrow the draw.
fn next_question(candidates: Vec<Question>) -> Option<Question> {
    candidates.choose(&mut rand::thread_rng()).cloned()
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    ApiJson(request): ApiJson<QuizRequest>,
) -> ApiResponse<Json<QuizQuestion>> {
    let (Some(previous), Some(category)) = (request.previous_questions, request.quiz_category)
    else {
        return Err(ApiError::NotFound);
    };
    tracing::debug!(asked = previous.len(), category = ?category.id, "Quiz request");

    let candidates = match category.id {
        Some(id) => questions::get_questions_for_category(&pool, id).await?,
        None => questions::get_all_questions(&pool).await?,
    };
    let question = next_question(candidates).ok_or(ApiError::NotFound)?;

    let label = category.id.map_or_else(|| "all".to_owned(), |id| id.to_string());
    QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
    tracing::debug!(id = question.id, category = ?category.id, "Serving quiz question");

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
