use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, NewQuestion, Question},
    server::{
        app::AppState,
        deserializers::deserialize_optional_integer,
        error::ApiError,
        pagination::{paginate, PageQuery},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::{
    categories::{category_map, CategoryMap},
    ApiJson, ApiPath, ApiQuery, ApiResponse,
};

#[derive(Deserialize)]
struct QuestionForm {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_integer")]
    difficulty: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_integer")]
    category: Option<i64>,
}

impl TryFrom<QuestionForm> for NewQuestion {
    type Error = ApiError;

    fn try_from(form: QuestionForm) -> Result<Self, Self::Error> {
        fn text(value: Option<String>, field: &str) -> Result<String, ApiError> {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Unprocessable(format!("`{field}` is required")))
        }
        fn number(value: Option<i64>, field: &str) -> Result<i64, ApiError> {
            value.ok_or_else(|| ApiError::Unprocessable(format!("`{field}` is required")))
        }

        Ok(NewQuestion {
            question: text(form.question, "question")?,
            answer: text(form.answer, "answer")?,
            difficulty: number(form.difficulty, "difficulty")?,
            category: number(form.category, "category")?,
        })
    }
}

#[derive(Deserialize)]
struct SearchForm {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
    message: &'static str,
}

async fn questions_page(
    State(pool): State<SqlitePool>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let questions = questions::get_all_questions(&pool).await?;
    let total_questions = questions.len();
    let current = paginate(questions, page.page());
    if current.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(QuestionsPage {
        success: true,
        questions: current,
        total_questions,
        categories: category_map(&pool).await?,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    ApiJson(form): ApiJson<QuestionForm>,
) -> ApiResponse<(StatusCode, Json<Created>)> {
    let new_question = NewQuestion::try_from(form)?;
    let id = questions::create_question(&pool, &new_question)
        .await
        .map_err(|error| {
            tracing::error!(error = ?error, "Failed to store question");
            ApiError::Unprocessable("question could not be stored".to_owned())
        })?;
    QUESTIONS_CREATED.inc();
    tracing::info!(id, category = new_question.category, "Question created");

    Ok((
        StatusCode::CREATED,
        Json(Created {
            success: true,
            message: "Question successfully created!",
        }),
    ))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<Json<Deleted>> {
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::NotFound);
    }
    QUESTIONS_DELETED.inc();
    tracing::info!(id, "Question deleted");

    Ok(Json(Deleted {
        success: true,
        deleted: id,
        message: "Question successfully deleted",
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiJson(form): ApiJson<SearchForm>,
) -> ApiResponse<Json<SearchResults>> {
    let term = form
        .search_term
        .filter(|term| !term.is_empty())
        .ok_or_else(|| ApiError::Unprocessable("`searchTerm` is required".to_owned()))?;

    let matches = questions::search_questions(&pool, &term).await?;
    if matches.is_empty() {
        return Err(ApiError::NotFound);
    }
    // size of the whole bank, not of the match set
    let total_questions = questions::count_questions(&pool).await?;

    Ok(Json(SearchResults {
        success: true,
        questions: paginate(matches, page.page()),
        total_questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(questions_page).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/questions/search", post(search_questions))
        .with_state(state)
}
