use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question,
    },
    server::{app::AppState, error::ApiError, pagination::paginate, pagination::PageQuery},
};

use super::{ApiPath, ApiQuery, ApiResponse};

/// Category id to category name, serialized as a JSON object.
pub(super) type CategoryMap = BTreeMap<i64, String>;

#[derive(Serialize)]
struct CategoriesBody {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

pub(super) async fn category_map(pool: &SqlitePool) -> sqlx::Result<CategoryMap> {
    let categories = categories::get_all_categories(pool).await?;
    Ok(categories.into_iter().map(|c| (c.id, c.kind)).collect())
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesBody>> {
    Ok(Json(CategoriesBody {
        success: true,
        categories: category_map(&pool).await?,
    }))
}

// An empty page is a successful, empty listing here, unlike `GET /questions`.
async fn category_questions(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResponse<Json<CategoryQuestionsBody>> {
    if categories::get_category(&pool, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    let questions = questions::get_questions_for_category(&pool, id).await?;
    let total_questions = questions.len();

    Ok(Json(CategoryQuestionsBody {
        success: true,
        questions: paginate(questions, page.page()),
        total_questions,
        current_category: id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
