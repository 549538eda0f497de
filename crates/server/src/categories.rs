//! Category API endpoints

use api_types::{
    category::{CategoryCreate, CategoryUpdate, CategoryView},
    envelope::Success,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{ServerError, cards::parse_id, server::ServerState, validate};

pub(crate) fn map_category(model: engine::Category) -> CategoryView {
    CategoryView {
        id: model.id,
        name: model.name,
        color: model.color,
        is_shared: model.is_shared,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Success<Vec<CategoryView>>>, ServerError> {
    let categories = state
        .engine
        .list_categories()
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(Success {
        message: "Categories retrieved successfully".to_string(),
        data: Some(categories),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Success<CategoryView>>, ServerError> {
    let id = parse_id(&id)?;
    let category = state.engine.category(id).await?;

    Ok(Json(Success {
        message: "Category retrieved successfully".to_string(),
        data: Some(map_category(category)),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CategoryCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Success<CategoryView>>), ServerError> {
    let Json(payload) = payload.map_err(ServerError::invalid_json)?;
    validate::category_payload(&payload.name, &payload.color)?;

    let category = state
        .engine
        .create_category(&payload.name, &payload.color, payload.is_shared)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Success {
            message: "Category created successfully".to_string(),
            data: Some(map_category(category)),
        }),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<Success<CategoryView>>, ServerError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload.map_err(ServerError::invalid_json)?;
    validate::category_payload(&payload.name, &payload.color)?;

    let category = state
        .engine
        .update_category(id, &payload.name, &payload.color, payload.is_shared)
        .await?;

    Ok(Json(Success {
        message: "Category updated successfully".to_string(),
        data: Some(map_category(category)),
    }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Success<()>>, ServerError> {
    let id = parse_id(&id)?;
    state.engine.delete_category(id).await?;

    Ok(Json(Success {
        message: "Category deleted successfully".to_string(),
        data: None,
    }))
}
