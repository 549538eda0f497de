//! Card API endpoints

use api_types::{
    card::{CardCreate, CardUpdate, CardView},
    envelope::Success,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, validate};

pub(crate) fn map_card(model: engine::Card) -> CardView {
    CardView {
        id: model.id,
        name: model.name,
        color: model.color,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw)
        .map_err(|_| ServerError::bad_request("INVALID_UUID", "invalid id format"))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Success<Vec<CardView>>>, ServerError> {
    let cards = state
        .engine
        .list_cards()
        .await?
        .into_iter()
        .map(map_card)
        .collect();

    Ok(Json(Success {
        message: "Cards retrieved successfully".to_string(),
        data: Some(cards),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Success<CardView>>, ServerError> {
    let id = parse_id(&id)?;
    let card = state.engine.card(id).await?;

    Ok(Json(Success {
        message: "Card retrieved successfully".to_string(),
        data: Some(map_card(card)),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CardCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Success<CardView>>), ServerError> {
    let Json(payload) = payload.map_err(ServerError::invalid_json)?;
    validate::card_payload(&payload.name, &payload.color)?;

    let card = state
        .engine
        .create_card(&payload.name, &payload.color)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Success {
            message: "Card created successfully".to_string(),
            data: Some(map_card(card)),
        }),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<CardUpdate>, JsonRejection>,
) -> Result<Json<Success<CardView>>, ServerError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload.map_err(ServerError::invalid_json)?;
    validate::card_payload(&payload.name, &payload.color)?;

    let card = state
        .engine
        .update_card(id, &payload.name, &payload.color)
        .await?;

    Ok(Json(Success {
        message: "Card updated successfully".to_string(),
        data: Some(map_card(card)),
    }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Success<()>>, ServerError> {
    let id = parse_id(&id)?;
    state.engine.delete_card(id).await?;

    Ok(Json(Success {
        message: "Card deleted successfully".to_string(),
        data: None,
    }))
}
