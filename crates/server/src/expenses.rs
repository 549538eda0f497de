//! Expense API endpoints

use api_types::{
    envelope::{Paginated, Pagination, Success},
    expense::{ExpenseCreate, ExpenseListQuery, ExpenseUpdate, ExpenseView},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::{
    ServerError,
    cards::{map_card, parse_id},
    categories::map_category,
    server::ServerState,
    validate,
};
use engine::{ExpenseFilter, ExpenseRecord};

/// Accepts a bare calendar date or a full RFC3339 timestamp.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn require_date(raw: &str) -> Result<DateTime<Utc>, ServerError> {
    parse_date(raw).ok_or_else(|| {
        ServerError::bad_request("INVALID_DATE", "date must be YYYY-MM-DD or RFC3339")
    })
}

fn require_card_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw)
        .map_err(|_| ServerError::bad_request("INVALID_CARD_ID", "invalid card id format"))
}

fn require_category_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw)
        .map_err(|_| ServerError::bad_request("INVALID_CATEGORY_ID", "invalid category id format"))
}

pub(crate) fn map_expense(record: ExpenseRecord) -> ExpenseView {
    ExpenseView {
        id: record.expense.id,
        amount: record.expense.amount,
        date: record.expense.date,
        description: record.expense.description,
        card_id: record.expense.card_id,
        category_id: record.expense.category_id,
        card: map_card(record.card),
        category: map_category(record.category),
        created_at: record.expense.created_at,
        updated_at: record.expense.updated_at,
    }
}

/// Query parsing is lenient: a filter value that does not parse is
/// dropped rather than failing the whole request.
fn filter_from_query(query: &ExpenseListQuery) -> ExpenseFilter {
    ExpenseFilter {
        start_date: query.start_date.as_deref().and_then(parse_date),
        end_date: query.end_date.as_deref().and_then(parse_date),
        card_id: query
            .card_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok()),
        category_id: query
            .category_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok()),
        page: query.page.as_deref().and_then(|raw| raw.parse().ok()),
        limit: query.limit.as_deref().and_then(|raw| raw.parse().ok()),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Paginated<ExpenseView>>, ServerError> {
    let filter = filter_from_query(&query);
    let page = state.engine.list_expenses(&filter).await?;

    Ok(Json(Paginated {
        data: page.items.into_iter().map(map_expense).collect(),
        pagination: Pagination {
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
            total_items: page.total_items,
        },
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Success<ExpenseView>>, ServerError> {
    let id = parse_id(&id)?;
    let record = state.engine.expense(id).await?;

    Ok(Json(Success {
        message: "Expense retrieved successfully".to_string(),
        data: Some(map_expense(record)),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Success<ExpenseView>>), ServerError> {
    let Json(payload) = payload.map_err(ServerError::invalid_json)?;
    validate::expense_amount(payload.amount)?;
    let date = require_date(&payload.date)?;
    let card_id = require_card_id(&payload.card_id)?;
    let category_id = require_category_id(&payload.category_id)?;

    let record = state
        .engine
        .create_expense(
            payload.amount,
            date,
            payload.description.as_deref(),
            card_id,
            category_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Success {
            message: "Expense created successfully".to_string(),
            data: Some(map_expense(record)),
        }),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<Success<ExpenseView>>, ServerError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload.map_err(ServerError::invalid_json)?;
    validate::expense_amount(payload.amount)?;
    let date = require_date(&payload.date)?;
    let card_id = require_card_id(&payload.card_id)?;
    let category_id = require_category_id(&payload.category_id)?;

    let record = state
        .engine
        .update_expense(
            id,
            payload.amount,
            date,
            payload.description.as_deref(),
            card_id,
            category_id,
        )
        .await?;

    Ok(Json(Success {
        message: "Expense updated successfully".to_string(),
        data: Some(map_expense(record)),
    }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Success<()>>, ServerError> {
    let id = parse_id(&id)?;
    state.engine.delete_expense(id).await?;

    Ok(Json(Success {
        message: "Expense deleted successfully".to_string(),
        data: None,
    }))
}
