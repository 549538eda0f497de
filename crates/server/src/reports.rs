//! Report API endpoints

use api_types::{
    envelope::Success,
    report::{
        CardExpenseSum, CategoryExpenseSum, MonthlyExpenseSum, MonthlyReport, ReportQuery,
        SharedExpensesSummary, YearlyReport,
    },
};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

const YEAR_MIN: i32 = 2000;
const YEAR_MAX: i32 = 2100;

/// Missing year means the current year.
fn parse_year(raw: Option<&str>) -> Result<i32, ServerError> {
    let year = match raw {
        None | Some("") => Utc::now().year(),
        Some(raw) => raw
            .parse()
            .map_err(|_| ServerError::bad_request("INVALID_YEAR", "year must be a number"))?,
    };
    if (YEAR_MIN..=YEAR_MAX).contains(&year) {
        Ok(year)
    } else {
        Err(ServerError::bad_request(
            "INVALID_YEAR",
            format!("year must be between {YEAR_MIN} and {YEAR_MAX}"),
        ))
    }
}

fn parse_month(raw: Option<&str>) -> Result<u32, ServerError> {
    let month: u32 = raw
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| ServerError::bad_request("INVALID_MONTH", "month is required"))?
        .parse()
        .map_err(|_| ServerError::bad_request("INVALID_MONTH", "month must be a number"))?;
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(ServerError::bad_request(
            "INVALID_MONTH",
            "month must be between 1 and 12",
        ))
    }
}

fn parse_card(raw: Option<&str>) -> Result<Option<Uuid>, ServerError> {
    match raw.filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => Uuid::parse_str(raw)
            .map(Some)
            .map_err(|_| ServerError::bad_request("INVALID_CARD_ID", "invalid card id format")),
    }
}

fn map_category_sum(total: engine::CategoryTotal) -> CategoryExpenseSum {
    CategoryExpenseSum {
        category_id: total.category.id,
        category_name: total.category.name,
        color: total.category.color,
        is_shared: total.category.is_shared,
        total_amount: total.total_amount,
        count: total.count,
    }
}

fn map_card_sum(total: engine::CardTotal) -> CardExpenseSum {
    CardExpenseSum {
        card_id: total.card.id,
        card_name: total.card.name,
        color: total.card.color,
        total_amount: total.total_amount,
        count: total.count,
    }
}

fn map_shared(summary: engine::SharedSummary) -> SharedExpensesSummary {
    SharedExpensesSummary {
        total_shared_amount: summary.total_shared_amount,
        split_amount: summary.split_amount,
        categories: summary
            .categories
            .into_iter()
            .map(map_category_sum)
            .collect(),
    }
}

pub async fn monthly(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Success<MonthlyReport>>, ServerError> {
    let year = parse_year(query.year.as_deref())?;
    let month = parse_month(query.month.as_deref())?;
    let card_id = parse_card(query.card_id.as_deref())?;

    let report = state.engine.monthly_report(year, month, card_id).await?;

    Ok(Json(Success {
        message: "Monthly report generated successfully".to_string(),
        data: Some(MonthlyReport {
            year: report.year,
            month: report.month,
            total_amount: report.total_amount,
            shared_expenses: map_shared(report.shared),
            by_category: report.by_category.into_iter().map(map_category_sum).collect(),
            by_card: report.by_card.into_iter().map(map_card_sum).collect(),
        }),
    }))
}

pub async fn yearly(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Success<YearlyReport>>, ServerError> {
    let year = parse_year(query.year.as_deref())?;
    let card_id = parse_card(query.card_id.as_deref())?;

    let report = state.engine.yearly_report(year, card_id).await?;

    Ok(Json(Success {
        message: "Yearly report generated successfully".to_string(),
        data: Some(YearlyReport {
            year: report.year,
            total_amount: report.total_amount,
            monthly_data: report
                .monthly
                .into_iter()
                .map(|month| MonthlyExpenseSum {
                    year: month.year,
                    month: month.month,
                    total_amount: month.total_amount,
                    count: month.count,
                })
                .collect(),
            by_category: report.by_category.into_iter().map(map_category_sum).collect(),
            by_card: report.by_card.into_iter().map(map_card_sum).collect(),
        }),
    }))
}
