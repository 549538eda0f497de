//! Wire types shared by the server and its clients.
//!
//! All JSON field names are camelCase, matching the public API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod envelope {
    use super::*;

    /// Body of a successful response: a human-readable message plus an
    /// optional payload.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Success<T> {
        pub message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub data: Option<T>,
    }

    /// Machine-readable error payload nested under `error`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub code: String,
        pub message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub details: Option<String>,
    }

    /// Full error envelope, stamped with the originating request path.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: ErrorBody,
        /// RFC3339 timestamp of when the error was produced.
        pub timestamp: String,
        pub path: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Pagination {
        pub page: u64,
        pub limit: u64,
        pub total_pages: u64,
        pub total_items: u64,
    }

    /// List responses that carry pagination metadata instead of a message.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Paginated<T> {
        pub data: Vec<T>,
        pub pagination: Pagination,
    }
}

pub mod card {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardCreate {
        pub name: String,
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardUpdate {
        pub name: String,
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CardView {
        pub id: Uuid,
        pub name: String,
        pub color: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryCreate {
        pub name: String,
        pub color: String,
        #[serde(default)]
        pub is_shared: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryUpdate {
        pub name: String,
        pub color: String,
        #[serde(default)]
        pub is_shared: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub color: String,
        pub is_shared: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod expense {
    use super::*;
    use crate::{card::CardView, category::CategoryView};

    /// Create/update payload for an expense.
    ///
    /// `date` is accepted either as a calendar date (`YYYY-MM-DD`) or as a
    /// full RFC3339 timestamp. `card_id`/`category_id` are raw strings so the
    /// server can report malformed ids with a dedicated error code.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseCreate {
        pub amount: f64,
        pub date: String,
        #[serde(default)]
        pub description: Option<String>,
        pub card_id: String,
        pub category_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseUpdate {
        pub amount: f64,
        pub date: String,
        #[serde(default)]
        pub description: Option<String>,
        pub card_id: String,
        pub category_id: String,
    }

    /// Expense with its card and category attached.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount: f64,
        pub date: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        pub card_id: Uuid,
        pub category_id: Uuid,
        pub card: CardView,
        pub category: CategoryView,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Query string for `GET /expenses`. Values arrive as raw strings;
    /// unparseable ones are ignored rather than rejected.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseListQuery {
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub card_id: Option<String>,
        pub category_id: Option<String>,
        pub page: Option<String>,
        pub limit: Option<String>,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryExpenseSum {
        pub category_id: Uuid,
        pub category_name: String,
        pub color: String,
        pub is_shared: bool,
        pub total_amount: f64,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CardExpenseSum {
        pub card_id: Uuid,
        pub card_name: String,
        pub color: String,
        pub total_amount: f64,
        pub count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlyExpenseSum {
        pub year: i32,
        pub month: u32,
        pub total_amount: f64,
        pub count: u64,
    }

    /// Shared-expense subset of a per-category breakdown, with the fixed
    /// 50/50 split already computed.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SharedExpensesSummary {
        pub total_shared_amount: f64,
        pub split_amount: f64,
        pub categories: Vec<CategoryExpenseSum>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlyReport {
        pub year: i32,
        pub month: u32,
        pub total_amount: f64,
        pub shared_expenses: SharedExpensesSummary,
        pub by_category: Vec<CategoryExpenseSum>,
        /// Omitted (empty) when the report is filtered to a single card.
        pub by_card: Vec<CardExpenseSum>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct YearlyReport {
        pub year: i32,
        pub total_amount: f64,
        pub monthly_data: Vec<MonthlyExpenseSum>,
        pub by_category: Vec<CategoryExpenseSum>,
        pub by_card: Vec<CardExpenseSum>,
    }

    /// Query string for the report endpoints.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportQuery {
        pub year: Option<String>,
        pub month: Option<String>,
        pub card_id: Option<String>,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub message: String,
    }
}
