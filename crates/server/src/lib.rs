use api_types::envelope::ErrorBody;
use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use engine::{EngineError, EntityKind};

pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod cards;
mod categories;
mod envelope;
mod expenses;
mod health;
mod reports;
mod server;
mod validate;

pub mod types {
    pub mod card {
        pub use api_types::card::{CardCreate, CardUpdate, CardView};
        pub use engine::Card;
    }

    pub mod category {
        pub use api_types::category::{CategoryCreate, CategoryUpdate, CategoryView};
        pub use engine::Category;
    }

    pub mod expense {
        pub use api_types::expense::{ExpenseCreate, ExpenseListQuery, ExpenseUpdate, ExpenseView};
        pub use engine::{Expense, ExpenseFilter};
    }

    pub mod report {
        pub use api_types::report::{
            CardExpenseSum, CategoryExpenseSum, MonthlyExpenseSum, MonthlyReport, ReportQuery,
            SharedExpensesSummary, YearlyReport,
        };
    }

    pub mod envelope {
        pub use api_types::envelope::{ErrorBody, ErrorResponse, Paginated, Pagination, Success};
    }
}

/// Error returned by every handler. Engine errors keep their semantics;
/// everything the server rejects before reaching the engine is a
/// `BadRequest` with a machine-readable code.
pub enum ServerError {
    Engine(EngineError),
    BadRequest {
        code: &'static str,
        message: String,
        details: Option<String>,
    },
}

impl ServerError {
    pub(crate) fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub(crate) fn validation(violations: Vec<String>) -> Self {
        Self::BadRequest {
            code: "VALIDATION_ERROR",
            message: "validation failed".to_string(),
            details: Some(violations.join("; ")),
        }
    }

    pub(crate) fn invalid_json(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            code: "INVALID_REQUEST",
            message: "malformed request body".to_string(),
            details: Some(rejection.body_text()),
        }
    }
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::DuplicateCategory(_) | EngineError::HasExpenses(_) => StatusCode::CONFLICT,
        EngineError::InvalidAmount(_) | EngineError::FutureDate | EngineError::InvalidRange(_) => {
            StatusCode::BAD_REQUEST
        }
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorBody {
    let (code, message, details) = match &err {
        EngineError::NotFound(EntityKind::Card) => ("CARD_NOT_FOUND", err.to_string(), None),
        EngineError::NotFound(EntityKind::Category) => {
            ("CATEGORY_NOT_FOUND", err.to_string(), None)
        }
        EngineError::NotFound(EntityKind::Expense) => ("EXPENSE_NOT_FOUND", err.to_string(), None),
        EngineError::DuplicateCategory(_) => ("DUPLICATE_CATEGORY", err.to_string(), None),
        EngineError::HasExpenses(EntityKind::Card) => ("CARD_HAS_EXPENSES", err.to_string(), None),
        EngineError::HasExpenses(_) => ("CATEGORY_HAS_EXPENSES", err.to_string(), None),
        EngineError::InvalidAmount(_) | EngineError::InvalidRange(_) => {
            ("VALIDATION_ERROR", err.to_string(), None)
        }
        EngineError::FutureDate => ("FUTURE_DATE", err.to_string(), None),
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            (
                "INTERNAL_ERROR",
                "internal server error".to_string(),
                Some(db_err.to_string()),
            )
        }
    };

    ErrorBody {
        code: code.to_string(),
        message,
        details,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::BadRequest {
                code,
                message,
                details,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: code.to_string(),
                    message,
                    details,
                },
            ),
        };

        // The envelope middleware picks the body back up from the extensions
        // to stamp the request path and timestamp onto it.
        let mut response =
            (status, Json(serde_json::json!({ "error": &body }))).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(err: ServerError) -> ErrorBody {
        let response = err.into_response();
        response.extensions().get::<ErrorBody>().cloned().unwrap()
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound(EntityKind::Card)).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_found_code_names_the_entity() {
        let body = body_of(ServerError::from(EngineError::NotFound(EntityKind::Expense)));
        assert_eq!(body.code, "EXPENSE_NOT_FOUND");
    }

    #[test]
    fn engine_duplicate_maps_to_409() {
        let res =
            ServerError::from(EngineError::DuplicateCategory("Rent".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_referenced_parent_maps_to_409() {
        let body = body_of(ServerError::from(EngineError::HasExpenses(EntityKind::Category)));
        assert_eq!(body.code, "CATEGORY_HAS_EXPENSES");
        let res = ServerError::from(EngineError::HasExpenses(EntityKind::Card)).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_400() {
        let res =
            ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_of(ServerError::from(EngineError::FutureDate));
        assert_eq!(body.code, "FUTURE_DATE");
    }

    #[test]
    fn engine_database_error_is_masked() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("boom".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = res.extensions().get::<ErrorBody>().cloned().unwrap();
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert_eq!(body.message, "internal server error");
    }

    #[test]
    fn bad_request_maps_to_400() {
        let res = ServerError::bad_request("INVALID_UUID", "invalid id format").into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_joins_violations() {
        let body = body_of(ServerError::validation(vec![
            "name is required".to_string(),
            "color must be a hex color".to_string(),
        ]));
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(
            body.details.as_deref(),
            Some("name is required; color must be a hex color")
        );
    }
}
