pub use error::{EngineError, EntityKind};
pub use ops::{Engine, EngineBuilder, ExpenseFilter, ExpensePage, ExpenseRecord};
pub use ops::{
    CardTotal, CategoryTotal, MonthTotal, MonthlyReport, SharedSummary, YearlyReport,
};

pub mod cards;
pub mod categories;
pub mod expenses;

mod error;
mod ops;

/// A payment card row.
pub use cards::Model as Card;
/// A spending category row.
pub use categories::Model as Category;
/// A single expense row (without its related card/category).
pub use expenses::Model as Expense;

type ResultEngine<T> = Result<T, EngineError>;
