use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{EntityKind, ResultEngine, expenses};

mod cards;
mod categories;
mod expenses_ops;
mod reports;

pub use expenses_ops::{ExpenseFilter, ExpensePage, ExpenseRecord};
pub use reports::{CardTotal, CategoryTotal, MonthTotal, MonthlyReport, SharedSummary, YearlyReport};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Returns true iff at least one expense references the given card or
    /// category. Deletion of either parent is refused while this holds.
    pub async fn has_associated_expenses(
        &self,
        entity_id: Uuid,
        kind: EntityKind,
    ) -> ResultEngine<bool> {
        count_references(&self.database, entity_id, kind)
            .await
            .map(|count| count > 0)
    }
}

pub(super) async fn count_references<C>(db: &C, entity_id: Uuid, kind: EntityKind) -> ResultEngine<u64>
where
    C: sea_orm::ConnectionTrait,
{
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

    let column = match kind {
        EntityKind::Card => expenses::Column::CardId,
        EntityKind::Category => expenses::Column::CategoryId,
        // Expenses have no dependent records.
        EntityKind::Expense => return Ok(0),
    };

    Ok(expenses::Entity::find()
        .filter(column.eq(entity_id))
        .count(db)
        .await?)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
