//! Expense CRUD and the filter/pagination engine.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{EngineError, EntityKind, ResultEngine, cards, categories, expenses};

use super::{Engine, with_tx};

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 20;

/// Filters for listing expenses.
///
/// Date bounds are inclusive on both ends. `page`/`limit` self-correct to
/// positive defaults when absent or zero; that is normalization, not an
/// error condition.
#[derive(Clone, Debug, Default)]
pub struct ExpenseFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub card_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// An expense with its card and category explicitly fetched.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseRecord {
    pub expense: expenses::Model,
    pub card: cards::Model,
    pub category: categories::Model,
}

/// One page of matching expenses plus the totals needed for pagination
/// metadata.
#[derive(Clone, Debug)]
pub struct ExpensePage {
    pub items: Vec<ExpenseRecord>,
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

trait ApplyExpenseFilters: QueryFilter + Sized {
    fn apply_expense_filters(self, filter: &ExpenseFilter) -> Self;
}

impl<T> ApplyExpenseFilters for T
where
    T: QueryFilter + Sized,
{
    /// Predicates are conjunctive and composed in a fixed order regardless of
    /// which subset of filters is present.
    fn apply_expense_filters(mut self, filter: &ExpenseFilter) -> Self {
        if let Some(start) = filter.start_date {
            self = self.filter(expenses::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            self = self.filter(expenses::Column::Date.lte(end));
        }
        if let Some(card_id) = filter.card_id {
            self = self.filter(expenses::Column::CardId.eq(card_id));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(expenses::Column::CategoryId.eq(category_id));
        }
        self
    }
}

fn normalize(value: Option<u64>, default: u64) -> u64 {
    match value {
        Some(v) if v > 0 => v,
        _ => default,
    }
}

async fn attach_related<C>(db: &C, models: Vec<expenses::Model>) -> ResultEngine<Vec<ExpenseRecord>>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let card_ids: HashSet<Uuid> = models.iter().map(|m| m.card_id).collect();
    let category_ids: HashSet<Uuid> = models.iter().map(|m| m.category_id).collect();

    let cards_by_id: HashMap<Uuid, cards::Model> = cards::Entity::find()
        .filter(cards::Column::Id.is_in(card_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|card| (card.id, card))
        .collect();
    let categories_by_id: HashMap<Uuid, categories::Model> = categories::Entity::find()
        .filter(categories::Column::Id.is_in(category_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|category| (category.id, category))
        .collect();

    let mut out = Vec::with_capacity(models.len());
    for model in models {
        let card = cards_by_id
            .get(&model.card_id)
            .cloned()
            .ok_or(EngineError::NotFound(EntityKind::Card))?;
        let category = categories_by_id
            .get(&model.category_id)
            .cloned()
            .ok_or(EngineError::NotFound(EntityKind::Category))?;
        out.push(ExpenseRecord {
            expense: model,
            card,
            category,
        });
    }
    Ok(out)
}

impl Engine {
    /// Lists expenses matching `filter`, newest date first, with the total
    /// count of matches (ignoring pagination).
    pub async fn list_expenses(&self, filter: &ExpenseFilter) -> ResultEngine<ExpensePage> {
        let page = normalize(filter.page, DEFAULT_PAGE);
        let limit = normalize(filter.limit, DEFAULT_LIMIT);

        with_tx!(self, |db_tx| {
            let total_items = expenses::Entity::find()
                .apply_expense_filters(filter)
                .count(&db_tx)
                .await?;

            let models = expenses::Entity::find()
                .apply_expense_filters(filter)
                .order_by_desc(expenses::Column::Date)
                .offset(page.saturating_sub(1).saturating_mul(limit))
                .limit(limit)
                .all(&db_tx)
                .await?;

            let items = attach_related(&db_tx, models).await?;

            Ok(ExpensePage {
                items,
                page,
                limit,
                total_items,
                total_pages: total_items.div_ceil(limit),
            })
        })
    }

    /// Fetches one expense with its card and category attached.
    pub async fn expense(&self, expense_id: Uuid) -> ResultEngine<ExpenseRecord> {
        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(expense_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Expense))?;
            let mut records = attach_related(&db_tx, vec![model]).await?;
            records
                .pop()
                .ok_or(EngineError::NotFound(EntityKind::Expense))
        })
    }

    pub async fn create_expense(
        &self,
        amount: f64,
        date: DateTime<Utc>,
        description: Option<&str>,
        card_id: Uuid,
        category_id: Uuid,
    ) -> ResultEngine<ExpenseRecord> {
        validate_expense_fields(amount, date)?;

        with_tx!(self, |db_tx| {
            let card = cards::Entity::find_by_id(card_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Card))?;
            let category = categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Category))?;

            let now = Utc::now();
            let active = expenses::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                amount: ActiveValue::Set(amount),
                date: ActiveValue::Set(date),
                description: ActiveValue::Set(description.map(ToString::to_string)),
                card_id: ActiveValue::Set(card_id),
                category_id: ActiveValue::Set(category_id),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let expense = active.insert(&db_tx).await?;

            Ok(ExpenseRecord {
                expense,
                card,
                category,
            })
        })
    }

    /// Full-replacement update: every field is rewritten from the arguments,
    /// never merged with the stored row.
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        amount: f64,
        date: DateTime<Utc>,
        description: Option<&str>,
        card_id: Uuid,
        category_id: Uuid,
    ) -> ResultEngine<ExpenseRecord> {
        validate_expense_fields(amount, date)?;

        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(expense_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Expense))?;
            let card = cards::Entity::find_by_id(card_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Card))?;
            let category = categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Category))?;

            let mut active: expenses::ActiveModel = model.into();
            active.amount = ActiveValue::Set(amount);
            active.date = ActiveValue::Set(date);
            active.description = ActiveValue::Set(description.map(ToString::to_string));
            active.card_id = ActiveValue::Set(card_id);
            active.category_id = ActiveValue::Set(category_id);
            active.updated_at = ActiveValue::Set(Utc::now());
            let expense = active.update(&db_tx).await?;

            Ok(ExpenseRecord {
                expense,
                card,
                category,
            })
        })
    }

    pub async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            expenses::Entity::find_by_id(expense_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Expense))?;

            expenses::Entity::delete_by_id(expense_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}

fn validate_expense_fields(amount: f64, date: DateTime<Utc>) -> ResultEngine<()> {
    if amount <= 0.0 {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    if date > Utc::now() {
        return Err(EngineError::FutureDate);
    }
    Ok(())
}
