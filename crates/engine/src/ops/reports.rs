//! Monthly and yearly spending reports.
//!
//! Reports are computed from a single range-filtered fetch of expenses and
//! grouped in process. Aggregations are deterministic: totals sort highest
//! first, ties break on name.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use sea_orm::{QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, cards, categories, expenses};

use super::Engine;

/// Spending attributed to one category over the report range.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTotal {
    pub category: categories::Model,
    pub total_amount: f64,
    pub count: u64,
}

/// Spending attributed to one card over the report range.
#[derive(Clone, Debug, PartialEq)]
pub struct CardTotal {
    pub card: cards::Model,
    pub total_amount: f64,
    pub count: u64,
}

/// Spending in one calendar month of a yearly report.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthTotal {
    pub year: i32,
    pub month: u32,
    pub total_amount: f64,
    pub count: u64,
}

/// Totals over categories marked as shared, with the even two-way split.
#[derive(Clone, Debug, PartialEq)]
pub struct SharedSummary {
    pub total_shared_amount: f64,
    pub split_amount: f64,
    pub categories: Vec<CategoryTotal>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub total_amount: f64,
    pub shared: SharedSummary,
    pub by_category: Vec<CategoryTotal>,
    pub by_card: Vec<CardTotal>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct YearlyReport {
    pub year: i32,
    pub total_amount: f64,
    pub monthly: Vec<MonthTotal>,
    pub by_category: Vec<CategoryTotal>,
    pub by_card: Vec<CardTotal>,
}

fn month_start(year: i32, month: u32) -> ResultEngine<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidRange(format!("no such month: {year}-{month:02}")))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Half-open `[from, to)` range covering one calendar month.
fn month_range(year: i32, month: u32) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
    let from = month_start(year, month)?;
    let to = if month == 12 {
        month_start(year + 1, 1)?
    } else {
        month_start(year, month + 1)?
    };
    Ok((from, to))
}

/// Half-open `[from, to)` range covering one calendar year.
fn year_range(year: i32) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
    Ok((month_start(year, 1)?, month_start(year + 1, 1)?))
}

#[derive(Default)]
struct Accum {
    total: f64,
    count: u64,
}

fn accumulate(buckets: &mut HashMap<Uuid, Accum>, key: Uuid, amount: f64) {
    let entry = buckets.entry(key).or_default();
    entry.total += amount;
    entry.count += 1;
}

async fn category_totals<C>(
    db: &C,
    buckets: HashMap<Uuid, Accum>,
) -> ResultEngine<Vec<CategoryTotal>>
where
    C: ConnectionTrait,
{
    if buckets.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = buckets.keys().copied().collect();
    let models = categories::Entity::find()
        .filter(categories::Column::Id.is_in(ids))
        .all(db)
        .await?;

    let mut totals: Vec<CategoryTotal> = models
        .into_iter()
        .filter_map(|category| {
            buckets.get(&category.id).map(|acc| CategoryTotal {
                total_amount: acc.total,
                count: acc.count,
                category,
            })
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| a.category.name.cmp(&b.category.name))
    });
    Ok(totals)
}

async fn card_totals<C>(db: &C, buckets: HashMap<Uuid, Accum>) -> ResultEngine<Vec<CardTotal>>
where
    C: ConnectionTrait,
{
    if buckets.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = buckets.keys().copied().collect();
    let models = cards::Entity::find()
        .filter(cards::Column::Id.is_in(ids))
        .all(db)
        .await?;

    let mut totals: Vec<CardTotal> = models
        .into_iter()
        .filter_map(|card| {
            buckets.get(&card.id).map(|acc| CardTotal {
                total_amount: acc.total,
                count: acc.count,
                card,
            })
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| a.card.name.cmp(&b.card.name))
    });
    Ok(totals)
}

fn shared_summary(by_category: &[CategoryTotal]) -> SharedSummary {
    let shared: Vec<CategoryTotal> = by_category
        .iter()
        .filter(|total| total.category.is_shared)
        .cloned()
        .collect();
    let total_shared_amount: f64 = shared.iter().map(|total| total.total_amount).sum();
    SharedSummary {
        total_shared_amount,
        split_amount: total_shared_amount / 2.0,
        categories: shared,
    }
}

async fn expenses_in_range<C>(
    db: &C,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    card_id: Option<Uuid>,
) -> ResultEngine<Vec<expenses::Model>>
where
    C: ConnectionTrait,
{
    let mut query = expenses::Entity::find()
        .filter(expenses::Column::Date.gte(from))
        .filter(expenses::Column::Date.lt(to));
    if let Some(card_id) = card_id {
        query = query.filter(expenses::Column::CardId.eq(card_id));
    }
    Ok(query.all(db).await?)
}

impl Engine {
    /// Computes the spending report for one calendar month.
    ///
    /// When `card_id` is given the report covers that card only and the
    /// per-card breakdown is omitted.
    pub async fn monthly_report(
        &self,
        year: i32,
        month: u32,
        card_id: Option<Uuid>,
    ) -> ResultEngine<MonthlyReport> {
        let (from, to) = month_range(year, month)?;
        let rows = expenses_in_range(&self.database, from, to, card_id).await?;

        let mut total_amount = 0.0;
        let mut by_category_buckets = HashMap::new();
        let mut by_card_buckets = HashMap::new();
        for row in &rows {
            total_amount += row.amount;
            accumulate(&mut by_category_buckets, row.category_id, row.amount);
            if card_id.is_none() {
                accumulate(&mut by_card_buckets, row.card_id, row.amount);
            }
        }

        let by_category = category_totals(&self.database, by_category_buckets).await?;
        let by_card = card_totals(&self.database, by_card_buckets).await?;
        let shared = shared_summary(&by_category);

        Ok(MonthlyReport {
            year,
            month,
            total_amount,
            shared,
            by_category,
            by_card,
        })
    }

    /// Computes the spending report for one calendar year.
    ///
    /// The monthly breakdown lists only months with matching expenses, in
    /// ascending month order.
    pub async fn yearly_report(
        &self,
        year: i32,
        card_id: Option<Uuid>,
    ) -> ResultEngine<YearlyReport> {
        let (from, to) = year_range(year)?;
        let rows = expenses_in_range(&self.database, from, to, card_id).await?;

        let mut total_amount = 0.0;
        let mut by_month: BTreeMap<u32, Accum> = BTreeMap::new();
        let mut by_category_buckets = HashMap::new();
        let mut by_card_buckets = HashMap::new();
        for row in &rows {
            total_amount += row.amount;
            let slot = by_month.entry(row.date.month()).or_default();
            slot.total += row.amount;
            slot.count += 1;
            accumulate(&mut by_category_buckets, row.category_id, row.amount);
            if card_id.is_none() {
                accumulate(&mut by_card_buckets, row.card_id, row.amount);
            }
        }

        let monthly = by_month
            .into_iter()
            .map(|(month, acc)| MonthTotal {
                year,
                month,
                total_amount: acc.total,
                count: acc.count,
            })
            .collect();

        let by_category = category_totals(&self.database, by_category_buckets).await?;
        let by_card = card_totals(&self.database, by_card_buckets).await?;

        Ok(YearlyReport {
            year,
            total_amount,
            monthly,
            by_category,
            by_card,
        })
    }
}
