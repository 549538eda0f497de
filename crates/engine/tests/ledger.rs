use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, EntityKind, ExpenseFilter};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn card_crud_round_trip() {
    let (engine, _db) = engine_with_db().await;

    let card = engine.create_card("Visa", "#3B82F6").await.unwrap();
    assert_eq!(card.name, "Visa");

    let fetched = engine.card(card.id).await.unwrap();
    assert_eq!(fetched, card);

    let updated = engine.update_card(card.id, "Visa Gold", "#FFD700").await.unwrap();
    assert_eq!(updated.name, "Visa Gold");
    assert_eq!(updated.color, "#FFD700");
    assert_eq!(updated.created_at, card.created_at);

    engine.delete_card(card.id).await.unwrap();
    assert_eq!(
        engine.card(card.id).await,
        Err(EngineError::NotFound(EntityKind::Card))
    );
}

#[tokio::test]
async fn list_cards_newest_first() {
    let (engine, _db) = engine_with_db().await;

    engine.create_card("First", "#111111").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    engine.create_card("Second", "#222222").await.unwrap();

    let cards = engine.list_cards().await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].name, "Second");
    assert_eq!(cards[1].name, "First");
}

#[tokio::test]
async fn duplicate_category_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_category("Groceries", "#10B981", false)
        .await
        .unwrap();
    assert_eq!(
        engine.create_category("Groceries", "#FF0000", true).await,
        Err(EngineError::DuplicateCategory("Groceries".to_string()))
    );
}

#[tokio::test]
async fn category_rename_to_own_name_is_allowed() {
    let (engine, _db) = engine_with_db().await;

    let category = engine
        .create_category("Groceries", "#10B981", false)
        .await
        .unwrap();
    let other = engine
        .create_category("Transport", "#3B82F6", false)
        .await
        .unwrap();

    let updated = engine
        .update_category(category.id, "Groceries", "#00FF00", true)
        .await
        .unwrap();
    assert_eq!(updated.color, "#00FF00");
    assert!(updated.is_shared);

    assert_eq!(
        engine
            .update_category(other.id, "Groceries", "#3B82F6", false)
            .await,
        Err(EngineError::DuplicateCategory("Groceries".to_string()))
    );
}

#[tokio::test]
async fn delete_refused_while_expenses_reference_parent() {
    let (engine, _db) = engine_with_db().await;

    let card = engine.create_card("Visa", "#3B82F6").await.unwrap();
    let category = engine
        .create_category("Groceries", "#10B981", false)
        .await
        .unwrap();
    let record = engine
        .create_expense(42.5, day(2026, 1, 15), Some("weekly shop"), card.id, category.id)
        .await
        .unwrap();

    assert_eq!(
        engine.delete_card(card.id).await,
        Err(EngineError::HasExpenses(EntityKind::Card))
    );
    assert_eq!(
        engine.delete_category(category.id).await,
        Err(EngineError::HasExpenses(EntityKind::Category))
    );
    assert!(
        engine
            .has_associated_expenses(card.id, EntityKind::Card)
            .await
            .unwrap()
    );

    engine.delete_expense(record.expense.id).await.unwrap();
    engine.delete_card(card.id).await.unwrap();
    engine.delete_category(category.id).await.unwrap();
}

#[tokio::test]
async fn expense_validation_rejects_bad_input() {
    let (engine, _db) = engine_with_db().await;

    let card = engine.create_card("Visa", "#3B82F6").await.unwrap();
    let category = engine
        .create_category("Groceries", "#10B981", false)
        .await
        .unwrap();

    assert!(matches!(
        engine
            .create_expense(0.0, day(2026, 1, 15), None, card.id, category.id)
            .await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert_eq!(
        engine
            .create_expense(10.0, Utc::now() + chrono::Duration::days(2), None, card.id, category.id)
            .await,
        Err(EngineError::FutureDate)
    );
    assert_eq!(
        engine
            .create_expense(10.0, day(2026, 1, 15), None, uuid::Uuid::new_v4(), category.id)
            .await,
        Err(EngineError::NotFound(EntityKind::Card))
    );
    assert_eq!(
        engine
            .create_expense(10.0, day(2026, 1, 15), None, card.id, uuid::Uuid::new_v4())
            .await,
        Err(EngineError::NotFound(EntityKind::Category))
    );
}

#[tokio::test]
async fn update_expense_replaces_every_field() {
    let (engine, _db) = engine_with_db().await;

    let card = engine.create_card("Visa", "#3B82F6").await.unwrap();
    let other_card = engine.create_card("Amex", "#222222").await.unwrap();
    let category = engine
        .create_category("Groceries", "#10B981", false)
        .await
        .unwrap();

    let record = engine
        .create_expense(10.0, day(2026, 1, 15), Some("before"), card.id, category.id)
        .await
        .unwrap();
    let updated = engine
        .update_expense(record.expense.id, 20.0, day(2026, 2, 1), None, other_card.id, category.id)
        .await
        .unwrap();

    assert_eq!(updated.expense.amount, 20.0);
    assert_eq!(updated.expense.description, None);
    assert_eq!(updated.card.id, other_card.id);
    assert_eq!(updated.expense.date, day(2026, 2, 1));
}

#[tokio::test]
async fn list_expenses_filters_and_paginates() {
    let (engine, _db) = engine_with_db().await;

    let card = engine.create_card("Visa", "#3B82F6").await.unwrap();
    let other_card = engine.create_card("Amex", "#222222").await.unwrap();
    let category = engine
        .create_category("Groceries", "#10B981", false)
        .await
        .unwrap();

    for n in 1..=5 {
        engine
            .create_expense(f64::from(n), day(2026, 1, n as u32), None, card.id, category.id)
            .await
            .unwrap();
    }
    engine
        .create_expense(99.0, day(2026, 2, 1), None, other_card.id, category.id)
        .await
        .unwrap();

    // Unfiltered, defaults: one page, newest date first.
    let page = engine.list_expenses(&ExpenseFilter::default()).await.unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 20);
    assert_eq!(page.total_items, 6);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.items[0].expense.amount, 99.0);

    // Card filter.
    let page = engine
        .list_expenses(&ExpenseFilter {
            card_id: Some(card.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_items, 5);
    assert!(page.items.iter().all(|r| r.card.id == card.id));

    // Inclusive date bounds.
    let page = engine
        .list_expenses(&ExpenseFilter {
            start_date: Some(day(2026, 1, 2)),
            end_date: Some(day(2026, 1, 4)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_items, 3);

    // Second page of two.
    let page = engine
        .list_expenses(&ExpenseFilter {
            page: Some(2),
            limit: Some(4),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 2);

    // Page beyond range: empty data, totals intact.
    let page = engine
        .list_expenses(&ExpenseFilter {
            page: Some(5),
            limit: Some(4),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 6);
    assert_eq!(page.total_pages, 2);

    // Largest possible page: the offset saturates instead of overflowing.
    let page = engine
        .list_expenses(&ExpenseFilter {
            page: Some(u64::MAX),
            limit: Some(20),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 6);

    // Zero values self-correct to defaults.
    let page = engine
        .list_expenses(&ExpenseFilter {
            page: Some(0),
            limit: Some(0),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 20);
}

#[tokio::test]
async fn monthly_report_groups_and_splits_shared() {
    let (engine, _db) = engine_with_db().await;

    let card = engine.create_card("Visa", "#3B82F6").await.unwrap();
    let other_card = engine.create_card("Amex", "#222222").await.unwrap();
    let shared = engine
        .create_category("Rent", "#10B981", true)
        .await
        .unwrap();
    let personal = engine
        .create_category("Hobby", "#3B82F6", false)
        .await
        .unwrap();

    engine
        .create_expense(800.0, day(2026, 3, 1), None, card.id, shared.id)
        .await
        .unwrap();
    engine
        .create_expense(50.0, day(2026, 3, 10), None, card.id, personal.id)
        .await
        .unwrap();
    engine
        .create_expense(30.0, day(2026, 3, 20), None, other_card.id, personal.id)
        .await
        .unwrap();
    // Outside the month, must not count.
    engine
        .create_expense(999.0, day(2026, 4, 1), None, card.id, shared.id)
        .await
        .unwrap();

    let report = engine.monthly_report(2026, 3, None).await.unwrap();
    assert_eq!(report.total_amount, 880.0);
    assert_eq!(report.by_category.len(), 2);
    assert_eq!(report.by_category[0].category.id, shared.id);
    assert_eq!(report.by_category[0].total_amount, 800.0);
    assert_eq!(report.by_category[1].total_amount, 80.0);
    assert_eq!(report.by_category[1].count, 2);
    assert_eq!(report.by_card.len(), 2);
    assert_eq!(report.by_card[0].card.id, card.id);
    assert_eq!(report.shared.total_shared_amount, 800.0);
    assert_eq!(report.shared.split_amount, 400.0);
    assert_eq!(report.shared.categories.len(), 1);

    // Card filter narrows totals and drops the per-card breakdown.
    let filtered = engine.monthly_report(2026, 3, Some(card.id)).await.unwrap();
    assert_eq!(filtered.total_amount, 850.0);
    assert!(filtered.by_card.is_empty());
}

#[tokio::test]
async fn monthly_report_with_no_data_is_empty() {
    let (engine, _db) = engine_with_db().await;

    let report = engine.monthly_report(2026, 6, None).await.unwrap();
    assert_eq!(report.total_amount, 0.0);
    assert!(report.by_category.is_empty());
    assert!(report.by_card.is_empty());
    assert_eq!(report.shared.split_amount, 0.0);
}

#[tokio::test]
async fn yearly_report_lists_only_months_with_data() {
    let (engine, _db) = engine_with_db().await;

    let card = engine.create_card("Visa", "#3B82F6").await.unwrap();
    let category = engine
        .create_category("Groceries", "#10B981", false)
        .await
        .unwrap();

    engine
        .create_expense(100.0, day(2026, 1, 5), None, card.id, category.id)
        .await
        .unwrap();
    engine
        .create_expense(200.0, day(2026, 1, 25), None, card.id, category.id)
        .await
        .unwrap();
    engine
        .create_expense(300.0, day(2026, 7, 5), None, card.id, category.id)
        .await
        .unwrap();
    // Previous year, must not count.
    engine
        .create_expense(400.0, day(2025, 12, 31), None, card.id, category.id)
        .await
        .unwrap();

    let report = engine.yearly_report(2026, None).await.unwrap();
    assert_eq!(report.total_amount, 600.0);
    assert_eq!(report.monthly.len(), 2);
    assert_eq!(report.monthly[0].month, 1);
    assert_eq!(report.monthly[0].total_amount, 300.0);
    assert_eq!(report.monthly[0].count, 2);
    assert_eq!(report.monthly[1].month, 7);
    assert_eq!(report.monthly[1].total_amount, 300.0);
    assert_eq!(report.by_category[0].total_amount, 600.0);
}
