//! Category CRUD operations.
//!
//! Category names are globally unique; the conflict is detected by an
//! explicit lookup before the write so callers get a deterministic error
//! instead of a storage constraint failure.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, EntityKind, ResultEngine, categories};

use super::{Engine, count_references, with_tx};

async fn assert_name_free<C>(db: &C, name: &str, exclude: Option<Uuid>) -> ResultEngine<()>
where
    C: ConnectionTrait,
{
    let mut query = categories::Entity::find().filter(categories::Column::Name.eq(name));
    if let Some(id) = exclude {
        query = query.filter(categories::Column::Id.ne(id));
    }

    if query.one(db).await?.is_some() {
        return Err(EngineError::DuplicateCategory(name.to_string()));
    }
    Ok(())
}

impl Engine {
    /// Lists all categories, newest first.
    pub async fn list_categories(&self) -> ResultEngine<Vec<categories::Model>> {
        Ok(categories::Entity::find()
            .order_by_desc(categories::Column::CreatedAt)
            .all(&self.database)
            .await?)
    }

    pub async fn category(&self, category_id: Uuid) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .one(&self.database)
            .await?
            .ok_or(EngineError::NotFound(EntityKind::Category))
    }

    pub async fn create_category(
        &self,
        name: &str,
        color: &str,
        is_shared: bool,
    ) -> ResultEngine<categories::Model> {
        with_tx!(self, |db_tx| {
            assert_name_free(&db_tx, name, None).await?;

            let now = Utc::now();
            let active = categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name.to_string()),
                color: ActiveValue::Set(color.to_string()),
                is_shared: ActiveValue::Set(is_shared),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            Ok(active.insert(&db_tx).await?)
        })
    }

    /// Full-replacement update; the uniqueness check excludes the row itself
    /// so renaming a category to its own name is a no-op, not a conflict.
    pub async fn update_category(
        &self,
        category_id: Uuid,
        name: &str,
        color: &str,
        is_shared: bool,
    ) -> ResultEngine<categories::Model> {
        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Category))?;

            assert_name_free(&db_tx, name, Some(category_id)).await?;

            let mut active: categories::ActiveModel = model.into();
            active.name = ActiveValue::Set(name.to_string());
            active.color = ActiveValue::Set(color.to_string());
            active.is_shared = ActiveValue::Set(is_shared);
            active.updated_at = ActiveValue::Set(Utc::now());
            Ok(active.update(&db_tx).await?)
        })
    }

    /// Deletes a category, refusing with a conflict while expenses reference it.
    pub async fn delete_category(&self, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Category))?;

            if count_references(&db_tx, category_id, EntityKind::Category).await? > 0 {
                return Err(EngineError::HasExpenses(EntityKind::Category));
            }

            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
