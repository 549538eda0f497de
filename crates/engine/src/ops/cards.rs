//! Card CRUD operations.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, EntityKind, ResultEngine, cards};

use super::{Engine, count_references, with_tx};

impl Engine {
    /// Lists all cards, newest first.
    pub async fn list_cards(&self) -> ResultEngine<Vec<cards::Model>> {
        Ok(cards::Entity::find()
            .order_by_desc(cards::Column::CreatedAt)
            .all(&self.database)
            .await?)
    }

    pub async fn card(&self, card_id: Uuid) -> ResultEngine<cards::Model> {
        cards::Entity::find_by_id(card_id)
            .one(&self.database)
            .await?
            .ok_or(EngineError::NotFound(EntityKind::Card))
    }

    pub async fn create_card(&self, name: &str, color: &str) -> ResultEngine<cards::Model> {
        let now = Utc::now();
        let active = cards::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(name.to_string()),
            color: ActiveValue::Set(color.to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        Ok(active.insert(&self.database).await?)
    }

    /// Full-replacement update: both fields are always rewritten.
    pub async fn update_card(
        &self,
        card_id: Uuid,
        name: &str,
        color: &str,
    ) -> ResultEngine<cards::Model> {
        with_tx!(self, |db_tx| {
            let model = cards::Entity::find_by_id(card_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Card))?;

            let mut active: cards::ActiveModel = model.into();
            active.name = ActiveValue::Set(name.to_string());
            active.color = ActiveValue::Set(color.to_string());
            active.updated_at = ActiveValue::Set(Utc::now());
            Ok(active.update(&db_tx).await?)
        })
    }

    /// Deletes a card, refusing with a conflict while expenses reference it.
    ///
    /// The storage layer would cascade here; the application refuses instead
    /// so no expense is ever silently dropped.
    pub async fn delete_card(&self, card_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            cards::Entity::find_by_id(card_id)
                .one(&db_tx)
                .await?
                .ok_or(EngineError::NotFound(EntityKind::Card))?;

            if count_references(&db_tx, card_id, EntityKind::Card).await? > 0 {
                return Err(EngineError::HasExpenses(EntityKind::Card));
            }

            cards::Entity::delete_by_id(card_id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
