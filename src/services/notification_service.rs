use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tokio::sync::broadcast;

use crate::models::dto::{FeedEntry, FeedSource, NotificationEvent};
use crate::models::{notifications, updates};

/// Nombre max d'entrées renvoyées par le flux.
pub const FEED_LIMIT: usize = 100;
const CHANNEL_CAPACITY: usize = 256;

/// Relais de notifications: chaque événement est écrit en base puis publié
/// sur un canal broadcast consommé par le flux SSE. Best-effort: pas
/// d'accusé de réception, pas de retry.
#[derive(Clone)]
pub struct NotificationService {
    events: broadcast::Sender<NotificationEvent>,
}

impl NotificationService {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    /// Notification personnelle: insérée puis poussée aux abonnés SSE.
    pub async fn notify_user(
        &self,
        db: &DatabaseConnection,
        email: &str,
        message: &str,
    ) -> Result<notifications::Model, DbErr> {
        let saved = notifications::ActiveModel {
            email: Set(email.to_string()),
            message: Set(message.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        // zéro abonné ou abonné en retard: pas une erreur
        let _ = self.events.send(NotificationEvent {
            email: Some(saved.email.clone()),
            message: saved.message.clone(),
            date: saved.created_at,
        });

        Ok(saved)
    }

    /// Annonce globale: stockée dans updates puis diffusée à tous les abonnés.
    pub async fn broadcast_update(
        &self,
        db: &DatabaseConnection,
        message: &str,
    ) -> Result<updates::Model, DbErr> {
        let saved = updates::ActiveModel {
            message: Set(message.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let _ = self.events.send(NotificationEvent {
            email: None,
            message: saved.message.clone(),
            date: saved.created_at,
        });

        Ok(saved)
    }

    /// Flux d'un utilisateur: ses notifications personnelles fusionnées avec
    /// les annonces globales, du plus récent au plus ancien, plafonné à
    /// FEED_LIMIT entrées.
    pub async fn feed_for(
        &self,
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Vec<FeedEntry>, DbErr> {
        let personal = notifications::Entity::find()
            .filter(notifications::Column::Email.eq(email))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(FEED_LIMIT as u64)
            .all(db)
            .await?;

        let broadcasts = updates::Entity::find()
            .order_by_desc(updates::Column::CreatedAt)
            .limit(FEED_LIMIT as u64)
            .all(db)
            .await?;

        Ok(merge_feed(personal, broadcasts))
    }

    /// Efface les notifications personnelles d'un utilisateur.
    pub async fn clear_for(&self, db: &DatabaseConnection, email: &str) -> Result<u64, DbErr> {
        let result = notifications::Entity::delete_many()
            .filter(notifications::Column::Email.eq(email))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Fusionne notifications personnelles et annonces globales en un seul flux
/// trié par date décroissante, tronqué à FEED_LIMIT.
fn merge_feed(
    personal: Vec<notifications::Model>,
    broadcasts: Vec<updates::Model>,
) -> Vec<FeedEntry> {
    let mut feed: Vec<FeedEntry> = personal
        .into_iter()
        .map(|n| FeedEntry {
            message: n.message,
            date: n.created_at,
            source: FeedSource::Personal,
        })
        .chain(broadcasts.into_iter().map(|u| FeedEntry {
            message: u.message,
            date: u.created_at,
            source: FeedSource::Broadcast,
        }))
        .collect();

    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(FEED_LIMIT);
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn personal(id: i32, date: DateTime<Utc>) -> notifications::Model {
        notifications::Model {
            id,
            email: "ada@example.com".to_string(),
            message: format!("personal {}", id),
            created_at: date,
        }
    }

    fn broadcast(id: i32, date: DateTime<Utc>) -> updates::Model {
        updates::Model {
            id,
            message: format!("broadcast {}", id),
            created_at: date,
        }
    }

    #[test]
    fn test_merge_sorts_by_recency() {
        let base = Utc::now();
        let feed = merge_feed(
            vec![
                personal(1, base - Duration::minutes(10)),
                personal(2, base),
            ],
            vec![broadcast(1, base - Duration::minutes(5))],
        );

        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].message, "personal 2");
        assert_eq!(feed[1].message, "broadcast 1");
        assert_eq!(feed[2].message, "personal 1");
    }

    #[test]
    fn test_merge_caps_at_limit() {
        let base = Utc::now();
        let personal_rows = (0..80)
            .map(|i| personal(i, base - Duration::minutes(i64::from(i))))
            .collect();
        let broadcast_rows = (0..80)
            .map(|i| broadcast(i, base - Duration::minutes(i64::from(i)) - Duration::seconds(30)))
            .collect();

        let feed = merge_feed(personal_rows, broadcast_rows);
        assert_eq!(feed.len(), FEED_LIMIT);
        // les entrées gardées sont bien les plus récentes
        assert_eq!(feed[0].message, "personal 0");
        assert_eq!(feed[1].message, "broadcast 0");
    }

    #[test]
    fn test_merge_empty_inputs() {
        assert!(merge_feed(vec![], vec![]).is_empty());
    }
}
