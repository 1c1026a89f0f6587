// src/services/statistics_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format::format_currency},
    db::UserDirectory,
    models::{
        auth::Actor,
        quote::{Quote, QuoteStatus},
        statistics::{QuoteStatistics, StatisticsQuery, StatusBucket},
    },
    services::quote_service::QuoteService,
};

const FALLBACK_USER_NAME: &str = "Usuário";

#[derive(Clone)]
pub struct StatisticsService {
    quotes: QuoteService,
    users: Arc<dyn UserDirectory>,
}

/// Contagem e soma dos totais por status, sempre na ordem de `QuoteStatus::ALL`.
pub fn summarize(quotes: &[Quote], query: &StatisticsQuery) -> (usize, Vec<StatusBucket>) {
    let selected: Vec<&Quote> = quotes.iter().filter(|q| query.contains(q)).collect();

    let buckets = QuoteStatus::ALL
        .iter()
        .map(|&status| {
            let (count, total) = selected
                .iter()
                .filter(|q| q.status == status)
                .fold((0usize, Decimal::ZERO), |(count, total), q| {
                    (count + 1, total.saturating_add(q.total))
                });
            StatusBucket {
                status,
                count,
                total,
                formatted_total: format_currency(total),
            }
        })
        .collect();

    (selected.len(), buckets)
}

impl StatisticsService {
    pub fn new(quotes: QuoteService, users: Arc<dyn UserDirectory>) -> Self {
        Self { quotes, users }
    }

    /// Vendedor só enxerga os próprios números; admin enxerga os de qualquer um.
    pub async fn user_stats(
        &self,
        actor: Actor,
        user_id: Uuid,
        query: StatisticsQuery,
    ) -> Result<QuoteStatistics, AppError> {
        if !actor.is_admin && actor.id != user_id {
            return Err(AppError::AdminRequired);
        }
        query.validate_range()?;

        let names = self.users.user_names(&[user_id]).await?;
        let quotes = self.quotes.quotes_of(Some(user_id)).await?;
        let (quote_count, by_status) = summarize(&quotes, &query);

        Ok(QuoteStatistics {
            user_id: Some(user_id),
            user_name: Some(
                names
                    .get(&user_id)
                    .cloned()
                    .unwrap_or_else(|| FALLBACK_USER_NAME.to_string()),
            ),
            quote_count,
            by_status,
        })
    }

    /// Uma entrada por usuário cadastrado, inclusive quem ainda não tem cotações.
    pub async fn all_users(
        &self,
        actor: Actor,
        query: StatisticsQuery,
    ) -> Result<Vec<QuoteStatistics>, AppError> {
        if !actor.is_admin {
            return Err(AppError::AdminRequired);
        }
        query.validate_range()?;

        let quotes = self.quotes.quotes_of(None).await?;
        let roster = self.users.roster().await?;

        Ok(roster
            .into_iter()
            .map(|(user_id, name)| {
                let own: Vec<Quote> = quotes
                    .iter()
                    .filter(|q| q.created_by == user_id)
                    .cloned()
                    .collect();
                let (quote_count, by_status) = summarize(&own, &query);
                QuoteStatistics {
                    user_id: Some(user_id),
                    user_name: Some(name),
                    quote_count,
                    by_status,
                }
            })
            .collect())
    }

    pub async fn overview(
        &self,
        actor: Actor,
        query: StatisticsQuery,
    ) -> Result<QuoteStatistics, AppError> {
        if !actor.is_admin {
            return Err(AppError::AdminRequired);
        }
        query.validate_range()?;

        let quotes = self.quotes.quotes_of(None).await?;
        let (quote_count, by_status) = summarize(&quotes, &query);

        tracing::debug!(quote_count, "Estatísticas gerais calculadas");
        Ok(QuoteStatistics {
            user_id: None,
            user_name: None,
            quote_count,
            by_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory::MemoryStore,
        models::quote::{CreateQuotePayload, QuoteItemInput},
    };
    use chrono::{TimeZone, Utc};

    async fn seed_quote(
        service: &QuoteService,
        actor: Actor,
        price: i64,
        day: u32,
    ) -> Quote {
        service
            .create(
                actor,
                CreateQuotePayload {
                    client_id: Some(Uuid::new_v4()),
                    client_name: "Cliente".into(),
                    client_email: None,
                    client_phone: None,
                    date: Some(Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap()),
                    items: vec![QuoteItemInput {
                        product_id: Uuid::new_v4(),
                        product_name: "Polia".into(),
                        quantity: Decimal::ONE,
                        unit_price: Decimal::from(price),
                    }],
                    discount: None,
                    status: None,
                    notes: None,
                },
            )
            .await
            .unwrap()
    }

    async fn setup() -> (Arc<MemoryStore>, QuoteService, StatisticsService) {
        let store = Arc::new(MemoryStore::default());
        let quotes = QuoteService::new(store.clone(), store.clone());
        let stats = StatisticsService::new(quotes.clone(), store.clone());
        (store, quotes, stats)
    }

    fn bucket(stats: &QuoteStatistics, status: QuoteStatus) -> &StatusBucket {
        stats.by_status.iter().find(|b| b.status == status).unwrap()
    }

    #[tokio::test]
    async fn user_stats_groups_by_status_within_range() {
        let (store, quotes, stats) = setup().await;
        let seller = Actor::seller(store.add_user("Ana").await);

        let closed = seed_quote(&quotes, seller, 1500, 5).await;
        quotes
            .change_status(seller, closed.id, QuoteStatus::Fechado, None)
            .await
            .unwrap();
        seed_quote(&quotes, seller, 200, 10).await;
        seed_quote(&quotes, seller, 999, 28).await;

        let query = StatisticsQuery {
            start: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2025, 3, 15, 23, 59, 59).unwrap()),
        };
        let result = stats.user_stats(seller, seller.id, query).await.unwrap();

        assert_eq!(result.user_name.as_deref(), Some("Ana"));
        assert_eq!(result.quote_count, 2);
        assert_eq!(bucket(&result, QuoteStatus::Fechado).count, 1);
        assert_eq!(bucket(&result, QuoteStatus::Fechado).formatted_total, "R$ 1.500,00");
        assert_eq!(bucket(&result, QuoteStatus::Enviado).total, Decimal::from(200));
        assert_eq!(bucket(&result, QuoteStatus::Perdido).count, 0);
    }

    #[tokio::test]
    async fn sellers_cannot_read_other_sellers_stats() {
        let (store, _, stats) = setup().await;
        let seller = Actor::seller(store.add_user("Ana").await);
        let other = store.add_user("Bruno").await;

        assert!(matches!(
            stats.user_stats(seller, other, StatisticsQuery::default()).await,
            Err(AppError::AdminRequired)
        ));
        assert!(matches!(
            stats.overview(seller, StatisticsQuery::default()).await,
            Err(AppError::AdminRequired)
        ));
    }

    #[tokio::test]
    async fn all_users_includes_sellers_without_quotes() {
        let (store, quotes, stats) = setup().await;
        let admin = Actor::admin(store.add_user("Admin").await);
        let seller = Actor::seller(store.add_user("Ana").await);
        seed_quote(&quotes, seller, 100, 1).await;

        let result = stats.all_users(admin, StatisticsQuery::default()).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].user_name.as_deref(), Some("Admin"));
        assert_eq!(result[0].quote_count, 0);
        assert_eq!(result[1].quote_count, 1);

        let overview = stats.overview(admin, StatisticsQuery::default()).await.unwrap();
        assert_eq!(overview.quote_count, 1);
        assert!(overview.user_id.is_none());
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let (store, _, stats) = setup().await;
        let admin = Actor::admin(store.add_user("Admin").await);
        let query = StatisticsQuery {
            start: Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
        };

        assert!(matches!(
            stats.overview(admin, query).await,
            Err(AppError::InvalidDateRange)
        ));
    }
}
