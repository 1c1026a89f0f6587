// src/services/quote_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{QuoteFilter, QuoteStore, QuoteWrite, UserDirectory},
    models::{
        auth::Actor,
        quote::{
            ClientQuote, CreateQuotePayload, NamedTransfer, Quote, QuoteStatus, QuoteStatusInfo,
            QuoteTotals, StatusHistoryEntry, TransferHistoryEntry, UpdateQuotePayload,
            QUOTE_STATUS_INFO,
        },
    },
};

const UNKNOWN_USER: &str = "Usuário Desconhecido";

/// Regras de negócio das cotações: permissões, histórico de status e transferências.
#[derive(Clone)]
pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
    users: Arc<dyn UserDirectory>,
}

// Criador da cotação, ou o próprio cliente (o cliente pode ser um usuário do sistema)
fn is_owner(actor: Actor, quote: &Quote) -> bool {
    quote.created_by == actor.id || quote.client_id == actor.id
}

impl QuoteService {
    pub fn new(store: Arc<dyn QuoteStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { store, users }
    }

    // Filtro base de listagem: admin vê tudo, vendedor só o que criou
    fn visible_to(actor: Actor) -> QuoteFilter {
        QuoteFilter {
            created_by: (!actor.is_admin).then_some(actor.id),
            ..Default::default()
        }
    }

    pub async fn check_permissions(&self, actor: Actor, quote_id: Uuid) -> Result<bool, AppError> {
        if actor.is_admin {
            return Ok(true);
        }
        let quote = self.store.find(quote_id).await?;
        Ok(quote.is_some_and(|q| is_owner(actor, &q)))
    }

    // Carrega a cotação e aplica a mesma regra de check_permissions
    async fn load_for(&self, actor: Actor, id: Uuid, denied: &'static str) -> Result<Quote, AppError> {
        let quote = self.store.find(id).await?.ok_or(AppError::QuoteNotFound)?;
        if !actor.is_admin && !is_owner(actor, &quote) {
            tracing::warn!(quote_id = %id, user_id = %actor.id, "{}", denied);
            return Err(AppError::Forbidden(denied));
        }
        Ok(quote)
    }

    pub async fn create(&self, actor: Actor, payload: CreateQuotePayload) -> Result<Quote, AppError> {
        let client_name = payload.client_name.trim().to_string();
        let client_id = match payload.client_id {
            Some(id) if !client_name.is_empty() && !payload.items.is_empty() => id,
            _ => return Err(AppError::MissingRequiredFields),
        };

        let items = payload
            .items
            .into_iter()
            .map(|i| i.into_item())
            .collect::<Result<Vec<_>, _>>()?;
        let totals = QuoteTotals::compute(&items, payload.discount.unwrap_or(Decimal::ZERO))?;
        let status = payload.status.unwrap_or(QuoteStatus::Enviado);
        let now = Utc::now();

        let mut quote = Quote {
            id: Uuid::new_v4(),
            client_id,
            client_name,
            client_email: payload.client_email,
            client_phone: payload.client_phone,
            date: payload.date.unwrap_or(now),
            items,
            subtotal: totals.subtotal,
            discount: totals.discount,
            total: totals.total,
            status,
            status_history: Vec::new(),
            transfer_history: Vec::new(),
            notes: payload.notes,
            created_by: actor.id,
            seller_name: None,
            created_at: now,
            updated_at: now,
            last_updated_by: None,
        };

        self.store.insert(&quote).await?;
        let entry = self.add_status_history(quote.id, status, actor, None).await?;
        quote.status_history.push(entry);

        tracing::info!(quote_id = %quote.id, user_id = %actor.id, "Cotação criada");
        Ok(quote)
    }

    /// Acrescenta uma entrada ao histórico de status, sem tocar no campo `status`.
    pub async fn add_status_history(
        &self,
        quote_id: Uuid,
        status: QuoteStatus,
        actor: Actor,
        notes: Option<String>,
    ) -> Result<StatusHistoryEntry, AppError> {
        let entry = StatusHistoryEntry {
            status,
            date: Utc::now(),
            updated_by: actor.id,
            notes,
        };
        if !self.store.append_status(quote_id, &entry).await? {
            return Err(AppError::QuoteNotFound);
        }
        Ok(entry)
    }

    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        changes: UpdateQuotePayload,
    ) -> Result<Quote, AppError> {
        let current = self
            .load_for(actor, id, "Sem permissão para atualizar esta cotação")
            .await?;

        let now = Utc::now();

        // Mesmo status não é transição: nada vai para o histórico
        let status_entry = match changes.status {
            Some(next) if next != current.status => {
                if !current.status.can_transition_to(next) {
                    return Err(AppError::InvalidStatusTransition {
                        from: current.status,
                        to: next,
                    });
                }
                Some(StatusHistoryEntry {
                    status: next,
                    date: now,
                    updated_by: actor.id,
                    notes: changes.status_notes.clone(),
                })
            }
            _ => None,
        };

        let items = match changes.items {
            Some(items) if items.is_empty() => return Err(AppError::MissingRequiredFields),
            Some(items) => items
                .into_iter()
                .map(|i| i.into_item())
                .collect::<Result<Vec<_>, _>>()?,
            None => current.items.clone(),
        };
        let totals = QuoteTotals::compute(&items, changes.discount.unwrap_or(current.discount))?;

        let client_name = match changes.client_name {
            Some(name) if name.trim().is_empty() => return Err(AppError::MissingRequiredFields),
            Some(name) => name.trim().to_string(),
            None => current.client_name.clone(),
        };

        let write = QuoteWrite {
            client_id: changes.client_id.unwrap_or(current.client_id),
            client_name,
            client_email: changes
                .client_email
                .unwrap_or_else(|| current.client_email.clone()),
            client_phone: changes
                .client_phone
                .unwrap_or_else(|| current.client_phone.clone()),
            date: changes.date.unwrap_or(current.date),
            items,
            subtotal: totals.subtotal,
            discount: totals.discount,
            total: totals.total,
            status: status_entry.as_ref().map_or(current.status, |e| e.status),
            notes: changes.notes.unwrap_or_else(|| current.notes.clone()),
            updated_at: now,
            last_updated_by: actor.id,
            status_entry,
        };

        let updated = self
            .store
            .update(id, current.status, &write)
            .await?
            .ok_or(AppError::StatusConflict)?;

        if updated.status != current.status {
            tracing::info!(
                quote_id = %id,
                from = %current.status,
                to = %updated.status,
                "Status da cotação alterado"
            );
        }
        Ok(updated)
    }

    /// Atalho para o diálogo de troca de status.
    pub async fn change_status(
        &self,
        actor: Actor,
        id: Uuid,
        status: QuoteStatus,
        notes: Option<String>,
    ) -> Result<Quote, AppError> {
        let changes = UpdateQuotePayload {
            status: Some(status),
            status_notes: notes,
            ..Default::default()
        };
        self.update(actor, id, changes).await
    }

    pub async fn delete(&self, actor: Actor, id: Uuid) -> Result<(), AppError> {
        self.load_for(actor, id, "Sem permissão para excluir esta cotação")
            .await?;
        if !self.store.delete(id).await? {
            return Err(AppError::QuoteNotFound);
        }
        tracing::info!(quote_id = %id, user_id = %actor.id, "Cotação excluída");
        Ok(())
    }

    pub async fn get_all(&self, actor: Actor) -> Result<Vec<Quote>, AppError> {
        self.store.list(&Self::visible_to(actor)).await
    }

    pub async fn get_by_id(&self, actor: Actor, id: Uuid) -> Result<Option<Quote>, AppError> {
        let mut quote = match self
            .load_for(actor, id, "Sem permissão para visualizar esta cotação")
            .await
        {
            Ok(quote) => quote,
            Err(AppError::QuoteNotFound) => return Ok(None),
            Err(e) => return Err(e),
        };

        if actor.is_admin {
            let names = self.users.user_names(&[quote.created_by]).await?;
            quote.seller_name = Some(
                names
                    .get(&quote.created_by)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_USER.to_string()),
            );
        }
        Ok(Some(quote))
    }

    pub async fn get_by_status(&self, actor: Actor, status: QuoteStatus) -> Result<Vec<Quote>, AppError> {
        let filter = QuoteFilter {
            status: Some(status),
            ..Self::visible_to(actor)
        };
        self.store.list(&filter).await
    }

    pub async fn get_by_client(&self, actor: Actor, client_id: Uuid) -> Result<Vec<Quote>, AppError> {
        let filter = QuoteFilter {
            client_id: Some(client_id),
            ..Self::visible_to(actor)
        };
        self.store.list(&filter).await
    }

    /// Cotações do cliente com nomes do vendedor e das transferências, da mais recente para a mais antiga.
    pub async fn get_client_history(
        &self,
        actor: Actor,
        client_id: Uuid,
    ) -> Result<Vec<ClientQuote>, AppError> {
        let mut quotes = self.get_by_client(actor, client_id).await?;
        quotes.sort_by(|a, b| b.date.cmp(&a.date));

        let mut ids: Vec<Uuid> = quotes
            .iter()
            .flat_map(|q| {
                std::iter::once(q.created_by).chain(
                    q.transfer_history
                        .iter()
                        .flat_map(|t| [t.from_user_id, t.to_user_id]),
                )
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let names = self.users.user_names(&ids).await?;
        let name_of = |id: &Uuid| {
            names
                .get(id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_USER.to_string())
        };

        Ok(quotes
            .into_iter()
            .map(|quote| {
                let transfers = quote
                    .transfer_history
                    .iter()
                    .map(|entry| NamedTransfer {
                        entry: entry.clone(),
                        from_user_name: name_of(&entry.from_user_id),
                        to_user_name: name_of(&entry.to_user_id),
                    })
                    .collect();
                ClientQuote {
                    created_by_name: name_of(&quote.created_by),
                    transfers,
                    quote,
                }
            })
            .collect())
    }

    /// Registra a passagem da cotação para outro vendedor. `created_by` não muda.
    pub async fn transfer_quote(
        &self,
        actor: Actor,
        id: Uuid,
        to_user_id: Uuid,
    ) -> Result<Quote, AppError> {
        self.load_for(actor, id, "Sem permissão para transferir esta cotação")
            .await?;

        if to_user_id == actor.id || !self.users.user_exists(to_user_id).await? {
            return Err(AppError::InvalidTransferTarget);
        }

        let entry = TransferHistoryEntry {
            from_user_id: actor.id,
            to_user_id,
            date: Utc::now(),
            transferred_by: actor.id,
        };

        let quote = self
            .store
            .append_transfer(id, &entry)
            .await?
            .ok_or(AppError::QuoteNotFound)?;

        tracing::info!(quote_id = %id, from = %actor.id, to = %to_user_id, "Cotação transferida");
        Ok(quote)
    }

    pub async fn get_transferred_quotes(&self, actor: Actor) -> Result<Vec<Quote>, AppError> {
        let filter = QuoteFilter {
            transferred_only: true,
            transfer_party: (!actor.is_admin).then_some(actor.id),
            ..Default::default()
        };
        let mut quotes = self.store.list(&filter).await?;
        quotes.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(quotes)
    }

    pub fn status_info(&self) -> &'static [QuoteStatusInfo] {
        &QUOTE_STATUS_INFO
    }

    // Usado pelas estatísticas: todas as cotações de um vendedor, ou de todos
    pub(crate) async fn quotes_of(&self, user_id: Option<Uuid>) -> Result<Vec<Quote>, AppError> {
        self.store
            .list(&QuoteFilter {
                created_by: user_id,
                ..Default::default()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::memory::MemoryStore, models::quote::QuoteItemInput};
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(quantity: &str, unit_price: &str) -> QuoteItemInput {
        QuoteItemInput {
            product_id: Uuid::new_v4(),
            product_name: "Rolamento 6204".into(),
            quantity: dec(quantity),
            unit_price: dec(unit_price),
        }
    }

    fn payload(client_id: Uuid) -> CreateQuotePayload {
        CreateQuotePayload {
            client_id: Some(client_id),
            client_name: "Metalúrgica Silva".into(),
            client_email: None,
            client_phone: None,
            date: None,
            items: vec![item("2", "45.90"), item("1", "10")],
            discount: Some(dec("1.80")),
            status: None,
            notes: None,
        }
    }

    async fn setup() -> (Arc<MemoryStore>, QuoteService, Actor) {
        let store = Arc::new(MemoryStore::default());
        let seller = Actor::seller(store.add_user("Ana").await);
        let service = QuoteService::new(store.clone(), store.clone());
        (store, service, seller)
    }

    #[tokio::test]
    async fn create_recomputes_totals_and_records_initial_status() {
        let (store, service, seller) = setup().await;

        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();

        assert_eq!(quote.items[0].total, dec("91.80"));
        assert_eq!(quote.subtotal, dec("101.80"));
        assert_eq!(quote.total, dec("100.00"));
        assert_eq!(quote.status, QuoteStatus::Enviado);
        assert_eq!(quote.created_by, seller.id);

        let stored = store.find(quote.id).await.unwrap().unwrap();
        assert_eq!(stored.status_history.len(), 1);
        assert_eq!(stored.status_history[0].status, QuoteStatus::Enviado);
        assert_eq!(stored.status_history[0].updated_by, seller.id);
    }

    #[tokio::test]
    async fn create_requires_client_and_items() {
        let (_, service, seller) = setup().await;

        let mut no_items = payload(Uuid::new_v4());
        no_items.items.clear();
        let mut no_client = payload(Uuid::new_v4());
        no_client.client_id = None;
        let mut blank_name = payload(Uuid::new_v4());
        blank_name.client_name = "   ".into();

        for p in [no_items, no_client, blank_name] {
            assert!(matches!(
                service.create(seller, p).await,
                Err(AppError::MissingRequiredFields)
            ));
        }
    }

    #[tokio::test]
    async fn create_rejects_discount_above_subtotal() {
        let (_, service, seller) = setup().await;
        let mut p = payload(Uuid::new_v4());
        p.discount = Some(dec("500"));

        assert!(matches!(service.create(seller, p).await, Err(AppError::InvalidDiscount)));
    }

    #[tokio::test]
    async fn permissions_follow_creator_client_and_admin() {
        let (store, service, seller) = setup().await;
        let client_user = Uuid::new_v4();
        let quote = service.create(seller, payload(client_user)).await.unwrap();
        let other = Actor::seller(store.add_user("Bruno").await);

        assert!(service.check_permissions(seller, quote.id).await.unwrap());
        assert!(service.check_permissions(Actor::seller(client_user), quote.id).await.unwrap());
        assert!(!service.check_permissions(other, quote.id).await.unwrap());
        assert!(service.check_permissions(Actor::admin(other.id), quote.id).await.unwrap());
        assert!(!service.check_permissions(seller, Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn valid_status_change_appends_one_entry() {
        let (_, service, seller) = setup().await;
        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();

        let updated = service
            .change_status(seller, quote.id, QuoteStatus::Negociacao, Some("Pediu prazo".into()))
            .await
            .unwrap();

        assert_eq!(updated.status, QuoteStatus::Negociacao);
        assert_eq!(updated.status_history.len(), 2);
        let last = updated.status_history.last().unwrap();
        assert_eq!(last.status, QuoteStatus::Negociacao);
        assert_eq!(last.notes.as_deref(), Some("Pediu prazo"));
        assert_eq!(updated.last_updated_by, Some(seller.id));
    }

    #[tokio::test]
    async fn unreachable_status_is_rejected_without_writing() {
        let (store, service, seller) = setup().await;
        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();
        service
            .change_status(seller, quote.id, QuoteStatus::Fechado, None)
            .await
            .unwrap();

        let result = service
            .change_status(seller, quote.id, QuoteStatus::Negociacao, None)
            .await;

        assert!(matches!(
            result,
            Err(AppError::InvalidStatusTransition {
                from: QuoteStatus::Fechado,
                to: QuoteStatus::Negociacao
            })
        ));
        let stored = store.find(quote.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QuoteStatus::Fechado);
        assert_eq!(stored.status_history.len(), 2);
    }

    #[tokio::test]
    async fn same_status_is_not_recorded_as_transition() {
        let (_, service, seller) = setup().await;
        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();

        let updated = service
            .update(
                seller,
                quote.id,
                UpdateQuotePayload {
                    status: Some(QuoteStatus::Enviado),
                    notes: Some(Some("Ligar na segunda".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status_history.len(), 1);
        assert_eq!(updated.notes.as_deref(), Some("Ligar na segunda"));
    }

    #[tokio::test]
    async fn status_write_is_guarded_by_the_status_read() {
        let (store, service, seller) = setup().await;
        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();

        // Lê como "enviado", mas outro usuário já perdeu a cotação antes da escrita
        let current = store.find(quote.id).await.unwrap().unwrap();
        store.force_status(quote.id, QuoteStatus::Perdido).await;
        let write = QuoteWrite {
            client_id: current.client_id,
            client_name: current.client_name.clone(),
            client_email: None,
            client_phone: None,
            date: current.date,
            items: current.items.clone(),
            subtotal: current.subtotal,
            discount: current.discount,
            total: current.total,
            status: QuoteStatus::Negociacao,
            notes: None,
            updated_at: Utc::now(),
            last_updated_by: seller.id,
            status_entry: None,
        };

        assert!(store.update(quote.id, current.status, &write).await.unwrap().is_none());
        assert!(matches!(
            service.change_status(seller, quote.id, QuoteStatus::Fechado, None).await,
            Err(AppError::InvalidStatusTransition { .. })
        ));
    }

    #[tokio::test]
    async fn editing_items_recomputes_totals() {
        let (_, service, seller) = setup().await;
        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();

        let updated = service
            .update(
                seller,
                quote.id,
                UpdateQuotePayload {
                    items: Some(vec![item("4", "2.50")]),
                    discount: Some(dec("1")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].total, dec("10.00"));
        assert_eq!(updated.subtotal, dec("10.00"));
        assert_eq!(updated.total, updated.subtotal - updated.discount);
    }

    #[tokio::test]
    async fn non_owner_cannot_update_or_delete() {
        let (store, service, seller) = setup().await;
        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();
        let other = Actor::seller(store.add_user("Bruno").await);

        assert!(matches!(
            service.change_status(other, quote.id, QuoteStatus::Perdido, None).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(service.delete(other, quote.id).await, Err(AppError::Forbidden(_))));

        service.delete(seller, quote.id).await.unwrap();
        assert!(store.find(quote.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn transfer_appends_entry_and_keeps_creator() {
        let (store, service, seller) = setup().await;
        let target = store.add_user("Carla").await;
        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();

        let transferred = service.transfer_quote(seller, quote.id, target).await.unwrap();

        assert_eq!(transferred.transfer_history.len(), 1);
        let entry = &transferred.transfer_history[0];
        assert_eq!(entry.from_user_id, seller.id);
        assert_eq!(entry.to_user_id, target);
        assert_eq!(entry.transferred_by, seller.id);
        assert_eq!(transferred.created_by, seller.id);
        assert_eq!(transferred.last_updated_by, Some(seller.id));
    }

    #[tokio::test]
    async fn transfer_target_must_exist_and_differ_from_actor() {
        let (_, service, seller) = setup().await;
        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();

        assert!(matches!(
            service.transfer_quote(seller, quote.id, seller.id).await,
            Err(AppError::InvalidTransferTarget)
        ));
        assert!(matches!(
            service.transfer_quote(seller, quote.id, Uuid::new_v4()).await,
            Err(AppError::InvalidTransferTarget)
        ));
    }

    #[tokio::test]
    async fn listings_respect_visibility() {
        let (store, service, seller) = setup().await;
        let other = Actor::seller(store.add_user("Bruno").await);
        let admin = Actor::admin(store.add_user("Admin").await);

        let mine = service.create(seller, payload(Uuid::new_v4())).await.unwrap();
        service.create(other, payload(Uuid::new_v4())).await.unwrap();

        let seller_view = service.get_all(seller).await.unwrap();
        assert_eq!(seller_view.len(), 1);
        assert_eq!(seller_view[0].id, mine.id);
        assert_eq!(service.get_all(admin).await.unwrap().len(), 2);

        assert_eq!(service.get_by_status(seller, QuoteStatus::Enviado).await.unwrap().len(), 1);
        assert!(service.get_by_status(seller, QuoteStatus::Fechado).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_by_id_fills_seller_name_for_admins_only() {
        let (store, service, seller) = setup().await;
        let admin = Actor::admin(store.add_user("Admin").await);
        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();

        let as_admin = service.get_by_id(admin, quote.id).await.unwrap().unwrap();
        assert_eq!(as_admin.seller_name.as_deref(), Some("Ana"));

        let as_seller = service.get_by_id(seller, quote.id).await.unwrap().unwrap();
        assert!(as_seller.seller_name.is_none());

        assert!(service.get_by_id(seller, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn client_history_resolves_names_and_sorts_by_date() {
        let (store, service, seller) = setup().await;
        let admin = Actor::admin(store.add_user("Admin").await);
        let target = store.add_user("Carla").await;
        let client_id = Uuid::new_v4();

        let mut older = payload(client_id);
        older.date = Some(Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap());
        let older = service.create(seller, older).await.unwrap();
        let mut newer = payload(client_id);
        newer.date = Some(older.date + Duration::days(30));
        let newer = service.create(seller, newer).await.unwrap();

        service.transfer_quote(seller, older.id, target).await.unwrap();
        // Vendedor removido do diretório
        store.users.lock().await.remove(&target);

        let history = service.get_client_history(admin, client_id).await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].quote.id, newer.id);
        assert_eq!(history[1].created_by_name, "Ana");
        assert_eq!(history[1].transfers[0].from_user_name, "Ana");
        assert_eq!(history[1].transfers[0].to_user_name, UNKNOWN_USER);
    }

    #[tokio::test]
    async fn transferred_quotes_only_show_involved_users() {
        let (store, service, seller) = setup().await;
        let target = Actor::seller(store.add_user("Carla").await);
        let outsider = Actor::seller(store.add_user("Bruno").await);
        let admin = Actor::admin(store.add_user("Admin").await);

        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();
        service.create(seller, payload(Uuid::new_v4())).await.unwrap();
        service.transfer_quote(seller, quote.id, target.id).await.unwrap();

        assert_eq!(service.get_transferred_quotes(seller).await.unwrap().len(), 1);
        assert_eq!(service.get_transferred_quotes(target).await.unwrap().len(), 1);
        assert!(service.get_transferred_quotes(outsider).await.unwrap().is_empty());
        assert_eq!(service.get_transferred_quotes(admin).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stored_totals_stay_consistent_in_cents() {
        let (store, service, seller) = setup().await;
        let mut p = payload(Uuid::new_v4());
        p.items = vec![item("1.5", "6.67")];
        p.discount = Some(dec("0.004"));

        let quote = service.create(seller, p).await.unwrap();
        let stored = store.find(quote.id).await.unwrap().unwrap();

        assert_eq!(stored.items[0].total, dec("10.01"));
        assert_eq!(stored.subtotal, dec("10.01"));
        assert_eq!(stored.discount, Decimal::ZERO);
        assert_eq!(stored.total, stored.subtotal - stored.discount);
    }

    #[tokio::test]
    async fn oversized_amounts_fail_without_panicking() {
        let (_, service, seller) = setup().await;
        let mut p = payload(Uuid::new_v4());
        p.items = vec![item("79228162514264337593543950335", "2")];

        assert!(matches!(
            service.create(seller, p).await,
            Err(AppError::AmountOutOfRange)
        ));

        let quote = service.create(seller, payload(Uuid::new_v4())).await.unwrap();
        let changes = UpdateQuotePayload {
            items: Some(vec![item("1", "999999999999.995")]),
            ..Default::default()
        };
        assert!(matches!(
            service.update(seller, quote.id, changes).await,
            Err(AppError::AmountOutOfRange)
        ));
    }

    #[tokio::test]
    async fn explicit_null_clears_optional_fields_on_update() {
        let (_, service, seller) = setup().await;
        let mut p = payload(Uuid::new_v4());
        p.client_email = Some("compras@silva.com.br".into());
        p.client_phone = Some("11 99999-0000".into());
        p.notes = Some("Entrega em 10 dias".into());
        let quote = service.create(seller, p).await.unwrap();

        let updated = service
            .update(
                seller,
                quote.id,
                UpdateQuotePayload {
                    client_email: Some(None),
                    notes: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.client_email, None);
        assert_eq!(updated.notes, None);
        assert_eq!(updated.client_phone.as_deref(), Some("11 99999-0000"));
    }
}
