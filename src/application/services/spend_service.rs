//! Spend Service - Spend, approve and deny point purchases
//!
//! Spends are applied optimistically: the trait moves and the pool drops as
//! soon as the spend is accepted, and a pending ledger row records what
//! happened. A reviewer later approves the row (nothing else changes) or
//! denies it, which refunds the cost and reverts the trait.
//!
//! Every operation on a character runs under that character's lock. Approve
//! and deny also take the request's lock, always after the character's.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::application::ports::outbound::{PermissionGate, SpendStorePort};
use crate::application::services::handlers::Offer;
use crate::application::services::{KeyGuard, LockRegistry, SpendDispatcher, SpendError};
use crate::domain::entities::{Character, SpendRequest};
use crate::domain::services::RevertOutcome;
use crate::domain::value_objects::{
    Category, CharacterId, ChronicleId, PointPool, SpendOrder, SpendRequestId, UserId,
};

/// Outcome of an accepted spend
#[derive(Debug, Clone, Serialize)]
pub struct SpendReceipt {
    pub request: SpendRequest,
    /// Pool balance after the deduction
    pub balance: i32,
}

/// Outcome of a denial. The refund always happens; the revert may not have.
#[derive(Debug, Clone, Serialize)]
pub struct DenialReceipt {
    pub request: SpendRequest,
    pub refunded: i32,
    pub revert: RevertOutcome,
}

/// Character guard, request guard, and both rows as re-read under them
type LockedRequest<'a> = (
    KeyGuard<'a, CharacterId>,
    KeyGuard<'a, SpendRequestId>,
    SpendRequest,
    Character,
);

pub struct SpendService {
    store: Arc<dyn SpendStorePort>,
    permissions: Arc<dyn PermissionGate>,
    dispatcher: Arc<SpendDispatcher>,
    character_locks: Arc<LockRegistry<CharacterId>>,
    request_locks: LockRegistry<SpendRequestId>,
}

impl SpendService {
    pub fn new(
        store: Arc<dyn SpendStorePort>,
        permissions: Arc<dyn PermissionGate>,
        dispatcher: Arc<SpendDispatcher>,
        character_locks: Arc<LockRegistry<CharacterId>>,
    ) -> Self {
        Self {
            store,
            permissions,
            dispatcher,
            character_locks,
            request_locks: LockRegistry::new(),
        }
    }

    /// Spend points from `pool` on one purchase in `category`
    #[instrument(skip(self, order))]
    pub async fn spend(
        &self,
        character_id: CharacterId,
        requester: UserId,
        pool: PointPool,
        category: &str,
        order: SpendOrder,
    ) -> Result<SpendReceipt, SpendError> {
        let _guard = self.character_locks.acquire(&character_id).await;
        let character = self.load(character_id).await?;

        let (category, handler) = self.dispatcher.dispatch(character.archetype, category)?;
        let quote = handler.quote(&character, pool, category, &order)?;
        let balance = character.balance(pool);
        if quote.cost > balance {
            return Err(SpendError::InsufficientBalance {
                pool,
                cost: quote.cost,
                balance,
            });
        }

        // Mutate a copy; nothing is visible until the store commits both rows
        let mut updated = character.clone();
        let applied = handler.apply(&mut updated, quote.change);
        updated.apply_cost(pool, quote.cost)?;
        check_pools(&updated)?;

        let request = SpendRequest::pending(
            character_id,
            pool,
            category,
            applied,
            quote.cost,
            requester,
        )
        .with_note(order.note.trim());
        self.store.commit_spend(&updated, &request).await?;

        info!(
            request_id = %request.id,
            category = %category,
            trait_name = %request.trait_name,
            cost = request.cost,
            "Spent {} {} on {}",
            request.cost,
            pool,
            request.trait_name
        );
        Ok(SpendReceipt {
            balance: updated.balance(pool),
            request,
        })
    }

    /// Approve a pending request. The spend already happened, so only the
    /// request row changes.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        request_id: SpendRequestId,
        approver: UserId,
    ) -> Result<SpendRequest, SpendError> {
        let (_character_guard, _request_guard, mut request, character) =
            self.lock_request(request_id).await?;
        self.authorize(approver, &character)?;

        request
            .approve(approver)
            .map_err(|closed| SpendError::AlreadyProcessed {
                id: closed.id,
                status: closed.status,
            })?;
        self.store.commit_decision(&character, &request).await?;

        info!(
            character_id = %character.id,
            trait_name = %request.trait_name,
            "Approved spend request"
        );
        Ok(request)
    }

    /// Deny a pending request: refund its cost and revert its trait.
    ///
    /// The request is denied and refunded even when the revert fails; the
    /// failure is returned in the receipt for manual reconciliation.
    #[instrument(skip(self))]
    pub async fn deny(
        &self,
        request_id: SpendRequestId,
        denier: UserId,
    ) -> Result<DenialReceipt, SpendError> {
        let (_character_guard, _request_guard, mut request, character) =
            self.lock_request(request_id).await?;
        self.authorize(denier, &character)?;
        if !request.is_pending() {
            return Err(SpendError::AlreadyProcessed {
                id: request.id,
                status: request.status,
            });
        }

        // A denied flaw takes back the points it granted, which can overdraw
        let mut updated = character.clone();
        updated.credit(request.pool, request.cost)?;

        let revert = match self
            .dispatcher
            .finalizer(character.archetype, request.trait_type.as_str())
        {
            Some(handler) => handler.revert(&mut updated, &request),
            None => RevertOutcome::Failed(format!(
                "No {} handler for trait type {}",
                character.archetype, request.trait_type
            )),
        };
        if let RevertOutcome::Failed(reason) = &revert {
            warn!(
                character_id = %character.id,
                trait_name = %request.trait_name,
                reason = %reason,
                "Denied spend could not be reverted"
            );
        }
        check_pools(&updated)?;

        request
            .deny(denier)
            .map_err(|closed| SpendError::AlreadyProcessed {
                id: closed.id,
                status: closed.status,
            })?;
        self.store.commit_decision(&updated, &request).await?;

        info!(
            character_id = %character.id,
            refunded = request.cost,
            pool = %request.pool,
            "Denied spend request"
        );
        Ok(DenialReceipt {
            refunded: request.cost,
            revert,
            request,
        })
    }

    /// Grant XP earned in play. Awards change the balance only; they are not ledgered.
    #[instrument(skip(self))]
    pub async fn award_xp(
        &self,
        character_id: CharacterId,
        amount: i32,
        actor: UserId,
    ) -> Result<i32, SpendError> {
        if amount <= 0 {
            return Err(SpendError::InvalidAmount(format!(
                "XP awards must be positive, got {}",
                amount
            )));
        }
        let _guard = self.character_locks.acquire(&character_id).await;
        let mut character = self.load(character_id).await?;
        self.authorize(actor, &character)?;

        character.credit(PointPool::Xp, amount)?;
        self.store.save(&character).await?;

        info!(amount, balance = character.xp, "Awarded XP");
        Ok(character.xp)
    }

    pub async fn history(&self, character_id: CharacterId) -> Result<Vec<SpendRequest>, SpendError> {
        Ok(self.store.history(character_id).await?)
    }

    pub async fn pending_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<SpendRequest>, SpendError> {
        Ok(self.store.pending(character_id).await?)
    }

    /// The review queue of one chronicle
    pub async fn pending_for_chronicle(
        &self,
        chronicle: ChronicleId,
    ) -> Result<Vec<SpendRequest>, SpendError> {
        Ok(self.store.pending_for_chronicle(chronicle).await?)
    }

    pub async fn affordable_categories(
        &self,
        character_id: CharacterId,
        pool: PointPool,
    ) -> Result<Vec<Category>, SpendError> {
        let character = self.load(character_id).await?;
        Ok(self.dispatcher.affordable_categories(&character, pool))
    }

    pub async fn offers(
        &self,
        character_id: CharacterId,
        pool: PointPool,
        category: &str,
    ) -> Result<Vec<Offer>, SpendError> {
        let character = self.load(character_id).await?;
        self.dispatcher.offers(&character, pool, category)
    }

    async fn load(&self, character_id: CharacterId) -> Result<Character, SpendError> {
        let character = self
            .store
            .get(character_id)
            .await?
            .ok_or(SpendError::CharacterNotFound(character_id))?;
        check_pools(&character)?;
        Ok(character)
    }

    async fn load_request(&self, request_id: SpendRequestId) -> Result<SpendRequest, SpendError> {
        self.store
            .get_request(request_id)
            .await?
            .ok_or(SpendError::RequestNotFound(request_id))
    }

    /// Take the character lock, then the request lock, and re-read both
    /// under them.
    async fn lock_request(
        &self,
        request_id: SpendRequestId,
    ) -> Result<LockedRequest<'_>, SpendError> {
        let character_id = self.load_request(request_id).await?.character_id;
        let character_guard = self.character_locks.acquire(&character_id).await;
        let request_guard = self.request_locks.acquire(&request_id).await;

        let request = self.load_request(request_id).await?;
        let character = self.load(character_id).await?;
        debug!(status = %request.status, "Locked spend request");
        Ok((character_guard, request_guard, request, character))
    }

    fn authorize(&self, actor: UserId, character: &Character) -> Result<(), SpendError> {
        if self.permissions.can_approve(actor, character) {
            Ok(())
        } else {
            warn!(actor = %actor, character_id = %character.id, "Reviewer outside character's chronicle");
            Err(SpendError::CrossChronicleDenied(character.id))
        }
    }
}

fn check_pools(character: &Character) -> Result<(), SpendError> {
    if character.freebies < 0 || character.xp < 0 {
        error!(
            character_id = %character.id,
            freebies = character.freebies,
            xp = character.xp,
            "Point pool below zero"
        );
        return Err(SpendError::InvariantViolated(format!(
            "character {} has freebies {} and xp {}",
            character.id, character.freebies, character.xp
        )));
    }
    Ok(())
}
