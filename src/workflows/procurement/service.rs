use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::coordinator::{self, Action, Outcome, Snapshot, WorkflowError};
use super::domain::{Actor, OpportunityId, ProposalId, UserId};
use super::mechanisms::Mechanism;
use super::store::{DispatchError, EntityStore, IntentDispatcher, PermissionOracle, StoreError};

/// One caller request: which action, against which entities, by whom.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub action: Action,
    pub opportunity: OpportunityId,
    pub proposal: Option<ProposalId>,
    pub user: UserId,
}

/// Service composing the entity store, permission oracle, and intent
/// dispatcher around the pure workflow coordinator: load a consistent
/// snapshot, decide, persist, then hand the side effects off.
pub struct ProcurementService<M, S, P, D> {
    store: Arc<S>,
    permissions: Arc<P>,
    dispatcher: Arc<D>,
    _mechanism: PhantomData<M>,
}

impl<M, S, P, D> ProcurementService<M, S, P, D>
where
    M: Mechanism,
    S: EntityStore<M> + 'static,
    P: PermissionOracle<M> + 'static,
    D: IntentDispatcher + 'static,
{
    pub fn new(store: Arc<S>, permissions: Arc<P>, dispatcher: Arc<D>) -> Self {
        Self {
            store,
            permissions,
            dispatcher,
            _mechanism: PhantomData,
        }
    }

    pub fn execute(
        &self,
        request: &ActionRequest,
        now: DateTime<Utc>,
    ) -> Result<Outcome<M>, ServiceError> {
        let opportunity = self
            .store
            .opportunity(&request.opportunity)?
            .ok_or(StoreError::NotFound)?;

        let proposal = match &request.proposal {
            Some(id) => Some(self.store.proposal(id)?.ok_or(StoreError::NotFound)?),
            None => None,
        };
        let (evaluations, consensus) = match &request.proposal {
            Some(id) => (
                self.store.evaluations_for(id)?,
                self.store.consensus_for(id)?,
            ),
            None => (Vec::new(), None),
        };

        let role = self.permissions.role_of(&request.user, &opportunity);
        let actor = Actor {
            user: request.user.clone(),
            role,
        };
        let snapshot = Snapshot::<M> {
            opportunity: &opportunity,
            proposal: proposal.as_ref(),
            evaluations: &evaluations,
            consensus: consensus.as_ref(),
        };

        let outcome = coordinator::apply(&request.action, &snapshot, &actor, now).map_err(
            |error| {
                warn!(
                    action = %request.action.tag(),
                    opportunity = %request.opportunity.0,
                    user = %request.user.0,
                    %error,
                    "workflow action rejected"
                );
                error
            },
        )?;

        if let Some(updated) = outcome.opportunity.clone() {
            self.store.save_opportunity(updated)?;
        }
        if let Some(updated) = outcome.proposal.clone() {
            self.store.save_proposal(updated)?;
        }
        if let Some(updated) = outcome.evaluation.clone() {
            self.store.save_evaluation(updated)?;
        }
        if let Some(updated) = outcome.consensus.clone() {
            self.store.save_consensus(updated)?;
        }
        for intent in &outcome.intents {
            self.dispatcher.dispatch(intent)?;
        }

        info!(
            action = %request.action.tag(),
            opportunity = %request.opportunity.0,
            user = %request.user.0,
            intents = outcome.intents.len(),
            "workflow action applied"
        );
        Ok(outcome)
    }
}

/// Error raised by the procurement service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
