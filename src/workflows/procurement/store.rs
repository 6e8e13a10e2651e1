use super::coordinator::Intent;
use super::domain::{Opportunity, OpportunityId, Proposal, ProposalId, Role, UserId};
use super::evaluation::{ConsensusEvaluation, IndividualEvaluation};
use super::mechanisms::Mechanism;

/// Storage abstraction so the service facade can be exercised in
/// isolation. Write-back happens only after a successful `apply`.
pub trait EntityStore<M: Mechanism>: Send + Sync {
    fn opportunity(
        &self,
        id: &OpportunityId,
    ) -> Result<Option<Opportunity<M::OpportunityStatus>>, StoreError>;
    fn proposal(
        &self,
        id: &ProposalId,
    ) -> Result<Option<Proposal<M::ProposalStatus>>, StoreError>;
    fn proposals_for(
        &self,
        opportunity: &OpportunityId,
    ) -> Result<Vec<Proposal<M::ProposalStatus>>, StoreError>;
    fn evaluations_for(
        &self,
        proposal: &ProposalId,
    ) -> Result<Vec<IndividualEvaluation>, StoreError>;
    fn consensus_for(
        &self,
        proposal: &ProposalId,
    ) -> Result<Option<ConsensusEvaluation>, StoreError>;
    fn save_opportunity(
        &self,
        opportunity: Opportunity<M::OpportunityStatus>,
    ) -> Result<(), StoreError>;
    fn save_proposal(&self, proposal: Proposal<M::ProposalStatus>) -> Result<(), StoreError>;
    fn save_evaluation(&self, evaluation: IndividualEvaluation) -> Result<(), StoreError>;
    fn save_consensus(&self, consensus: ConsensusEvaluation) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Resolves an actor's role for one opportunity. Supplied per call; the
/// engine never queries session state itself.
pub trait PermissionOracle<M: Mechanism>: Send + Sync {
    fn role_of(&self, user: &UserId, opportunity: &Opportunity<M::OpportunityStatus>) -> Role;
}

/// Consumes the intents emitted by the workflow coordinator.
pub trait IntentDispatcher: Send + Sync {
    fn dispatch(&self, intent: &Intent) -> Result<(), DispatchError>;
}

/// Intent dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
