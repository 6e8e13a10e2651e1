//! Status transition and scoring engine for the three procurement
//! competition mechanisms.
//!
//! The engine is a pure, synchronous decision function: given an entity
//! snapshot, an action, an actor, and a clock reading, it returns the next
//! canonical entity state plus the side effects the caller must carry
//! out. Persistence, HTTP, and notification delivery live behind the
//! narrow traits in [`store`].

pub mod clock;
pub mod coordinator;
pub mod domain;
pub mod evaluation;
pub mod mechanisms;
pub mod policy;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use clock::{ClockFacts, StageClock, TimeGate};
pub use coordinator::{apply, Action, Intent, Outcome, Snapshot, WorkflowError};
pub use domain::{
    ActionTag, Actor, History, HistoryEntry, MechanismKind, Opportunity, OpportunityId,
    OrganizationId, PanelMember, Proposal, ProposalId, Question, Role, ScoreWeights, Stage,
    StageScores, Status, UserId,
};
pub use evaluation::{
    ConsensusError, ConsensusEvaluation, EvaluationStatus, IndividualEvaluation, QuestionScore,
};
pub use mechanisms::{
    CodeWithUs, CwuOpportunityStatus, CwuProposalStatus, Mechanism, SprintWithUs,
    SwuOpportunityStatus, SwuProposalStatus, TeamWithUs, TwuOpportunityStatus, TwuProposalStatus,
};
pub use policy::{RuleSource, TransitionError, TransitionPolicy, TransitionRule};
pub use scoring::{
    can_be_awarded, compute_total, price_score, proposal_total, questions_percentage,
    rank_proposals, ProposalBid, RankedProposal, TotalScore,
};
pub use service::{ActionRequest, ProcurementService, ServiceError};
pub use store::{DispatchError, EntityStore, IntentDispatcher, PermissionOracle, StoreError};
