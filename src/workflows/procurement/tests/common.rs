use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::procurement::coordinator::Intent;
use crate::workflows::procurement::domain::{
    Actor, History, MechanismKind, Opportunity, OpportunityId, OrganizationId, PanelMember,
    Proposal, ProposalId, Question, Role, ScoreWeights, StageScores, UserId,
};
use crate::workflows::procurement::evaluation::{
    ConsensusEvaluation, EvaluationStatus, IndividualEvaluation, QuestionScore,
};
use crate::workflows::procurement::mechanisms::{
    CwuOpportunityStatus, CwuProposalStatus, Mechanism, SwuOpportunityStatus, SwuProposalStatus,
    TwuOpportunityStatus, TwuProposalStatus,
};
use crate::workflows::procurement::store::{
    DispatchError, EntityStore, IntentDispatcher, PermissionOracle, StoreError,
};

pub(super) fn ts(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn deadline() -> DateTime<Utc> {
    ts(2024, 6, 3, 16)
}

pub(super) fn assignment() -> DateTime<Utc> {
    ts(2024, 6, 21, 16)
}

pub(super) fn before_deadline() -> DateTime<Utc> {
    ts(2024, 5, 30, 12)
}

pub(super) fn after_deadline() -> DateTime<Utc> {
    ts(2024, 6, 4, 9)
}

pub(super) fn admin() -> Actor {
    Actor {
        user: UserId("gov-admin".to_string()),
        role: Role::Admin,
    }
}

pub(super) fn reviewer() -> Actor {
    Actor {
        user: UserId("gov-reviewer".to_string()),
        role: Role::Reviewer,
    }
}

pub(super) fn proponent() -> Actor {
    Actor {
        user: UserId("vendor-1".to_string()),
        role: Role::Proponent,
    }
}

pub(super) fn chair() -> Actor {
    Actor {
        user: UserId("panel-chair".to_string()),
        role: Role::Chair,
    }
}

pub(super) fn evaluator(index: u32) -> Actor {
    Actor {
        user: UserId(format!("panel-eval-{index}")),
        role: Role::Evaluator,
    }
}

pub(super) fn panel() -> Vec<PanelMember> {
    vec![
        PanelMember {
            user: chair().user,
            evaluator: false,
            chair: true,
            order: 0,
        },
        PanelMember {
            user: evaluator(1).user,
            evaluator: true,
            chair: false,
            order: 1,
        },
        PanelMember {
            user: evaluator(2).user,
            evaluator: true,
            chair: false,
            order: 2,
        },
    ]
}

pub(super) fn questions() -> Vec<Question> {
    vec![
        Question {
            order: 0,
            max_score: 10.0,
        },
        Question {
            order: 1,
            max_score: 10.0,
        },
    ]
}

/// Score sheet aligned to `questions()`, one entry per question.
pub(super) fn sheet(scores: &[f64]) -> Vec<QuestionScore> {
    scores
        .iter()
        .enumerate()
        .map(|(order, score)| QuestionScore {
            order: order as u32,
            score: *score,
            notes: String::new(),
        })
        .collect()
}

pub(super) fn cwu_weights() -> ScoreWeights {
    ScoreWeights {
        questions: 100,
        challenge: 0,
        scenario: 0,
        price: 0,
    }
}

pub(super) fn swu_weights() -> ScoreWeights {
    ScoreWeights {
        questions: 30,
        challenge: 20,
        scenario: 20,
        price: 30,
    }
}

pub(super) fn twu_weights() -> ScoreWeights {
    ScoreWeights {
        questions: 40,
        challenge: 40,
        scenario: 0,
        price: 20,
    }
}

pub(super) fn cwu_opportunity(status: CwuOpportunityStatus) -> Opportunity<CwuOpportunityStatus> {
    Opportunity {
        id: OpportunityId("opp-cwu-1".to_string()),
        mechanism: MechanismKind::CodeWithUs,
        title: "Fix accessibility defects".to_string(),
        created_by: UserId("gov-author".to_string()),
        status,
        proposal_deadline: deadline(),
        assignment_date: assignment(),
        weights: cwu_weights(),
        questions: Vec::new(),
        panel: Vec::new(),
        history: History::new(),
    }
}

pub(super) fn swu_opportunity(status: SwuOpportunityStatus) -> Opportunity<SwuOpportunityStatus> {
    Opportunity {
        id: OpportunityId("opp-swu-1".to_string()),
        mechanism: MechanismKind::SprintWithUs,
        title: "Build a permitting service".to_string(),
        created_by: UserId("gov-author".to_string()),
        status,
        proposal_deadline: deadline(),
        assignment_date: assignment(),
        weights: swu_weights(),
        questions: questions(),
        panel: panel(),
        history: History::new(),
    }
}

pub(super) fn twu_opportunity(status: TwuOpportunityStatus) -> Opportunity<TwuOpportunityStatus> {
    Opportunity {
        id: OpportunityId("opp-twu-1".to_string()),
        mechanism: MechanismKind::TeamWithUs,
        title: "Augment the data team".to_string(),
        created_by: UserId("gov-author".to_string()),
        status,
        proposal_deadline: deadline(),
        assignment_date: assignment(),
        weights: twu_weights(),
        questions: questions(),
        panel: panel(),
        history: History::new(),
    }
}

pub(super) fn cwu_proposal(status: CwuProposalStatus) -> Proposal<CwuProposalStatus> {
    Proposal {
        id: ProposalId("prop-cwu-1".to_string()),
        opportunity: OpportunityId("opp-cwu-1".to_string()),
        organization: None,
        created_by: proponent().user,
        status,
        submitted_at: None,
        bid: Some(48_000.0),
        scores: StageScores::default(),
        history: History::new(),
    }
}

pub(super) fn swu_proposal(status: SwuProposalStatus) -> Proposal<SwuProposalStatus> {
    Proposal {
        id: ProposalId("prop-swu-1".to_string()),
        opportunity: OpportunityId("opp-swu-1".to_string()),
        organization: Some(OrganizationId("org-vendor-1".to_string())),
        created_by: proponent().user,
        status,
        submitted_at: None,
        bid: Some(250_000.0),
        scores: StageScores::default(),
        history: History::new(),
    }
}

pub(super) fn twu_proposal(status: TwuProposalStatus) -> Proposal<TwuProposalStatus> {
    Proposal {
        id: ProposalId("prop-twu-1".to_string()),
        opportunity: OpportunityId("opp-twu-1".to_string()),
        organization: Some(OrganizationId("org-vendor-1".to_string())),
        created_by: proponent().user,
        status,
        submitted_at: None,
        bid: Some(180_000.0),
        scores: StageScores::default(),
        history: History::new(),
    }
}

pub(super) fn individual_evaluation(
    evaluator: &Actor,
    proposal: &ProposalId,
    scores: &[f64],
) -> IndividualEvaluation {
    IndividualEvaluation {
        proposal: proposal.clone(),
        evaluator: evaluator.user.clone(),
        status: EvaluationStatus::Submitted,
        scores: sheet(scores),
        created_at: after_deadline(),
    }
}

/// In-memory entity store backing the service tests.
pub(super) struct MemoryStore<M: Mechanism> {
    pub(super) opportunities: Mutex<HashMap<OpportunityId, Opportunity<M::OpportunityStatus>>>,
    pub(super) proposals: Mutex<HashMap<ProposalId, Proposal<M::ProposalStatus>>>,
    pub(super) evaluations: Mutex<Vec<IndividualEvaluation>>,
    pub(super) consensuses: Mutex<HashMap<ProposalId, ConsensusEvaluation>>,
}

impl<M: Mechanism> Default for MemoryStore<M> {
    fn default() -> Self {
        Self {
            opportunities: Mutex::new(HashMap::new()),
            proposals: Mutex::new(HashMap::new()),
            evaluations: Mutex::new(Vec::new()),
            consensuses: Mutex::new(HashMap::new()),
        }
    }
}

impl<M: Mechanism> MemoryStore<M> {
    pub(super) fn seed_opportunity(&self, opportunity: Opportunity<M::OpportunityStatus>) {
        self.opportunities
            .lock()
            .expect("store mutex poisoned")
            .insert(opportunity.id.clone(), opportunity);
    }

    pub(super) fn seed_proposal(&self, proposal: Proposal<M::ProposalStatus>) {
        self.proposals
            .lock()
            .expect("store mutex poisoned")
            .insert(proposal.id.clone(), proposal);
    }
}

impl<M: Mechanism> EntityStore<M> for MemoryStore<M>
where
    M::OpportunityStatus: Send + Sync,
    M::ProposalStatus: Send + Sync,
{
    fn opportunity(
        &self,
        id: &OpportunityId,
    ) -> Result<Option<Opportunity<M::OpportunityStatus>>, StoreError> {
        Ok(self
            .opportunities
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn proposal(
        &self,
        id: &ProposalId,
    ) -> Result<Option<Proposal<M::ProposalStatus>>, StoreError> {
        Ok(self
            .proposals
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn proposals_for(
        &self,
        opportunity: &OpportunityId,
    ) -> Result<Vec<Proposal<M::ProposalStatus>>, StoreError> {
        Ok(self
            .proposals
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|proposal| proposal.opportunity == *opportunity)
            .cloned()
            .collect())
    }

    fn evaluations_for(
        &self,
        proposal: &ProposalId,
    ) -> Result<Vec<IndividualEvaluation>, StoreError> {
        Ok(self
            .evaluations
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .filter(|evaluation| evaluation.proposal == *proposal)
            .cloned()
            .collect())
    }

    fn consensus_for(
        &self,
        proposal: &ProposalId,
    ) -> Result<Option<ConsensusEvaluation>, StoreError> {
        Ok(self
            .consensuses
            .lock()
            .expect("store mutex poisoned")
            .get(proposal)
            .cloned())
    }

    fn save_opportunity(
        &self,
        opportunity: Opportunity<M::OpportunityStatus>,
    ) -> Result<(), StoreError> {
        self.opportunities
            .lock()
            .expect("store mutex poisoned")
            .insert(opportunity.id.clone(), opportunity);
        Ok(())
    }

    fn save_proposal(&self, proposal: Proposal<M::ProposalStatus>) -> Result<(), StoreError> {
        self.proposals
            .lock()
            .expect("store mutex poisoned")
            .insert(proposal.id.clone(), proposal);
        Ok(())
    }

    fn save_evaluation(&self, evaluation: IndividualEvaluation) -> Result<(), StoreError> {
        self.evaluations
            .lock()
            .expect("store mutex poisoned")
            .push(evaluation);
        Ok(())
    }

    fn save_consensus(&self, consensus: ConsensusEvaluation) -> Result<(), StoreError> {
        self.consensuses
            .lock()
            .expect("store mutex poisoned")
            .insert(consensus.proposal.clone(), consensus);
        Ok(())
    }
}

/// Static user-to-role mapping standing in for the permission oracle.
#[derive(Default)]
pub(super) struct RoleMap {
    roles: HashMap<UserId, Role>,
}

impl RoleMap {
    pub(super) fn with(actors: &[Actor]) -> Self {
        let mut roles = HashMap::new();
        for actor in actors {
            roles.insert(actor.user.clone(), actor.role);
        }
        Self { roles }
    }
}

impl<M: Mechanism> PermissionOracle<M> for RoleMap {
    fn role_of(&self, user: &UserId, _opportunity: &Opportunity<M::OpportunityStatus>) -> Role {
        self.roles.get(user).copied().unwrap_or(Role::Proponent)
    }
}

/// Dispatcher that records intents so tests can assert on them.
#[derive(Default)]
pub(super) struct RecordingDispatcher {
    events: Mutex<Vec<Intent>>,
}

impl RecordingDispatcher {
    pub(super) fn events(&self) -> Vec<Intent> {
        self.events.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl IntentDispatcher for RecordingDispatcher {
    fn dispatch(&self, intent: &Intent) -> Result<(), DispatchError> {
        self.events
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(intent.clone());
        Ok(())
    }
}

pub(super) type SharedStore<M> = Arc<MemoryStore<M>>;
