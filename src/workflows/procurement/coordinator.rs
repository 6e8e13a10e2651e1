use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::ClockFacts;
use super::domain::{
    ActionTag, Actor, HistoryEntry, HistoryError, Opportunity, OpportunityId, OpportunityRecord,
    Proposal, ProposalId, ProposalRecord, Role, Stage, Status,
};
use super::evaluation::{
    self, ConsensusError, ConsensusEvaluation, EvaluationStatus, IndividualEvaluation,
    QuestionScore,
};
use super::mechanisms::Mechanism;
use super::policy::TransitionError;
use super::scoring::{self, ProposalBid};

type Opp<M> = Opportunity<<M as Mechanism>::OpportunityStatus>;
type Prop<M> = Proposal<<M as Mechanism>::ProposalStatus>;

/// A requested workflow action against one opportunity (and, for most
/// proposal-side actions, one proposal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    SubmitForReview,
    Publish,
    BeginEvaluation,
    AdvanceEvaluation,
    Suspend,
    Resume,
    Cancel { note: String },
    SubmitProposal,
    BeginProposalReview,
    ScreenIn,
    ScoreQuestions { score: f64 },
    SubmitIndividualEvaluation { scores: Vec<QuestionScore> },
    CreateConsensus { scores: Vec<QuestionScore> },
    EditConsensus { scores: Vec<QuestionScore> },
    ScoreChallenge { score: f64 },
    ScoreScenario { score: f64 },
    ScorePrice { bids: Vec<ProposalBid> },
    Award { note: String },
    NotAward,
    Disqualify { note: String },
    Withdraw,
}

impl Action {
    pub fn tag(&self) -> ActionTag {
        match self {
            Action::SubmitForReview => ActionTag::SubmitForReview,
            Action::Publish => ActionTag::Publish,
            Action::BeginEvaluation => ActionTag::BeginEvaluation,
            Action::AdvanceEvaluation => ActionTag::AdvanceEvaluation,
            Action::Suspend => ActionTag::Suspend,
            Action::Resume => ActionTag::Resume,
            Action::Cancel { .. } => ActionTag::Cancel,
            Action::SubmitProposal => ActionTag::SubmitProposal,
            Action::BeginProposalReview => ActionTag::BeginProposalReview,
            Action::ScreenIn => ActionTag::ScreenIn,
            Action::ScoreQuestions { .. } => ActionTag::ScoreQuestions,
            Action::SubmitIndividualEvaluation { .. } => ActionTag::SubmitEvaluation,
            Action::CreateConsensus { .. } => ActionTag::CreateConsensus,
            Action::EditConsensus { .. } => ActionTag::EditConsensus,
            Action::ScoreChallenge { .. } => ActionTag::ScoreChallenge,
            Action::ScoreScenario { .. } => ActionTag::ScoreScenario,
            Action::ScorePrice { .. } => ActionTag::ScorePrice,
            Action::Award { .. } => ActionTag::Award,
            Action::NotAward => ActionTag::NotAward,
            Action::Disqualify { .. } => ActionTag::Disqualify,
            Action::Withdraw => ActionTag::Withdraw,
        }
    }
}

/// Description of a required external effect. Emitted, never executed;
/// dispatch belongs to the notification subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    NotifyOpportunitySubscribers {
        opportunity: OpportunityId,
        event: ActionTag,
    },
    NotifyProponent {
        proposal: ProposalId,
        event: ActionTag,
    },
    NotifyAdmins {
        opportunity: OpportunityId,
        event: ActionTag,
    },
}

/// Consistent read of everything one decision may need. The engine never
/// fetches data itself; the caller supplies the snapshot and owns
/// whatever transactional discipline surrounds it.
pub struct Snapshot<'a, M: Mechanism> {
    pub opportunity: &'a Opp<M>,
    pub proposal: Option<&'a Prop<M>>,
    pub evaluations: &'a [IndividualEvaluation],
    pub consensus: Option<&'a ConsensusEvaluation>,
}

impl<M: Mechanism> Clone for Snapshot<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Mechanism> Copy for Snapshot<'_, M> {}

/// Updated entities plus the side effects the caller must carry out.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<M: Mechanism> {
    pub opportunity: Option<Opp<M>>,
    pub proposal: Option<Prop<M>>,
    pub evaluation: Option<IndividualEvaluation>,
    pub consensus: Option<ConsensusEvaluation>,
    pub intents: Vec<Intent>,
}

impl<M: Mechanism> Outcome<M> {
    fn new() -> Self {
        Self {
            opportunity: None,
            proposal: None,
            evaluation: None,
            consensus: None,
            intents: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Consensus(#[from] ConsensusError),
    #[error("the proposal is missing scores for {} stage(s)", .missing.len())]
    IncompleteScoreSet { missing: Vec<Stage> },
    #[error("scoring weights must sum to 100, got {total}")]
    InvalidWeights { total: u16 },
    #[error("the {} stage carries weight but is never run by this mechanism", .stage.label())]
    MisallocatedWeight { stage: Stage },
    #[error("score {score} for the {} stage must be between 0 and 100", .stage.label())]
    InvalidScore { stage: Stage, score: f64 },
    #[error("this action requires a proposal")]
    ProposalRequired,
    #[error("the opportunity must be in the {required} stage to perform this action")]
    WrongOpportunityStage { required: &'static str },
    #[error("this mechanism does not run a {} stage", .stage.label())]
    StageNotRun { stage: Stage },
    #[error("question scores for this mechanism are entered through the panel consensus")]
    ConsensusRequired,
    #[error("this mechanism does not convene an evaluation panel")]
    PanelNotUsed,
    #[error("an evaluation by this panelist already exists for this proposal")]
    DuplicateEvaluation,
    #[error("a consensus evaluation already exists for this proposal")]
    ConsensusExists,
    #[error("no consensus evaluation exists for this proposal")]
    ConsensusMissing,
    #[error("the proposal is not in the question review stage")]
    ProposalNotUnderReview,
    #[error("price can only be scored once every review stage is complete")]
    PriceStageNotReached,
    #[error("a note explaining the decision is required")]
    NoteRequired,
    #[error("price bids do not include this proposal")]
    UnknownBid,
    #[error("price score requires positive bids")]
    InvalidBids,
    #[error(transparent)]
    History(#[from] HistoryError),
}

fn facts<M: Mechanism>(opportunity: &Opp<M>, now: DateTime<Utc>) -> ClockFacts {
    ClockFacts::resolve(opportunity.proposal_deadline, opportunity.assignment_date, now)
}

fn no_such_transition<S: Status>(from: S, to: &'static str) -> WorkflowError {
    TransitionError::NoSuchTransition {
        from: from.label(),
        to,
    }
    .into()
}

/// Weights must sum to 100, on the stages the mechanism actually runs,
/// before an opportunity may leave Draft or change status thereafter.
fn check_weights<M: Mechanism>(opportunity: &Opp<M>) -> Result<(), WorkflowError> {
    let total = opportunity.weights.total();
    if total != 100 {
        return Err(WorkflowError::InvalidWeights { total });
    }
    if let Some(stage) = opportunity.weights.misallocated(M::stages()) {
        return Err(WorkflowError::MisallocatedWeight { stage });
    }
    Ok(())
}

fn check_score(stage: Stage, score: f64) -> Result<(), WorkflowError> {
    if !(0.0..=100.0).contains(&score) {
        return Err(WorkflowError::InvalidScore { stage, score });
    }
    Ok(())
}

fn require_proposal<'a, M: Mechanism>(
    snapshot: &Snapshot<'a, M>,
) -> Result<&'a Prop<M>, WorkflowError> {
    snapshot.proposal.ok_or(WorkflowError::ProposalRequired)
}

fn require_opportunity_stage<M: Mechanism>(
    opportunity: &Opp<M>,
    required: Option<M::OpportunityStatus>,
    stage: Stage,
) -> Result<(), WorkflowError> {
    let required = required.ok_or(WorkflowError::StageNotRun { stage })?;
    if opportunity.status != required {
        return Err(WorkflowError::WrongOpportunityStage {
            required: required.label(),
        });
    }
    Ok(())
}

fn transition_opportunity<M: Mechanism>(
    opportunity: &Opp<M>,
    to: M::OpportunityStatus,
    tag: ActionTag,
    actor: &Actor,
    now: DateTime<Utc>,
    note: String,
) -> Result<Opp<M>, WorkflowError> {
    M::opportunity_policy().check(opportunity.status, to, actor.role, facts::<M>(opportunity, now))?;
    if to != M::draft_opportunity() {
        check_weights::<M>(opportunity)?;
    }
    let mut next = opportunity.clone();
    next.status = to;
    next.history.append(HistoryEntry {
        created_at: now,
        created_by: Some(actor.user.clone()),
        record: OpportunityRecord { action: tag, status: to },
        note,
    })?;
    Ok(next)
}

fn transition_proposal<M: Mechanism>(
    opportunity: &Opp<M>,
    proposal: &Prop<M>,
    to: M::ProposalStatus,
    tag: ActionTag,
    actor: &Actor,
    now: DateTime<Utc>,
    note: String,
) -> Result<Prop<M>, WorkflowError> {
    M::proposal_policy().check(proposal.status, to, actor.role, facts::<M>(opportunity, now))?;
    let mut next = proposal.clone();
    next.status = to;
    next.history.append(HistoryEntry {
        created_at: now,
        created_by: Some(actor.user.clone()),
        record: ProposalRecord { action: tag, status: to },
        note,
    })?;
    Ok(next)
}

/// Append an event entry without changing the proposal's status.
fn log_proposal_event<M: Mechanism>(
    proposal: &mut Prop<M>,
    tag: ActionTag,
    actor: &Actor,
    now: DateTime<Utc>,
    note: String,
) -> Result<(), WorkflowError> {
    let status = proposal.status;
    proposal.history.append(HistoryEntry {
        created_at: now,
        created_by: Some(actor.user.clone()),
        record: ProposalRecord { action: tag, status },
        note,
    })?;
    Ok(())
}

/// Apply one requested action to a snapshot. Pure and deterministic: the
/// same (snapshot, action, now) triple always yields the same decision,
/// which lets the persistence layer drive optimistic-concurrency retries
/// around it. Exactly one history entry is appended to each mutated
/// entity, tagged with the action rather than just the resulting status.
pub fn apply<M: Mechanism>(
    action: &Action,
    snapshot: &Snapshot<'_, M>,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<Outcome<M>, WorkflowError> {
    let opportunity = snapshot.opportunity;
    let tag = action.tag();
    let mut outcome = Outcome::new();

    match action {
        Action::SubmitForReview => {
            let to = M::under_review_opportunity()
                .ok_or_else(|| no_such_transition(opportunity.status, "under_review"))?;
            outcome.opportunity =
                Some(transition_opportunity::<M>(opportunity, to, tag, actor, now, String::new())?);
            outcome.intents.push(Intent::NotifyAdmins {
                opportunity: opportunity.id.clone(),
                event: tag,
            });
        }
        Action::Publish => {
            outcome.opportunity = Some(transition_opportunity::<M>(
                opportunity,
                M::published(),
                tag,
                actor,
                now,
                String::new(),
            )?);
            outcome.intents.push(Intent::NotifyOpportunitySubscribers {
                opportunity: opportunity.id.clone(),
                event: tag,
            });
        }
        Action::BeginEvaluation => {
            if opportunity.status != M::published() {
                return Err(WorkflowError::WrongOpportunityStage {
                    required: M::published().label(),
                });
            }
            let to = M::next_evaluation_stage(opportunity.status)
                .ok_or_else(|| no_such_transition(opportunity.status, "evaluation"))?;
            outcome.opportunity =
                Some(transition_opportunity::<M>(opportunity, to, tag, actor, now, String::new())?);
        }
        Action::AdvanceEvaluation => {
            if opportunity.status == M::published() {
                return Err(no_such_transition(opportunity.status, "evaluation"));
            }
            let to = M::next_evaluation_stage(opportunity.status)
                .ok_or_else(|| no_such_transition(opportunity.status, "evaluation"))?;
            outcome.opportunity =
                Some(transition_opportunity::<M>(opportunity, to, tag, actor, now, String::new())?);
        }
        Action::Suspend => {
            let to = M::suspended()
                .ok_or_else(|| no_such_transition(opportunity.status, "suspended"))?;
            outcome.opportunity =
                Some(transition_opportunity::<M>(opportunity, to, tag, actor, now, String::new())?);
            outcome.intents.push(Intent::NotifyOpportunitySubscribers {
                opportunity: opportunity.id.clone(),
                event: tag,
            });
        }
        Action::Resume => {
            outcome.opportunity = Some(transition_opportunity::<M>(
                opportunity,
                M::published(),
                tag,
                actor,
                now,
                String::new(),
            )?);
            outcome.intents.push(Intent::NotifyOpportunitySubscribers {
                opportunity: opportunity.id.clone(),
                event: tag,
            });
        }
        Action::Cancel { note } => {
            outcome.opportunity = Some(transition_opportunity::<M>(
                opportunity,
                M::canceled(),
                tag,
                actor,
                now,
                note.clone(),
            )?);
            outcome.intents.push(Intent::NotifyOpportunitySubscribers {
                opportunity: opportunity.id.clone(),
                event: tag,
            });
        }
        Action::SubmitProposal => {
            let proposal = require_proposal(snapshot)?;
            let mut next = transition_proposal::<M>(
                opportunity,
                proposal,
                M::submitted(),
                tag,
                actor,
                now,
                String::new(),
            )?;
            next.submitted_at = Some(now);
            outcome.intents.push(Intent::NotifyProponent {
                proposal: next.id.clone(),
                event: tag,
            });
            outcome.proposal = Some(next);
        }
        Action::BeginProposalReview => {
            let proposal = require_proposal(snapshot)?;
            let review_stage = M::individual_evaluation_stage()
                .or_else(|| M::scoring_stage(Stage::Questions));
            require_opportunity_stage::<M>(opportunity, review_stage, Stage::Questions)?;
            outcome.proposal = Some(transition_proposal::<M>(
                opportunity,
                proposal,
                M::first_review(),
                tag,
                actor,
                now,
                String::new(),
            )?);
        }
        Action::ScreenIn => {
            let proposal = require_proposal(snapshot)?;
            let position = M::review_stages()
                .iter()
                .position(|stage| M::evaluated(*stage) == Some(proposal.status))
                .ok_or_else(|| no_such_transition(proposal.status, "under_review"))?;
            let current_stage = M::review_stages()[position];
            let next_stage = M::review_stages()
                .get(position + 1)
                .copied()
                .ok_or_else(|| no_such_transition(proposal.status, "under_review"))?;
            require_opportunity_stage::<M>(
                opportunity,
                M::scoring_stage(current_stage),
                current_stage,
            )?;
            let to = M::under_review(next_stage)
                .ok_or_else(|| no_such_transition(proposal.status, "under_review"))?;
            outcome.proposal = Some(transition_proposal::<M>(
                opportunity,
                proposal,
                to,
                tag,
                actor,
                now,
                String::new(),
            )?);
        }
        Action::ScoreQuestions { score } => {
            if M::uses_consensus() {
                return Err(WorkflowError::ConsensusRequired);
            }
            let proposal = require_proposal(snapshot)?;
            check_score(Stage::Questions, *score)?;
            require_opportunity_stage::<M>(
                opportunity,
                M::scoring_stage(Stage::Questions),
                Stage::Questions,
            )?;
            let to = M::evaluated(Stage::Questions)
                .ok_or(WorkflowError::StageNotRun { stage: Stage::Questions })?;
            let mut next = transition_proposal::<M>(
                opportunity,
                proposal,
                to,
                tag,
                actor,
                now,
                format!("A questions score of \"{score}\" was entered."),
            )?;
            next.scores.set(Stage::Questions, *score);
            outcome.proposal = Some(next);
        }
        Action::SubmitIndividualEvaluation { scores } => {
            if !M::uses_consensus() {
                return Err(WorkflowError::PanelNotUsed);
            }
            let proposal = require_proposal(snapshot)?;
            require_opportunity_stage::<M>(
                opportunity,
                M::individual_evaluation_stage(),
                Stage::Questions,
            )?;
            if opportunity.chair().is_none() {
                return Err(ConsensusError::NoPanelChair.into());
            }
            let is_panel_evaluator = opportunity
                .evaluators()
                .any(|member| member.user == actor.user);
            if !is_panel_evaluator {
                return Err(TransitionError::RoleNotPermitted { role: actor.role }.into());
            }
            if M::under_review(Stage::Questions) != Some(proposal.status) {
                return Err(WorkflowError::ProposalNotUnderReview);
            }
            evaluation::validate_sheet(scores, &opportunity.questions)?;
            let already_evaluated = snapshot.evaluations.iter().any(|existing| {
                existing.proposal == proposal.id && existing.evaluator == actor.user
            });
            if already_evaluated {
                return Err(WorkflowError::DuplicateEvaluation);
            }
            outcome.evaluation = Some(IndividualEvaluation {
                proposal: proposal.id.clone(),
                evaluator: actor.user.clone(),
                status: EvaluationStatus::Submitted,
                scores: scores.clone(),
                created_at: now,
            });
        }
        Action::CreateConsensus { scores } => {
            if !M::uses_consensus() {
                return Err(WorkflowError::PanelNotUsed);
            }
            let proposal = require_proposal(snapshot)?;
            require_opportunity_stage::<M>(opportunity, M::consensus_stage(), Stage::Questions)?;
            if snapshot.consensus.is_some() {
                return Err(WorkflowError::ConsensusExists);
            }
            let consensus = evaluation::create_consensus(
                &opportunity.panel,
                &actor.user,
                &proposal.id,
                snapshot.evaluations,
                scores.clone(),
                &opportunity.questions,
                now,
            )?;
            let questions_score =
                scoring::questions_percentage(&consensus.scores, &opportunity.questions);
            let to = M::evaluated(Stage::Questions)
                .ok_or(WorkflowError::StageNotRun { stage: Stage::Questions })?;
            let mut next = transition_proposal::<M>(
                opportunity,
                proposal,
                to,
                tag,
                actor,
                now,
                format!("A consensus questions score of \"{questions_score:.2}\" was entered."),
            )?;
            next.scores.set(Stage::Questions, questions_score);
            outcome.proposal = Some(next);
            outcome.consensus = Some(consensus);
        }
        Action::EditConsensus { scores } => {
            if !M::uses_consensus() {
                return Err(WorkflowError::PanelNotUsed);
            }
            let proposal = require_proposal(snapshot)?;
            let current = snapshot.consensus.ok_or(WorkflowError::ConsensusMissing)?;
            let consensus = evaluation::edit_consensus(
                current,
                &opportunity.panel,
                &actor.user,
                scores.clone(),
                &opportunity.questions,
                now,
            )?;
            let questions_score =
                scoring::questions_percentage(&consensus.scores, &opportunity.questions);
            let mut next = proposal.clone();
            next.scores.set(Stage::Questions, questions_score);
            log_proposal_event::<M>(
                &mut next,
                tag,
                actor,
                now,
                format!("The consensus questions score was revised to \"{questions_score:.2}\"."),
            )?;
            outcome.proposal = Some(next);
            outcome.consensus = Some(consensus);
        }
        Action::ScoreChallenge { score } => {
            outcome.proposal = Some(score_review_stage::<M>(
                snapshot,
                Stage::Challenge,
                *score,
                tag,
                actor,
                now,
            )?);
        }
        Action::ScoreScenario { score } => {
            outcome.proposal = Some(score_review_stage::<M>(
                snapshot,
                Stage::Scenario,
                *score,
                tag,
                actor,
                now,
            )?);
        }
        Action::ScorePrice { bids } => {
            if !M::stages().contains(&Stage::Price) {
                return Err(WorkflowError::StageNotRun { stage: Stage::Price });
            }
            if !matches!(actor.role, Role::Reviewer | Role::Admin) {
                return Err(TransitionError::RoleNotPermitted { role: actor.role }.into());
            }
            let proposal = require_proposal(snapshot)?;
            require_opportunity_stage::<M>(opportunity, M::scoring_stage(Stage::Price), Stage::Price)?;
            if proposal.status != M::fully_evaluated() {
                return Err(WorkflowError::PriceStageNotReached);
            }
            let own_bid = bids
                .iter()
                .find(|entry| entry.proposal == proposal.id)
                .map(|entry| entry.bid)
                .ok_or(WorkflowError::UnknownBid)?;
            let price = scoring::price_score(own_bid, bids).ok_or(WorkflowError::InvalidBids)?;
            let mut next = proposal.clone();
            next.scores.set(Stage::Price, price);
            log_proposal_event::<M>(
                &mut next,
                tag,
                actor,
                now,
                format!("A price score of \"{price:.2}\" was calculated."),
            )?;
            outcome.proposal = Some(next);
        }
        Action::Award { note } => {
            let proposal = require_proposal(snapshot)?;
            let next_proposal = transition_proposal::<M>(
                opportunity,
                proposal,
                M::awarded(),
                tag,
                actor,
                now,
                note.clone(),
            )?;
            match scoring::proposal_total::<M>(opportunity, proposal) {
                scoring::TotalScore::Incomplete { missing } => {
                    return Err(WorkflowError::IncompleteScoreSet { missing });
                }
                scoring::TotalScore::Complete(_) => {}
            }
            let next_opportunity = if opportunity.status == M::awarded_opportunity() {
                // Re-award after a post-award disqualification; the
                // opportunity already carries the awarded status.
                None
            } else {
                if opportunity.status != M::award_ready() {
                    return Err(WorkflowError::WrongOpportunityStage {
                        required: M::award_ready().label(),
                    });
                }
                Some(transition_opportunity::<M>(
                    opportunity,
                    M::awarded_opportunity(),
                    tag,
                    actor,
                    now,
                    note.clone(),
                )?)
            };
            outcome.intents.push(Intent::NotifyProponent {
                proposal: next_proposal.id.clone(),
                event: tag,
            });
            outcome.intents.push(Intent::NotifyOpportunitySubscribers {
                opportunity: opportunity.id.clone(),
                event: tag,
            });
            outcome.proposal = Some(next_proposal);
            outcome.opportunity = next_opportunity;
        }
        Action::NotAward => {
            let proposal = require_proposal(snapshot)?;
            let next = transition_proposal::<M>(
                opportunity,
                proposal,
                M::not_awarded(),
                tag,
                actor,
                now,
                String::new(),
            )?;
            outcome.intents.push(Intent::NotifyProponent {
                proposal: next.id.clone(),
                event: tag,
            });
            outcome.proposal = Some(next);
        }
        Action::Disqualify { note } => {
            if note.trim().is_empty() {
                return Err(WorkflowError::NoteRequired);
            }
            let proposal = require_proposal(snapshot)?;
            let next = transition_proposal::<M>(
                opportunity,
                proposal,
                M::disqualified(),
                tag,
                actor,
                now,
                note.clone(),
            )?;
            outcome.intents.push(Intent::NotifyProponent {
                proposal: next.id.clone(),
                event: tag,
            });
            outcome.proposal = Some(next);
        }
        Action::Withdraw => {
            let proposal = require_proposal(snapshot)?;
            let next = transition_proposal::<M>(
                opportunity,
                proposal,
                M::withdrawn(),
                tag,
                actor,
                now,
                String::new(),
            )?;
            outcome.intents.push(Intent::NotifyAdmins {
                opportunity: opportunity.id.clone(),
                event: tag,
            });
            outcome.proposal = Some(next);
        }
    }

    Ok(outcome)
}

/// Shared handler for the challenge and scenario stages: range-check the
/// score, require the matching opportunity stage, then move the proposal
/// from under-review to evaluated and record the score.
fn score_review_stage<M: Mechanism>(
    snapshot: &Snapshot<'_, M>,
    stage: Stage,
    score: f64,
    tag: ActionTag,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<Prop<M>, WorkflowError> {
    if !M::stages().contains(&stage) {
        return Err(WorkflowError::StageNotRun { stage });
    }
    let proposal = require_proposal(snapshot)?;
    check_score(stage, score)?;
    require_opportunity_stage::<M>(snapshot.opportunity, M::scoring_stage(stage), stage)?;
    let to = M::evaluated(stage).ok_or(WorkflowError::StageNotRun { stage })?;
    let mut next = transition_proposal::<M>(
        snapshot.opportunity,
        proposal,
        to,
        tag,
        actor,
        now,
        format!("A {} score of \"{score}\" was entered.", stage.label()),
    )?;
    next.scores.set(stage, score);
    Ok(next)
}
