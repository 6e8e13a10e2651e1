use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpportunityId(pub String);

/// Identifier wrapper for proposals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub String);

/// Identifier wrapper for vendor organizations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationId(pub String);

/// Identifier wrapper for users on either side of the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// The three competition mechanisms run by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanismKind {
    CodeWithUs,
    SprintWithUs,
    TeamWithUs,
}

impl MechanismKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CodeWithUs => "Code With Us",
            Self::SprintWithUs => "Sprint With Us",
            Self::TeamWithUs => "Team With Us",
        }
    }
}

/// Role an actor holds with respect to one opportunity, resolved by the
/// caller's permission oracle and supplied per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Author,
    Reviewer,
    Proponent,
    Evaluator,
    Chair,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Reviewer => "reviewer",
            Self::Proponent => "proponent",
            Self::Evaluator => "evaluator",
            Self::Chair => "chair",
            Self::Admin => "admin",
        }
    }
}

/// An authenticated user together with their resolved role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user: UserId,
    pub role: Role,
}

/// Membership record on an opportunity's evaluation panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelMember {
    pub user: UserId,
    pub evaluator: bool,
    pub chair: bool,
    pub order: u32,
}

/// Scoring stages a mechanism may run. Each mechanism declares the ordered
/// subset it actually uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Questions,
    Challenge,
    Scenario,
    Price,
}

impl Stage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Questions => "questions",
            Self::Challenge => "challenge",
            Self::Scenario => "scenario",
            Self::Price => "price",
        }
    }
}

/// Per-stage weights expressed as percentages. The sum must equal 100 for
/// every opportunity status other than Draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub questions: u8,
    pub challenge: u8,
    pub scenario: u8,
    pub price: u8,
}

impl ScoreWeights {
    pub const fn weight(self, stage: Stage) -> u8 {
        match stage {
            Stage::Questions => self.questions,
            Stage::Challenge => self.challenge,
            Stage::Scenario => self.scenario,
            Stage::Price => self.price,
        }
    }

    pub fn total(self) -> u16 {
        self.questions as u16 + self.challenge as u16 + self.scenario as u16 + self.price as u16
    }

    /// First stage carrying weight even though the mechanism never runs it.
    pub fn misallocated(self, stages: &[Stage]) -> Option<Stage> {
        [Stage::Questions, Stage::Challenge, Stage::Scenario, Stage::Price]
            .into_iter()
            .find(|stage| !stages.contains(stage) && self.weight(*stage) > 0)
    }
}

/// Recorded stage scores, absent until the corresponding stage completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageScores {
    pub questions: Option<f64>,
    pub challenge: Option<f64>,
    pub scenario: Option<f64>,
    pub price: Option<f64>,
}

impl StageScores {
    pub const fn get(&self, stage: Stage) -> Option<f64> {
        match stage {
            Stage::Questions => self.questions,
            Stage::Challenge => self.challenge,
            Stage::Scenario => self.scenario,
            Stage::Price => self.price,
        }
    }

    pub fn set(&mut self, stage: Stage, score: f64) {
        match stage {
            Stage::Questions => self.questions = Some(score),
            Stage::Challenge => self.challenge = Some(score),
            Stage::Scenario => self.scenario = Some(score),
            Stage::Price => self.price = Some(score),
        }
    }
}

/// One question on an opportunity's score sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub order: u32,
    pub max_score: f64,
}

/// Tag identifying the action that produced a history entry. Audit trails
/// record the action itself, not merely the resulting status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTag {
    SubmitForReview,
    Publish,
    BeginEvaluation,
    AdvanceEvaluation,
    Suspend,
    Resume,
    Cancel,
    SubmitProposal,
    BeginProposalReview,
    ScreenIn,
    ScoreQuestions,
    SubmitEvaluation,
    CreateConsensus,
    EditConsensus,
    ScoreChallenge,
    ScoreScenario,
    ScorePrice,
    Award,
    NotAward,
    Disqualify,
    Withdraw,
}

impl ActionTag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SubmitForReview => "submit_for_review",
            Self::Publish => "publish",
            Self::BeginEvaluation => "begin_evaluation",
            Self::AdvanceEvaluation => "advance_evaluation",
            Self::Suspend => "suspend",
            Self::Resume => "resume",
            Self::Cancel => "cancel",
            Self::SubmitProposal => "submit_proposal",
            Self::BeginProposalReview => "begin_proposal_review",
            Self::ScreenIn => "screen_in",
            Self::ScoreQuestions => "score_questions",
            Self::SubmitEvaluation => "submit_evaluation",
            Self::CreateConsensus => "create_consensus",
            Self::EditConsensus => "edit_consensus",
            Self::ScoreChallenge => "score_challenge",
            Self::ScoreScenario => "score_scenario",
            Self::ScorePrice => "score_price",
            Self::Award => "award",
            Self::NotAward => "not_award",
            Self::Disqualify => "disqualify",
            Self::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display and comparison surface every mechanism status enum provides.
pub trait Status: Copy + Eq + fmt::Debug {
    fn label(self) -> &'static str;
}

/// One record in an append-only audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry<R> {
    pub created_at: DateTime<Utc>,
    pub created_by: Option<UserId>,
    pub record: R,
    pub note: String,
}

/// Append-only, time-ordered log. No update or delete is exposed, making
/// the immutability invariant structural rather than conventional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History<R> {
    entries: Vec<HistoryEntry<R>>,
}

impl<R> History<R> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// A log starting from its first entry; cannot be out of order.
    pub fn seeded(entry: HistoryEntry<R>) -> Self {
        Self { entries: vec![entry] }
    }

    pub fn append(&mut self, entry: HistoryEntry<R>) -> Result<(), HistoryError> {
        if let Some(last) = self.entries.last() {
            if entry.created_at < last.created_at {
                return Err(HistoryError::OutOfOrder);
            }
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[HistoryEntry<R>] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry<R>> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> Default for History<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("history entries must be appended in chronological order")]
    OutOfOrder,
}

/// Status-change record kept in an opportunity's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityRecord<S> {
    pub action: ActionTag,
    pub status: S,
}

/// Status or event record kept in a proposal's history. `status` is the
/// proposal's status as of the entry, whether or not the action changed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord<S> {
    pub action: ActionTag,
    pub status: S,
}

/// A competition opportunity. Mutated only through the workflow
/// coordinator; cancellation is a status, never a deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity<S> {
    pub id: OpportunityId,
    pub mechanism: MechanismKind,
    pub title: String,
    pub created_by: UserId,
    pub status: S,
    pub proposal_deadline: DateTime<Utc>,
    pub assignment_date: DateTime<Utc>,
    pub weights: ScoreWeights,
    pub questions: Vec<Question>,
    pub panel: Vec<PanelMember>,
    pub history: History<OpportunityRecord<S>>,
}

impl<S> Opportunity<S> {
    pub fn chair(&self) -> Option<&PanelMember> {
        self.panel.iter().find(|member| member.chair)
    }

    pub fn evaluators(&self) -> impl Iterator<Item = &PanelMember> {
        self.panel.iter().filter(|member| member.evaluator)
    }
}

/// A vendor proposal against one opportunity. Total score and rank are
/// derived from `scores` and the opportunity weights on demand and never
/// stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal<S> {
    pub id: ProposalId,
    pub opportunity: OpportunityId,
    pub organization: Option<OrganizationId>,
    pub created_by: UserId,
    pub status: S,
    pub submitted_at: Option<DateTime<Utc>>,
    pub bid: Option<f64>,
    pub scores: StageScores,
    pub history: History<ProposalRecord<S>>,
}
