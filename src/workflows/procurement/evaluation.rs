use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ActionTag, History, HistoryEntry, HistoryError, PanelMember, ProposalId, Question, UserId,
};

/// Lifecycle of an evaluation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Draft,
    Submitted,
}

impl EvaluationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
        }
    }
}

/// One row of a score sheet, aligned to the opportunity's question order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub order: u32,
    pub score: f64,
    pub notes: String,
}

/// One panelist's independent scoring of one proposal. Immutable once
/// submitted except through an explicit edit that preserves history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualEvaluation {
    pub proposal: ProposalId,
    pub evaluator: UserId,
    pub status: EvaluationStatus,
    pub scores: Vec<QuestionScore>,
    pub created_at: DateTime<Utc>,
}

/// Score sheet snapshot kept for every authoring or editing pass, so no
/// consensus value is ever replaced without a record of the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusRecord {
    pub action: ActionTag,
    pub scores: Vec<QuestionScore>,
}

/// The chair-authored reconciliation of the panel's individual
/// evaluations. Once created, these are the scores the aggregator uses
/// for the questions stage; individual evaluations are an input, never a
/// substitute output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusEvaluation {
    pub proposal: ProposalId,
    pub chair: UserId,
    pub status: EvaluationStatus,
    pub scores: Vec<QuestionScore>,
    pub history: History<ConsensusRecord>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsensusError {
    #[error("the evaluation panel has no chair")]
    NoPanelChair,
    #[error("the evaluation panel has no evaluators")]
    EmptyPanel,
    #[error("only the panel chair may author the consensus evaluation")]
    PermissionDenied,
    #[error("individual evaluations are still outstanding for {} panelist(s)", .missing.len())]
    IncompleteEvaluatorSet { missing: Vec<UserId> },
    #[error("score sheet does not align with the opportunity question list")]
    MalformedScoreSheet,
    #[error(transparent)]
    History(#[from] HistoryError),
}

fn chair_of(panel: &[PanelMember]) -> Option<&PanelMember> {
    panel.iter().find(|member| member.chair)
}

/// Panelists whose individual evaluations gate the consensus. The chair
/// authors the consensus rather than being counted within it, unless the
/// chair is also a scoring evaluator.
fn required_evaluators(panel: &[PanelMember]) -> Vec<&UserId> {
    panel
        .iter()
        .filter(|member| member.evaluator)
        .map(|member| &member.user)
        .collect()
}

/// Validate a score sheet against the opportunity's question list: one row
/// per question, matching order, scores within each question's range, and
/// a positive number of available points overall.
pub fn validate_sheet(
    scores: &[QuestionScore],
    questions: &[Question],
) -> Result<(), ConsensusError> {
    if scores.len() != questions.len() || questions.is_empty() {
        return Err(ConsensusError::MalformedScoreSheet);
    }
    for (score, question) in scores.iter().zip(questions) {
        if score.order != question.order || score.score < 0.0 || score.score > question.max_score {
            return Err(ConsensusError::MalformedScoreSheet);
        }
    }
    if questions.iter().map(|question| question.max_score).sum::<f64>() <= 0.0 {
        return Err(ConsensusError::MalformedScoreSheet);
    }
    Ok(())
}

fn check_chair_authority(panel: &[PanelMember], author: &UserId) -> Result<(), ConsensusError> {
    let chair = chair_of(panel).ok_or(ConsensusError::NoPanelChair)?;
    if chair.user != *author {
        return Err(ConsensusError::PermissionDenied);
    }
    Ok(())
}

/// Create the panel consensus for one proposal. Rejected unless every
/// panel evaluator has already submitted an individual evaluation for it.
pub fn create_consensus(
    panel: &[PanelMember],
    author: &UserId,
    proposal: &ProposalId,
    individual: &[IndividualEvaluation],
    scores: Vec<QuestionScore>,
    questions: &[Question],
    now: DateTime<Utc>,
) -> Result<ConsensusEvaluation, ConsensusError> {
    check_chair_authority(panel, author)?;

    let required = required_evaluators(panel);
    if required.is_empty() {
        return Err(ConsensusError::EmptyPanel);
    }
    let missing: Vec<UserId> = required
        .into_iter()
        .filter(|evaluator| {
            !individual.iter().any(|evaluation| {
                evaluation.proposal == *proposal
                    && evaluation.evaluator == **evaluator
                    && evaluation.status == EvaluationStatus::Submitted
            })
        })
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ConsensusError::IncompleteEvaluatorSet { missing });
    }

    validate_sheet(&scores, questions)?;

    let history = History::seeded(HistoryEntry {
        created_at: now,
        created_by: Some(author.clone()),
        record: ConsensusRecord {
            action: ActionTag::CreateConsensus,
            scores: scores.clone(),
        },
        note: String::new(),
    });

    Ok(ConsensusEvaluation {
        proposal: proposal.clone(),
        chair: author.clone(),
        status: EvaluationStatus::Submitted,
        scores,
        history,
    })
}

/// Revise a published consensus. Chair-only; the replacement sheet is
/// appended to history so prior values stay on the record.
pub fn edit_consensus(
    current: &ConsensusEvaluation,
    panel: &[PanelMember],
    author: &UserId,
    scores: Vec<QuestionScore>,
    questions: &[Question],
    now: DateTime<Utc>,
) -> Result<ConsensusEvaluation, ConsensusError> {
    check_chair_authority(panel, author)?;
    validate_sheet(&scores, questions)?;

    let mut next = current.clone();
    next.scores = scores.clone();
    next.history.append(HistoryEntry {
        created_at: now,
        created_by: Some(author.clone()),
        record: ConsensusRecord {
            action: ActionTag::EditConsensus,
            scores,
        },
        note: String::new(),
    })?;
    Ok(next)
}
