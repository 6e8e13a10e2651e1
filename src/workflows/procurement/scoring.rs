use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{Opportunity, Proposal, ProposalId, Question, ScoreWeights, Stage, StageScores};
use super::evaluation::QuestionScore;
use super::mechanisms::Mechanism;

/// Weighted total of a proposal's stage scores. A missing stage makes the
/// total `Incomplete` rather than contributing zero.
#[derive(Debug, Clone, PartialEq)]
pub enum TotalScore {
    Complete(f64),
    Incomplete { missing: Vec<Stage> },
}

impl TotalScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            TotalScore::Complete(total) => Some(*total),
            TotalScore::Incomplete { .. } => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, TotalScore::Complete(_))
    }
}

/// Weighted total over the stages the mechanism runs:
/// Σ(stage score × stage weight / 100).
pub fn compute_total(weights: ScoreWeights, scores: &StageScores, stages: &[Stage]) -> TotalScore {
    let missing: Vec<Stage> = stages
        .iter()
        .copied()
        .filter(|stage| scores.get(*stage).is_none())
        .collect();
    if !missing.is_empty() {
        return TotalScore::Incomplete { missing };
    }

    let total = stages
        .iter()
        .map(|stage| weights.weight(*stage) as f64 * scores.get(*stage).unwrap_or(0.0) / 100.0)
        .sum();
    TotalScore::Complete(total)
}

pub fn proposal_total<M: Mechanism>(
    opportunity: &Opportunity<M::OpportunityStatus>,
    proposal: &Proposal<M::ProposalStatus>,
) -> TotalScore {
    compute_total(opportunity.weights, &proposal.scores, M::stages())
}

/// One proposal's place in the ranking. Excluded proposals carry no rank
/// but keep their last-known total for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProposal {
    pub proposal: ProposalId,
    pub total: TotalScore,
    pub rank: Option<u32>,
}

fn order_totals(a: &TotalScore, b: &TotalScore) -> Ordering {
    match (a, b) {
        (TotalScore::Complete(x), TotalScore::Complete(y)) => {
            y.partial_cmp(x).unwrap_or(Ordering::Equal)
        }
        (TotalScore::Complete(_), TotalScore::Incomplete { .. }) => Ordering::Less,
        (TotalScore::Incomplete { .. }, TotalScore::Complete(_)) => Ordering::Greater,
        (TotalScore::Incomplete { .. }, TotalScore::Incomplete { .. }) => Ordering::Equal,
    }
}

fn totals_tie(a: &TotalScore, b: &TotalScore) -> bool {
    order_totals(a, b) == Ordering::Equal
}

/// Rank proposals descending by total. Equal totals share a rank value;
/// unscored proposals sort last; disqualified and withdrawn proposals are
/// excluded from rank assignment entirely.
pub fn rank_proposals<M: Mechanism>(
    opportunity: &Opportunity<M::OpportunityStatus>,
    proposals: &[Proposal<M::ProposalStatus>],
) -> Vec<RankedProposal> {
    let mut rankable: Vec<(ProposalId, TotalScore)> = Vec::new();
    let mut excluded: Vec<RankedProposal> = Vec::new();

    for proposal in proposals {
        let total = proposal_total::<M>(opportunity, proposal);
        if M::ranking_excluded(proposal.status) {
            excluded.push(RankedProposal {
                proposal: proposal.id.clone(),
                total,
                rank: None,
            });
        } else {
            rankable.push((proposal.id.clone(), total));
        }
    }

    rankable.sort_by(|a, b| order_totals(&a.1, &b.1));

    let mut results: Vec<RankedProposal> = Vec::with_capacity(proposals.len());
    for (index, (id, total)) in rankable.into_iter().enumerate() {
        let rank = match results.last() {
            Some(previous) if totals_tie(&previous.total, &total) => previous.rank,
            _ => Some(index as u32 + 1),
        };
        results.push(RankedProposal {
            proposal: id,
            total,
            rank,
        });
    }

    results.extend(excluded);
    results
}

/// Questions-stage percentage from a consensus (or reviewer) score sheet:
/// Σ awarded / Σ available × 100. The sheet is validated against the
/// question list before this is called, so the denominator is positive.
pub fn questions_percentage(scores: &[QuestionScore], questions: &[Question]) -> f64 {
    let available: f64 = questions.iter().map(|question| question.max_score).sum();
    if available <= 0.0 {
        return 0.0;
    }
    let awarded: f64 = scores.iter().map(|score| score.score).sum();
    awarded / available * 100.0
}

/// A still-competing proposal's total proposed cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalBid {
    pub proposal: ProposalId,
    pub bid: f64,
}

/// Price score: lowest bid across still-competing proposals divided by the
/// proposal's own bid, as a percentage. `None` when no positive bid exists.
pub fn price_score(own_bid: f64, bids: &[ProposalBid]) -> Option<f64> {
    let lowest = bids
        .iter()
        .map(|entry| entry.bid)
        .filter(|bid| *bid > 0.0)
        .fold(f64::INFINITY, f64::min);
    if !lowest.is_finite() || own_bid <= 0.0 {
        return None;
    }
    Some(lowest / own_bid * 100.0)
}

/// Award eligibility: the opportunity sits in its final evaluation stage
/// and at least one still-competing proposal has a complete score set.
pub fn can_be_awarded<M: Mechanism>(
    opportunity: &Opportunity<M::OpportunityStatus>,
    proposals: &[Proposal<M::ProposalStatus>],
) -> bool {
    opportunity.status == M::award_ready()
        && proposals.iter().any(|proposal| {
            !M::ranking_excluded(proposal.status)
                && proposal_total::<M>(opportunity, proposal).is_complete()
        })
}
