use super::common::*;
use crate::workflows::procurement::domain::{Proposal, ProposalId, Stage};
use crate::workflows::procurement::mechanisms::{
    CodeWithUs, CwuOpportunityStatus, CwuProposalStatus, Mechanism, SprintWithUs,
    SwuOpportunityStatus, SwuProposalStatus,
};
use crate::workflows::procurement::scoring::{
    can_be_awarded, compute_total, price_score, questions_percentage, rank_proposals, ProposalBid,
    TotalScore,
};

#[test]
fn missing_stage_makes_the_total_incomplete_not_zero() {
    let mut proposal = swu_proposal(SwuProposalStatus::UnderReviewTeamScenario);
    proposal.scores.questions = Some(80.0);
    proposal.scores.challenge = Some(70.0);
    proposal.scores.price = Some(90.0);

    let total = compute_total(swu_weights(), &proposal.scores, SprintWithUs::stages());

    assert_eq!(
        total,
        TotalScore::Incomplete {
            missing: vec![Stage::Scenario]
        }
    );
    assert_eq!(total.value(), None);
}

#[test]
fn complete_totals_are_the_weighted_sum_of_stage_scores() {
    let mut proposal = swu_proposal(SwuProposalStatus::EvaluatedTeamScenario);
    proposal.scores.questions = Some(80.0);
    proposal.scores.challenge = Some(70.0);
    proposal.scores.scenario = Some(75.0);
    proposal.scores.price = Some(90.0);

    let total = compute_total(swu_weights(), &proposal.scores, SprintWithUs::stages());

    // 0.3 * 80 + 0.2 * 70 + 0.2 * 75 + 0.3 * 90
    assert_eq!(total, TotalScore::Complete(80.0));
}

#[test]
fn raising_a_single_stage_score_never_lowers_the_total() {
    let mut scores = swu_proposal(SwuProposalStatus::EvaluatedTeamScenario).scores;
    scores.questions = Some(80.0);
    scores.challenge = Some(70.0);
    scores.scenario = Some(75.0);
    scores.price = Some(90.0);

    let baseline = compute_total(swu_weights(), &scores, SprintWithUs::stages());
    for stage in SprintWithUs::stages() {
        let mut raised = scores;
        let bumped = raised.get(*stage).unwrap_or(0.0) + 5.0;
        raised.set(*stage, bumped);
        let total = compute_total(swu_weights(), &raised, SprintWithUs::stages());
        assert!(
            total.value() >= baseline.value(),
            "raising {stage:?} lowered the total"
        );
    }
}

fn scored_cwu_proposal(
    id: &str,
    status: CwuProposalStatus,
    score: Option<f64>,
) -> Proposal<CwuProposalStatus> {
    let mut proposal = cwu_proposal(status);
    proposal.id = ProposalId(id.to_string());
    proposal.scores.questions = score;
    proposal
}

#[test]
fn tied_totals_share_a_rank() {
    let opportunity = cwu_opportunity(CwuOpportunityStatus::Evaluation);
    let proposals = vec![
        scored_cwu_proposal("prop-a", CwuProposalStatus::Evaluated, Some(90.0)),
        scored_cwu_proposal("prop-b", CwuProposalStatus::Evaluated, Some(90.0)),
        scored_cwu_proposal("prop-c", CwuProposalStatus::Evaluated, Some(80.0)),
    ];

    let ranked = rank_proposals::<CodeWithUs>(&opportunity, &proposals);

    let ranks: Vec<Option<u32>> = ranked.iter().map(|entry| entry.rank).collect();
    assert_eq!(ranks, vec![Some(1), Some(1), Some(3)]);
}

#[test]
fn disqualified_and_withdrawn_proposals_are_excluded_from_ranking() {
    let opportunity = cwu_opportunity(CwuOpportunityStatus::Evaluation);
    let proposals = vec![
        scored_cwu_proposal("prop-a", CwuProposalStatus::Evaluated, Some(70.0)),
        scored_cwu_proposal("prop-b", CwuProposalStatus::Disqualified, Some(95.0)),
        scored_cwu_proposal("prop-c", CwuProposalStatus::Withdrawn, Some(90.0)),
    ];

    let ranked = rank_proposals::<CodeWithUs>(&opportunity, &proposals);

    let winner = ranked
        .iter()
        .find(|entry| entry.proposal.0 == "prop-a")
        .expect("ranked entry");
    assert_eq!(winner.rank, Some(1));

    // Excluded proposals keep their last-known totals for display.
    let disqualified = ranked
        .iter()
        .find(|entry| entry.proposal.0 == "prop-b")
        .expect("excluded entry");
    assert_eq!(disqualified.rank, None);
    assert_eq!(disqualified.total, TotalScore::Complete(95.0));
}

#[test]
fn unscored_proposals_sort_last() {
    let opportunity = cwu_opportunity(CwuOpportunityStatus::Evaluation);
    let proposals = vec![
        scored_cwu_proposal("prop-a", CwuProposalStatus::UnderReview, None),
        scored_cwu_proposal("prop-b", CwuProposalStatus::Evaluated, Some(55.0)),
    ];

    let ranked = rank_proposals::<CodeWithUs>(&opportunity, &proposals);

    assert_eq!(ranked[0].proposal.0, "prop-b");
    assert_eq!(ranked[0].rank, Some(1));
    assert_eq!(ranked[1].proposal.0, "prop-a");
    assert_eq!(ranked[1].rank, Some(2));
    assert!(!ranked[1].total.is_complete());
}

#[test]
fn price_score_is_relative_to_the_lowest_bid() {
    let bids = vec![
        ProposalBid {
            proposal: swu_proposal(SwuProposalStatus::EvaluatedTeamScenario).id,
            bid: 200_000.0,
        },
        ProposalBid {
            proposal: ProposalId("prop-swu-2".to_string()),
            bid: 400_000.0,
        },
    ];

    assert_eq!(price_score(200_000.0, &bids), Some(100.0));
    assert_eq!(price_score(400_000.0, &bids), Some(50.0));
    assert_eq!(price_score(0.0, &bids), None);
    assert_eq!(price_score(200_000.0, &[]), None);
}

#[test]
fn questions_percentage_is_awarded_over_available_points() {
    assert_eq!(questions_percentage(&sheet(&[8.0, 7.0]), &questions()), 75.0);
    assert_eq!(
        questions_percentage(&sheet(&[10.0, 10.0]), &questions()),
        100.0
    );
}

#[test]
fn award_eligibility_requires_the_final_stage_and_a_complete_score_set() {
    let mut opportunity = cwu_opportunity(CwuOpportunityStatus::Evaluation);
    let scored = vec![scored_cwu_proposal(
        "prop-a",
        CwuProposalStatus::Evaluated,
        Some(88.0),
    )];
    assert!(can_be_awarded::<CodeWithUs>(&opportunity, &scored));

    let unscored = vec![scored_cwu_proposal(
        "prop-a",
        CwuProposalStatus::UnderReview,
        None,
    )];
    assert!(!can_be_awarded::<CodeWithUs>(&opportunity, &unscored));

    opportunity.status = CwuOpportunityStatus::Published;
    assert!(!can_be_awarded::<CodeWithUs>(&opportunity, &scored));
}

#[test]
fn swu_award_eligibility_ignores_withdrawn_proposals() {
    let opportunity = swu_opportunity(SwuOpportunityStatus::EvaluationTeamScenario);
    let mut withdrawn = swu_proposal(SwuProposalStatus::Withdrawn);
    withdrawn.scores.questions = Some(80.0);
    withdrawn.scores.challenge = Some(70.0);
    withdrawn.scores.scenario = Some(75.0);
    withdrawn.scores.price = Some(90.0);

    assert!(!can_be_awarded::<SprintWithUs>(
        &opportunity,
        &[withdrawn]
    ));
}
