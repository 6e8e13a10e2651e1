use super::common::*;
use crate::workflows::procurement::domain::{ActionTag, PanelMember, ProposalId};
use crate::workflows::procurement::evaluation::{
    create_consensus, edit_consensus, ConsensusError, EvaluationStatus,
};
use crate::workflows::procurement::mechanisms::SwuProposalStatus;

fn proposal_id() -> ProposalId {
    swu_proposal(SwuProposalStatus::UnderReviewTeamQuestions).id
}

#[test]
fn consensus_is_rejected_until_the_last_individual_evaluation_arrives() {
    let proposal = proposal_id();
    let first_only = vec![individual_evaluation(&evaluator(1), &proposal, &[8.0, 7.0])];

    let result = create_consensus(
        &panel(),
        &chair().user,
        &proposal,
        &first_only,
        sheet(&[8.0, 7.0]),
        &questions(),
        after_deadline(),
    );
    match result {
        Err(ConsensusError::IncompleteEvaluatorSet { missing }) => {
            assert_eq!(missing, vec![evaluator(2).user]);
        }
        other => panic!("expected incomplete evaluator set, got {other:?}"),
    }

    let complete = vec![
        individual_evaluation(&evaluator(1), &proposal, &[8.0, 7.0]),
        individual_evaluation(&evaluator(2), &proposal, &[7.0, 7.0]),
    ];
    let consensus = create_consensus(
        &panel(),
        &chair().user,
        &proposal,
        &complete,
        sheet(&[8.0, 7.0]),
        &questions(),
        after_deadline(),
    )
    .expect("consensus succeeds once every evaluator has submitted");

    assert_eq!(consensus.status, EvaluationStatus::Submitted);
    assert_eq!(consensus.chair, chair().user);
    assert_eq!(consensus.history.len(), 1);
}

#[test]
fn only_the_chair_may_author_the_consensus() {
    let proposal = proposal_id();
    let evaluations = vec![
        individual_evaluation(&evaluator(1), &proposal, &[8.0, 7.0]),
        individual_evaluation(&evaluator(2), &proposal, &[7.0, 7.0]),
    ];

    let result = create_consensus(
        &panel(),
        &evaluator(1).user,
        &proposal,
        &evaluations,
        sheet(&[8.0, 7.0]),
        &questions(),
        after_deadline(),
    );

    assert_eq!(result, Err(ConsensusError::PermissionDenied));
}

#[test]
fn a_panel_without_a_chair_cannot_reach_consensus() {
    let proposal = proposal_id();
    let chairless: Vec<PanelMember> = panel()
        .into_iter()
        .filter(|member| !member.chair)
        .collect();

    let result = create_consensus(
        &chairless,
        &chair().user,
        &proposal,
        &[],
        sheet(&[8.0, 7.0]),
        &questions(),
        after_deadline(),
    );

    assert_eq!(result, Err(ConsensusError::NoPanelChair));
}

#[test]
fn a_scoring_chair_must_also_submit_an_individual_evaluation() {
    let proposal = proposal_id();
    let mut scoring_chair_panel = panel();
    scoring_chair_panel[0].evaluator = true;

    let without_chair_evaluation = vec![
        individual_evaluation(&evaluator(1), &proposal, &[8.0, 7.0]),
        individual_evaluation(&evaluator(2), &proposal, &[7.0, 7.0]),
    ];
    let result = create_consensus(
        &scoring_chair_panel,
        &chair().user,
        &proposal,
        &without_chair_evaluation,
        sheet(&[8.0, 7.0]),
        &questions(),
        after_deadline(),
    );
    match result {
        Err(ConsensusError::IncompleteEvaluatorSet { missing }) => {
            assert_eq!(missing, vec![chair().user]);
        }
        other => panic!("expected the chair's own evaluation to be required, got {other:?}"),
    }

    let mut with_chair_evaluation = without_chair_evaluation;
    with_chair_evaluation.push(individual_evaluation(&chair(), &proposal, &[9.0, 8.0]));
    create_consensus(
        &scoring_chair_panel,
        &chair().user,
        &proposal,
        &with_chair_evaluation,
        sheet(&[8.0, 7.0]),
        &questions(),
        after_deadline(),
    )
    .expect("consensus succeeds once the chair has scored");
}

#[test]
fn editing_preserves_every_prior_score_sheet_in_history() {
    let proposal = proposal_id();
    let evaluations = vec![
        individual_evaluation(&evaluator(1), &proposal, &[8.0, 7.0]),
        individual_evaluation(&evaluator(2), &proposal, &[7.0, 7.0]),
    ];
    let original = create_consensus(
        &panel(),
        &chair().user,
        &proposal,
        &evaluations,
        sheet(&[8.0, 7.0]),
        &questions(),
        after_deadline(),
    )
    .expect("consensus created");

    let revised = edit_consensus(
        &original,
        &panel(),
        &chair().user,
        sheet(&[9.0, 8.0]),
        &questions(),
        ts(2024, 6, 5, 10),
    )
    .expect("chair may revise the consensus");

    assert_eq!(revised.scores, sheet(&[9.0, 8.0]));
    assert_eq!(revised.history.len(), 2);
    let entries = revised.history.entries();
    assert_eq!(entries[0].record.action, ActionTag::CreateConsensus);
    assert_eq!(entries[0].record.scores, sheet(&[8.0, 7.0]));
    assert_eq!(entries[1].record.action, ActionTag::EditConsensus);
    assert_eq!(entries[1].record.scores, sheet(&[9.0, 8.0]));

    let rejected = edit_consensus(
        &original,
        &panel(),
        &evaluator(1).user,
        sheet(&[1.0, 1.0]),
        &questions(),
        ts(2024, 6, 5, 11),
    );
    assert_eq!(rejected, Err(ConsensusError::PermissionDenied));
}

#[test]
fn score_sheets_must_align_with_the_question_list() {
    let proposal = proposal_id();
    let evaluations = vec![
        individual_evaluation(&evaluator(1), &proposal, &[8.0, 7.0]),
        individual_evaluation(&evaluator(2), &proposal, &[7.0, 7.0]),
    ];

    // Too few rows.
    let result = create_consensus(
        &panel(),
        &chair().user,
        &proposal,
        &evaluations,
        sheet(&[8.0]),
        &questions(),
        after_deadline(),
    );
    assert_eq!(result, Err(ConsensusError::MalformedScoreSheet));

    // Score above the question's available points.
    let result = create_consensus(
        &panel(),
        &chair().user,
        &proposal,
        &evaluations,
        sheet(&[11.0, 7.0]),
        &questions(),
        after_deadline(),
    );
    assert_eq!(result, Err(ConsensusError::MalformedScoreSheet));
}

#[test]
fn draft_individual_evaluations_do_not_satisfy_completeness() {
    let proposal = proposal_id();
    let mut draft = individual_evaluation(&evaluator(1), &proposal, &[8.0, 7.0]);
    draft.status = EvaluationStatus::Draft;
    let evaluations = vec![
        draft,
        individual_evaluation(&evaluator(2), &proposal, &[7.0, 7.0]),
    ];

    let result = create_consensus(
        &panel(),
        &chair().user,
        &proposal,
        &evaluations,
        sheet(&[8.0, 7.0]),
        &questions(),
        after_deadline(),
    );

    assert!(matches!(
        result,
        Err(ConsensusError::IncompleteEvaluatorSet { .. })
    ));
}
