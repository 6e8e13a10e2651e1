use serde::{Deserialize, Serialize};

use super::super::clock::TimeGate;
use super::super::domain::{MechanismKind, Stage, Status};
use super::super::policy::{RuleSource, TransitionPolicy, TransitionRule};
use super::{Mechanism, ADMINS, AUTHORS, GOV, PANEL_CHAIR, VENDOR};

/// Team With Us: resource questions scored by a panel in separate
/// individual and consensus opportunity stages, then an interview
/// challenge, a derived price score, and a Processing stage before award.
/// No suspension and no post-award disqualification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamWithUs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwuOpportunityStatus {
    Draft,
    UnderReview,
    Published,
    EvaluationResourceQuestionsIndividual,
    EvaluationResourceQuestionsConsensus,
    EvaluationChallenge,
    Processing,
    Awarded,
    Canceled,
}

impl Status for TwuOpportunityStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::UnderReview => "under_review",
            Self::Published => "published",
            Self::EvaluationResourceQuestionsIndividual => {
                "evaluation_resource_questions_individual"
            }
            Self::EvaluationResourceQuestionsConsensus => {
                "evaluation_resource_questions_consensus"
            }
            Self::EvaluationChallenge => "evaluation_challenge",
            Self::Processing => "processing",
            Self::Awarded => "awarded",
            Self::Canceled => "canceled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwuProposalStatus {
    Draft,
    Submitted,
    UnderReviewResourceQuestions,
    EvaluatedResourceQuestions,
    UnderReviewChallenge,
    EvaluatedChallenge,
    Awarded,
    NotAwarded,
    Disqualified,
    Withdrawn,
}

impl Status for TwuProposalStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReviewResourceQuestions => "under_review_resource_questions",
            Self::EvaluatedResourceQuestions => "evaluated_resource_questions",
            Self::UnderReviewChallenge => "under_review_challenge",
            Self::EvaluatedChallenge => "evaluated_challenge",
            Self::Awarded => "awarded",
            Self::NotAwarded => "not_awarded",
            Self::Disqualified => "disqualified",
            Self::Withdrawn => "withdrawn",
        }
    }
}

fn opportunity_cancelable(status: TwuOpportunityStatus) -> bool {
    matches!(
        status,
        TwuOpportunityStatus::UnderReview
            | TwuOpportunityStatus::Published
            | TwuOpportunityStatus::EvaluationResourceQuestionsIndividual
            | TwuOpportunityStatus::EvaluationResourceQuestionsConsensus
            | TwuOpportunityStatus::EvaluationChallenge
            | TwuOpportunityStatus::Processing
    )
}

fn in_review(status: TwuProposalStatus) -> bool {
    matches!(
        status,
        TwuProposalStatus::UnderReviewResourceQuestions
            | TwuProposalStatus::EvaluatedResourceQuestions
            | TwuProposalStatus::UnderReviewChallenge
            | TwuProposalStatus::EvaluatedChallenge
    )
}

fn withdrawable(status: TwuProposalStatus) -> bool {
    in_review(status) || status == TwuProposalStatus::Submitted
}

fn disqualifiable(status: TwuProposalStatus) -> bool {
    in_review(status) || status == TwuProposalStatus::Submitted
}

static OPPORTUNITY_POLICY: TransitionPolicy<TwuOpportunityStatus> = TransitionPolicy {
    rules: &[
        TransitionRule {
            from: RuleSource::From(TwuOpportunityStatus::Draft),
            to: TwuOpportunityStatus::UnderReview,
            roles: AUTHORS,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuOpportunityStatus::Draft),
            to: TwuOpportunityStatus::Published,
            roles: ADMINS,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuOpportunityStatus::UnderReview),
            to: TwuOpportunityStatus::Published,
            roles: ADMINS,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuOpportunityStatus::Published),
            to: TwuOpportunityStatus::EvaluationResourceQuestionsIndividual,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuOpportunityStatus::EvaluationResourceQuestionsIndividual),
            to: TwuOpportunityStatus::EvaluationResourceQuestionsConsensus,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuOpportunityStatus::EvaluationResourceQuestionsConsensus),
            to: TwuOpportunityStatus::EvaluationChallenge,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuOpportunityStatus::EvaluationChallenge),
            to: TwuOpportunityStatus::Processing,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuOpportunityStatus::Processing),
            to: TwuOpportunityStatus::Awarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::Where(opportunity_cancelable),
            to: TwuOpportunityStatus::Canceled,
            roles: ADMINS,
            clock: None,
        },
    ],
};

static PROPOSAL_POLICY: TransitionPolicy<TwuProposalStatus> = TransitionPolicy {
    rules: &[
        TransitionRule {
            from: RuleSource::From(TwuProposalStatus::Draft),
            to: TwuProposalStatus::Submitted,
            roles: VENDOR,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuProposalStatus::Submitted),
            to: TwuProposalStatus::UnderReviewResourceQuestions,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuProposalStatus::UnderReviewResourceQuestions),
            to: TwuProposalStatus::EvaluatedResourceQuestions,
            roles: PANEL_CHAIR,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuProposalStatus::EvaluatedResourceQuestions),
            to: TwuProposalStatus::UnderReviewChallenge,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuProposalStatus::UnderReviewChallenge),
            to: TwuProposalStatus::EvaluatedChallenge,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuProposalStatus::EvaluatedChallenge),
            to: TwuProposalStatus::Awarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuProposalStatus::EvaluatedChallenge),
            to: TwuProposalStatus::NotAwarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(TwuProposalStatus::NotAwarded),
            to: TwuProposalStatus::Awarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::Where(withdrawable),
            to: TwuProposalStatus::Withdrawn,
            roles: VENDOR,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::Where(disqualifiable),
            to: TwuProposalStatus::Disqualified,
            roles: GOV,
            clock: None,
        },
    ],
};

impl Mechanism for TeamWithUs {
    const KIND: MechanismKind = MechanismKind::TeamWithUs;
    type OpportunityStatus = TwuOpportunityStatus;
    type ProposalStatus = TwuProposalStatus;

    fn opportunity_policy() -> &'static TransitionPolicy<TwuOpportunityStatus> {
        &OPPORTUNITY_POLICY
    }

    fn proposal_policy() -> &'static TransitionPolicy<TwuProposalStatus> {
        &PROPOSAL_POLICY
    }

    fn stages() -> &'static [Stage] {
        &[Stage::Questions, Stage::Challenge, Stage::Price]
    }

    fn review_stages() -> &'static [Stage] {
        &[Stage::Questions, Stage::Challenge]
    }

    fn opportunity_statuses() -> &'static [TwuOpportunityStatus] {
        &[
            TwuOpportunityStatus::Draft,
            TwuOpportunityStatus::UnderReview,
            TwuOpportunityStatus::Published,
            TwuOpportunityStatus::EvaluationResourceQuestionsIndividual,
            TwuOpportunityStatus::EvaluationResourceQuestionsConsensus,
            TwuOpportunityStatus::EvaluationChallenge,
            TwuOpportunityStatus::Processing,
            TwuOpportunityStatus::Awarded,
            TwuOpportunityStatus::Canceled,
        ]
    }

    fn proposal_statuses() -> &'static [TwuProposalStatus] {
        &[
            TwuProposalStatus::Draft,
            TwuProposalStatus::Submitted,
            TwuProposalStatus::UnderReviewResourceQuestions,
            TwuProposalStatus::EvaluatedResourceQuestions,
            TwuProposalStatus::UnderReviewChallenge,
            TwuProposalStatus::EvaluatedChallenge,
            TwuProposalStatus::Awarded,
            TwuProposalStatus::NotAwarded,
            TwuProposalStatus::Disqualified,
            TwuProposalStatus::Withdrawn,
        ]
    }

    fn draft_opportunity() -> TwuOpportunityStatus {
        TwuOpportunityStatus::Draft
    }

    fn under_review_opportunity() -> Option<TwuOpportunityStatus> {
        Some(TwuOpportunityStatus::UnderReview)
    }

    fn published() -> TwuOpportunityStatus {
        TwuOpportunityStatus::Published
    }

    fn suspended() -> Option<TwuOpportunityStatus> {
        None
    }

    fn canceled() -> TwuOpportunityStatus {
        TwuOpportunityStatus::Canceled
    }

    fn awarded_opportunity() -> TwuOpportunityStatus {
        TwuOpportunityStatus::Awarded
    }

    fn next_evaluation_stage(current: TwuOpportunityStatus) -> Option<TwuOpportunityStatus> {
        match current {
            TwuOpportunityStatus::Published => {
                Some(TwuOpportunityStatus::EvaluationResourceQuestionsIndividual)
            }
            TwuOpportunityStatus::EvaluationResourceQuestionsIndividual => {
                Some(TwuOpportunityStatus::EvaluationResourceQuestionsConsensus)
            }
            TwuOpportunityStatus::EvaluationResourceQuestionsConsensus => {
                Some(TwuOpportunityStatus::EvaluationChallenge)
            }
            TwuOpportunityStatus::EvaluationChallenge => Some(TwuOpportunityStatus::Processing),
            _ => None,
        }
    }

    fn award_ready() -> TwuOpportunityStatus {
        TwuOpportunityStatus::Processing
    }

    fn scoring_stage(stage: Stage) -> Option<TwuOpportunityStatus> {
        match stage {
            Stage::Questions => Some(TwuOpportunityStatus::EvaluationResourceQuestionsConsensus),
            Stage::Challenge | Stage::Price => Some(TwuOpportunityStatus::EvaluationChallenge),
            Stage::Scenario => None,
        }
    }

    fn individual_evaluation_stage() -> Option<TwuOpportunityStatus> {
        Some(TwuOpportunityStatus::EvaluationResourceQuestionsIndividual)
    }

    fn draft_proposal() -> TwuProposalStatus {
        TwuProposalStatus::Draft
    }

    fn submitted() -> TwuProposalStatus {
        TwuProposalStatus::Submitted
    }

    fn first_review() -> TwuProposalStatus {
        TwuProposalStatus::UnderReviewResourceQuestions
    }

    fn under_review(stage: Stage) -> Option<TwuProposalStatus> {
        match stage {
            Stage::Questions => Some(TwuProposalStatus::UnderReviewResourceQuestions),
            Stage::Challenge => Some(TwuProposalStatus::UnderReviewChallenge),
            Stage::Scenario | Stage::Price => None,
        }
    }

    fn evaluated(stage: Stage) -> Option<TwuProposalStatus> {
        match stage {
            Stage::Questions => Some(TwuProposalStatus::EvaluatedResourceQuestions),
            Stage::Challenge => Some(TwuProposalStatus::EvaluatedChallenge),
            Stage::Scenario | Stage::Price => None,
        }
    }

    fn fully_evaluated() -> TwuProposalStatus {
        TwuProposalStatus::EvaluatedChallenge
    }

    fn awarded() -> TwuProposalStatus {
        TwuProposalStatus::Awarded
    }

    fn not_awarded() -> TwuProposalStatus {
        TwuProposalStatus::NotAwarded
    }

    fn disqualified() -> TwuProposalStatus {
        TwuProposalStatus::Disqualified
    }

    fn withdrawn() -> TwuProposalStatus {
        TwuProposalStatus::Withdrawn
    }
}
