use serde::{Deserialize, Serialize};

use super::super::clock::TimeGate;
use super::super::domain::{MechanismKind, Stage, Status};
use super::super::policy::{RuleSource, TransitionPolicy, TransitionRule};
use super::{Mechanism, ADMINS, AUTHORS, GOV, PANEL_CHAIR, VENDOR};

/// Sprint With Us: panel-scored team questions, then code challenge and
/// team scenario stages, with a derived price score. The only mechanism
/// that keeps a post-award integrity path to disqualification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SprintWithUs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwuOpportunityStatus {
    Draft,
    UnderReview,
    Published,
    EvaluationTeamQuestions,
    EvaluationCodeChallenge,
    EvaluationTeamScenario,
    Awarded,
    Suspended,
    Canceled,
}

impl Status for SwuOpportunityStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::UnderReview => "under_review",
            Self::Published => "published",
            Self::EvaluationTeamQuestions => "evaluation_team_questions",
            Self::EvaluationCodeChallenge => "evaluation_code_challenge",
            Self::EvaluationTeamScenario => "evaluation_team_scenario",
            Self::Awarded => "awarded",
            Self::Suspended => "suspended",
            Self::Canceled => "canceled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwuProposalStatus {
    Draft,
    Submitted,
    UnderReviewTeamQuestions,
    EvaluatedTeamQuestions,
    UnderReviewCodeChallenge,
    EvaluatedCodeChallenge,
    UnderReviewTeamScenario,
    EvaluatedTeamScenario,
    Awarded,
    NotAwarded,
    Disqualified,
    Withdrawn,
}

impl Status for SwuProposalStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReviewTeamQuestions => "under_review_team_questions",
            Self::EvaluatedTeamQuestions => "evaluated_team_questions",
            Self::UnderReviewCodeChallenge => "under_review_code_challenge",
            Self::EvaluatedCodeChallenge => "evaluated_code_challenge",
            Self::UnderReviewTeamScenario => "under_review_team_scenario",
            Self::EvaluatedTeamScenario => "evaluated_team_scenario",
            Self::Awarded => "awarded",
            Self::NotAwarded => "not_awarded",
            Self::Disqualified => "disqualified",
            Self::Withdrawn => "withdrawn",
        }
    }
}

fn opportunity_suspendable(status: SwuOpportunityStatus) -> bool {
    matches!(
        status,
        SwuOpportunityStatus::UnderReview
            | SwuOpportunityStatus::Published
            | SwuOpportunityStatus::EvaluationTeamQuestions
            | SwuOpportunityStatus::EvaluationCodeChallenge
            | SwuOpportunityStatus::EvaluationTeamScenario
    )
}

fn opportunity_cancelable(status: SwuOpportunityStatus) -> bool {
    opportunity_suspendable(status) || status == SwuOpportunityStatus::Suspended
}

fn withdrawable(status: SwuProposalStatus) -> bool {
    in_review(status) || status == SwuProposalStatus::Submitted
}

fn disqualifiable(status: SwuProposalStatus) -> bool {
    in_review(status) || status == SwuProposalStatus::Submitted
}

fn in_review(status: SwuProposalStatus) -> bool {
    matches!(
        status,
        SwuProposalStatus::UnderReviewTeamQuestions
            | SwuProposalStatus::EvaluatedTeamQuestions
            | SwuProposalStatus::UnderReviewCodeChallenge
            | SwuProposalStatus::EvaluatedCodeChallenge
            | SwuProposalStatus::UnderReviewTeamScenario
            | SwuProposalStatus::EvaluatedTeamScenario
    )
}

static OPPORTUNITY_POLICY: TransitionPolicy<SwuOpportunityStatus> = TransitionPolicy {
    rules: &[
        TransitionRule {
            from: RuleSource::From(SwuOpportunityStatus::Draft),
            to: SwuOpportunityStatus::UnderReview,
            roles: AUTHORS,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuOpportunityStatus::Draft),
            to: SwuOpportunityStatus::Published,
            roles: ADMINS,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuOpportunityStatus::UnderReview),
            to: SwuOpportunityStatus::Published,
            roles: ADMINS,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuOpportunityStatus::Published),
            to: SwuOpportunityStatus::EvaluationTeamQuestions,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuOpportunityStatus::EvaluationTeamQuestions),
            to: SwuOpportunityStatus::EvaluationCodeChallenge,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuOpportunityStatus::EvaluationCodeChallenge),
            to: SwuOpportunityStatus::EvaluationTeamScenario,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuOpportunityStatus::EvaluationTeamScenario),
            to: SwuOpportunityStatus::Awarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::Where(opportunity_suspendable),
            to: SwuOpportunityStatus::Suspended,
            roles: ADMINS,
            clock: None,
        },
        TransitionRule {
            from: RuleSource::From(SwuOpportunityStatus::Suspended),
            to: SwuOpportunityStatus::Published,
            roles: ADMINS,
            clock: None,
        },
        TransitionRule {
            from: RuleSource::Where(opportunity_cancelable),
            to: SwuOpportunityStatus::Canceled,
            roles: ADMINS,
            clock: None,
        },
    ],
};

static PROPOSAL_POLICY: TransitionPolicy<SwuProposalStatus> = TransitionPolicy {
    rules: &[
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::Draft),
            to: SwuProposalStatus::Submitted,
            roles: VENDOR,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::Submitted),
            to: SwuProposalStatus::UnderReviewTeamQuestions,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        // Team questions are scored through the panel consensus, so the
        // chair drives this move rather than a reviewer.
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::UnderReviewTeamQuestions),
            to: SwuProposalStatus::EvaluatedTeamQuestions,
            roles: PANEL_CHAIR,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::EvaluatedTeamQuestions),
            to: SwuProposalStatus::UnderReviewCodeChallenge,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::UnderReviewCodeChallenge),
            to: SwuProposalStatus::EvaluatedCodeChallenge,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::EvaluatedCodeChallenge),
            to: SwuProposalStatus::UnderReviewTeamScenario,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::UnderReviewTeamScenario),
            to: SwuProposalStatus::EvaluatedTeamScenario,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::EvaluatedTeamScenario),
            to: SwuProposalStatus::Awarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::EvaluatedTeamScenario),
            to: SwuProposalStatus::NotAwarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::NotAwarded),
            to: SwuProposalStatus::Awarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        // Post-award integrity exception, unique to Sprint With Us.
        TransitionRule {
            from: RuleSource::From(SwuProposalStatus::Awarded),
            to: SwuProposalStatus::Disqualified,
            roles: GOV,
            clock: None,
        },
        TransitionRule {
            from: RuleSource::Where(withdrawable),
            to: SwuProposalStatus::Withdrawn,
            roles: VENDOR,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::Where(disqualifiable),
            to: SwuProposalStatus::Disqualified,
            roles: GOV,
            clock: None,
        },
    ],
};

impl Mechanism for SprintWithUs {
    const KIND: MechanismKind = MechanismKind::SprintWithUs;
    type OpportunityStatus = SwuOpportunityStatus;
    type ProposalStatus = SwuProposalStatus;

    fn opportunity_policy() -> &'static TransitionPolicy<SwuOpportunityStatus> {
        &OPPORTUNITY_POLICY
    }

    fn proposal_policy() -> &'static TransitionPolicy<SwuProposalStatus> {
        &PROPOSAL_POLICY
    }

    fn stages() -> &'static [Stage] {
        &[Stage::Questions, Stage::Challenge, Stage::Scenario, Stage::Price]
    }

    fn review_stages() -> &'static [Stage] {
        &[Stage::Questions, Stage::Challenge, Stage::Scenario]
    }

    fn opportunity_statuses() -> &'static [SwuOpportunityStatus] {
        &[
            SwuOpportunityStatus::Draft,
            SwuOpportunityStatus::UnderReview,
            SwuOpportunityStatus::Published,
            SwuOpportunityStatus::EvaluationTeamQuestions,
            SwuOpportunityStatus::EvaluationCodeChallenge,
            SwuOpportunityStatus::EvaluationTeamScenario,
            SwuOpportunityStatus::Awarded,
            SwuOpportunityStatus::Suspended,
            SwuOpportunityStatus::Canceled,
        ]
    }

    fn proposal_statuses() -> &'static [SwuProposalStatus] {
        &[
            SwuProposalStatus::Draft,
            SwuProposalStatus::Submitted,
            SwuProposalStatus::UnderReviewTeamQuestions,
            SwuProposalStatus::EvaluatedTeamQuestions,
            SwuProposalStatus::UnderReviewCodeChallenge,
            SwuProposalStatus::EvaluatedCodeChallenge,
            SwuProposalStatus::UnderReviewTeamScenario,
            SwuProposalStatus::EvaluatedTeamScenario,
            SwuProposalStatus::Awarded,
            SwuProposalStatus::NotAwarded,
            SwuProposalStatus::Disqualified,
            SwuProposalStatus::Withdrawn,
        ]
    }

    fn draft_opportunity() -> SwuOpportunityStatus {
        SwuOpportunityStatus::Draft
    }

    fn under_review_opportunity() -> Option<SwuOpportunityStatus> {
        Some(SwuOpportunityStatus::UnderReview)
    }

    fn published() -> SwuOpportunityStatus {
        SwuOpportunityStatus::Published
    }

    fn suspended() -> Option<SwuOpportunityStatus> {
        Some(SwuOpportunityStatus::Suspended)
    }

    fn canceled() -> SwuOpportunityStatus {
        SwuOpportunityStatus::Canceled
    }

    fn awarded_opportunity() -> SwuOpportunityStatus {
        SwuOpportunityStatus::Awarded
    }

    fn next_evaluation_stage(current: SwuOpportunityStatus) -> Option<SwuOpportunityStatus> {
        match current {
            SwuOpportunityStatus::Published => {
                Some(SwuOpportunityStatus::EvaluationTeamQuestions)
            }
            SwuOpportunityStatus::EvaluationTeamQuestions => {
                Some(SwuOpportunityStatus::EvaluationCodeChallenge)
            }
            SwuOpportunityStatus::EvaluationCodeChallenge => {
                Some(SwuOpportunityStatus::EvaluationTeamScenario)
            }
            _ => None,
        }
    }

    fn award_ready() -> SwuOpportunityStatus {
        SwuOpportunityStatus::EvaluationTeamScenario
    }

    fn scoring_stage(stage: Stage) -> Option<SwuOpportunityStatus> {
        match stage {
            Stage::Questions => Some(SwuOpportunityStatus::EvaluationTeamQuestions),
            Stage::Challenge => Some(SwuOpportunityStatus::EvaluationCodeChallenge),
            Stage::Scenario | Stage::Price => {
                Some(SwuOpportunityStatus::EvaluationTeamScenario)
            }
        }
    }

    fn individual_evaluation_stage() -> Option<SwuOpportunityStatus> {
        Some(SwuOpportunityStatus::EvaluationTeamQuestions)
    }

    fn draft_proposal() -> SwuProposalStatus {
        SwuProposalStatus::Draft
    }

    fn submitted() -> SwuProposalStatus {
        SwuProposalStatus::Submitted
    }

    fn first_review() -> SwuProposalStatus {
        SwuProposalStatus::UnderReviewTeamQuestions
    }

    fn under_review(stage: Stage) -> Option<SwuProposalStatus> {
        match stage {
            Stage::Questions => Some(SwuProposalStatus::UnderReviewTeamQuestions),
            Stage::Challenge => Some(SwuProposalStatus::UnderReviewCodeChallenge),
            Stage::Scenario => Some(SwuProposalStatus::UnderReviewTeamScenario),
            Stage::Price => None,
        }
    }

    fn evaluated(stage: Stage) -> Option<SwuProposalStatus> {
        match stage {
            Stage::Questions => Some(SwuProposalStatus::EvaluatedTeamQuestions),
            Stage::Challenge => Some(SwuProposalStatus::EvaluatedCodeChallenge),
            Stage::Scenario => Some(SwuProposalStatus::EvaluatedTeamScenario),
            Stage::Price => None,
        }
    }

    fn fully_evaluated() -> SwuProposalStatus {
        SwuProposalStatus::EvaluatedTeamScenario
    }

    fn awarded() -> SwuProposalStatus {
        SwuProposalStatus::Awarded
    }

    fn not_awarded() -> SwuProposalStatus {
        SwuProposalStatus::NotAwarded
    }

    fn disqualified() -> SwuProposalStatus {
        SwuProposalStatus::Disqualified
    }

    fn withdrawn() -> SwuProposalStatus {
        SwuProposalStatus::Withdrawn
    }
}
