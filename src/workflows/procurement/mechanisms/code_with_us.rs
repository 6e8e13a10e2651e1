use serde::{Deserialize, Serialize};

use super::super::clock::TimeGate;
use super::super::domain::{MechanismKind, Stage, Status};
use super::super::policy::{RuleSource, TransitionPolicy, TransitionRule};
use super::{Mechanism, ADMINS, GOV, VENDOR};

/// Code With Us: a single reviewer-entered evaluation score, no panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeWithUs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CwuOpportunityStatus {
    Draft,
    Published,
    Evaluation,
    Awarded,
    Suspended,
    Canceled,
}

impl Status for CwuOpportunityStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Evaluation => "evaluation",
            Self::Awarded => "awarded",
            Self::Suspended => "suspended",
            Self::Canceled => "canceled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CwuProposalStatus {
    Draft,
    Submitted,
    UnderReview,
    Evaluated,
    Awarded,
    NotAwarded,
    Disqualified,
    Withdrawn,
}

impl Status for CwuProposalStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Evaluated => "evaluated",
            Self::Awarded => "awarded",
            Self::NotAwarded => "not_awarded",
            Self::Disqualified => "disqualified",
            Self::Withdrawn => "withdrawn",
        }
    }
}

fn opportunity_cancelable(status: CwuOpportunityStatus) -> bool {
    matches!(
        status,
        CwuOpportunityStatus::Published
            | CwuOpportunityStatus::Evaluation
            | CwuOpportunityStatus::Suspended
    )
}

fn withdrawable(status: CwuProposalStatus) -> bool {
    matches!(
        status,
        CwuProposalStatus::Submitted
            | CwuProposalStatus::UnderReview
            | CwuProposalStatus::Evaluated
    )
}

fn disqualifiable(status: CwuProposalStatus) -> bool {
    matches!(
        status,
        CwuProposalStatus::Submitted
            | CwuProposalStatus::UnderReview
            | CwuProposalStatus::Evaluated
    )
}

static OPPORTUNITY_POLICY: TransitionPolicy<CwuOpportunityStatus> = TransitionPolicy {
    rules: &[
        TransitionRule {
            from: RuleSource::From(CwuOpportunityStatus::Draft),
            to: CwuOpportunityStatus::Published,
            roles: ADMINS,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(CwuOpportunityStatus::Published),
            to: CwuOpportunityStatus::Evaluation,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(CwuOpportunityStatus::Evaluation),
            to: CwuOpportunityStatus::Awarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(CwuOpportunityStatus::Published),
            to: CwuOpportunityStatus::Suspended,
            roles: ADMINS,
            clock: None,
        },
        TransitionRule {
            from: RuleSource::From(CwuOpportunityStatus::Evaluation),
            to: CwuOpportunityStatus::Suspended,
            roles: ADMINS,
            clock: None,
        },
        TransitionRule {
            from: RuleSource::From(CwuOpportunityStatus::Suspended),
            to: CwuOpportunityStatus::Published,
            roles: ADMINS,
            clock: None,
        },
        TransitionRule {
            from: RuleSource::Where(opportunity_cancelable),
            to: CwuOpportunityStatus::Canceled,
            roles: ADMINS,
            clock: None,
        },
    ],
};

static PROPOSAL_POLICY: TransitionPolicy<CwuProposalStatus> = TransitionPolicy {
    rules: &[
        TransitionRule {
            from: RuleSource::From(CwuProposalStatus::Draft),
            to: CwuProposalStatus::Submitted,
            roles: VENDOR,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(CwuProposalStatus::Submitted),
            to: CwuProposalStatus::UnderReview,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(CwuProposalStatus::UnderReview),
            to: CwuProposalStatus::Evaluated,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(CwuProposalStatus::Evaluated),
            to: CwuProposalStatus::Awarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(CwuProposalStatus::Evaluated),
            to: CwuProposalStatus::NotAwarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::From(CwuProposalStatus::NotAwarded),
            to: CwuProposalStatus::Awarded,
            roles: GOV,
            clock: Some(TimeGate::AfterProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::Where(withdrawable),
            to: CwuProposalStatus::Withdrawn,
            roles: VENDOR,
            clock: Some(TimeGate::BeforeProposalDeadline),
        },
        TransitionRule {
            from: RuleSource::Where(disqualifiable),
            to: CwuProposalStatus::Disqualified,
            roles: GOV,
            clock: None,
        },
    ],
};

impl Mechanism for CodeWithUs {
    const KIND: MechanismKind = MechanismKind::CodeWithUs;
    type OpportunityStatus = CwuOpportunityStatus;
    type ProposalStatus = CwuProposalStatus;

    fn opportunity_policy() -> &'static TransitionPolicy<CwuOpportunityStatus> {
        &OPPORTUNITY_POLICY
    }

    fn proposal_policy() -> &'static TransitionPolicy<CwuProposalStatus> {
        &PROPOSAL_POLICY
    }

    fn stages() -> &'static [Stage] {
        &[Stage::Questions]
    }

    fn review_stages() -> &'static [Stage] {
        &[Stage::Questions]
    }

    fn opportunity_statuses() -> &'static [CwuOpportunityStatus] {
        &[
            CwuOpportunityStatus::Draft,
            CwuOpportunityStatus::Published,
            CwuOpportunityStatus::Evaluation,
            CwuOpportunityStatus::Awarded,
            CwuOpportunityStatus::Suspended,
            CwuOpportunityStatus::Canceled,
        ]
    }

    fn proposal_statuses() -> &'static [CwuProposalStatus] {
        &[
            CwuProposalStatus::Draft,
            CwuProposalStatus::Submitted,
            CwuProposalStatus::UnderReview,
            CwuProposalStatus::Evaluated,
            CwuProposalStatus::Awarded,
            CwuProposalStatus::NotAwarded,
            CwuProposalStatus::Disqualified,
            CwuProposalStatus::Withdrawn,
        ]
    }

    fn draft_opportunity() -> CwuOpportunityStatus {
        CwuOpportunityStatus::Draft
    }

    fn under_review_opportunity() -> Option<CwuOpportunityStatus> {
        None
    }

    fn published() -> CwuOpportunityStatus {
        CwuOpportunityStatus::Published
    }

    fn suspended() -> Option<CwuOpportunityStatus> {
        Some(CwuOpportunityStatus::Suspended)
    }

    fn canceled() -> CwuOpportunityStatus {
        CwuOpportunityStatus::Canceled
    }

    fn awarded_opportunity() -> CwuOpportunityStatus {
        CwuOpportunityStatus::Awarded
    }

    fn next_evaluation_stage(current: CwuOpportunityStatus) -> Option<CwuOpportunityStatus> {
        match current {
            CwuOpportunityStatus::Published => Some(CwuOpportunityStatus::Evaluation),
            _ => None,
        }
    }

    fn award_ready() -> CwuOpportunityStatus {
        CwuOpportunityStatus::Evaluation
    }

    fn scoring_stage(stage: Stage) -> Option<CwuOpportunityStatus> {
        match stage {
            Stage::Questions => Some(CwuOpportunityStatus::Evaluation),
            _ => None,
        }
    }

    fn individual_evaluation_stage() -> Option<CwuOpportunityStatus> {
        None
    }

    fn draft_proposal() -> CwuProposalStatus {
        CwuProposalStatus::Draft
    }

    fn submitted() -> CwuProposalStatus {
        CwuProposalStatus::Submitted
    }

    fn first_review() -> CwuProposalStatus {
        CwuProposalStatus::UnderReview
    }

    fn under_review(stage: Stage) -> Option<CwuProposalStatus> {
        match stage {
            Stage::Questions => Some(CwuProposalStatus::UnderReview),
            _ => None,
        }
    }

    fn evaluated(stage: Stage) -> Option<CwuProposalStatus> {
        match stage {
            Stage::Questions => Some(CwuProposalStatus::Evaluated),
            _ => None,
        }
    }

    fn fully_evaluated() -> CwuProposalStatus {
        CwuProposalStatus::Evaluated
    }

    fn awarded() -> CwuProposalStatus {
        CwuProposalStatus::Awarded
    }

    fn not_awarded() -> CwuProposalStatus {
        CwuProposalStatus::NotAwarded
    }

    fn disqualified() -> CwuProposalStatus {
        CwuProposalStatus::Disqualified
    }

    fn withdrawn() -> CwuProposalStatus {
        CwuProposalStatus::Withdrawn
    }
}
