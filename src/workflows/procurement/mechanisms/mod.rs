//! The three competition mechanisms. Each keeps its own status vocabulary
//! and transition tables; the generic policy engine is instantiated three
//! times rather than the vocabularies being merged, so intentional
//! behavioral divergence (e.g. only Sprint With Us allows post-award
//! disqualification) stays visible in the tables themselves.

mod code_with_us;
mod sprint_with_us;
mod team_with_us;

pub use code_with_us::{CodeWithUs, CwuOpportunityStatus, CwuProposalStatus};
pub use sprint_with_us::{SprintWithUs, SwuOpportunityStatus, SwuProposalStatus};
pub use team_with_us::{TeamWithUs, TwuOpportunityStatus, TwuProposalStatus};

use super::domain::{MechanismKind, Role, Stage, Status};
use super::policy::TransitionPolicy;

pub(crate) const GOV: &[Role] = &[Role::Reviewer, Role::Admin];
pub(crate) const VENDOR: &[Role] = &[Role::Proponent];
pub(crate) const AUTHORS: &[Role] = &[Role::Author, Role::Admin];
pub(crate) const ADMINS: &[Role] = &[Role::Admin];
pub(crate) const PANEL_CHAIR: &[Role] = &[Role::Chair, Role::Admin];

/// Everything the workflow coordinator needs to know about one mechanism:
/// its status types, its transition tables, and the waypoints the shared
/// action handlers steer between.
pub trait Mechanism {
    const KIND: MechanismKind;
    type OpportunityStatus: Status + 'static;
    type ProposalStatus: Status + 'static;

    fn opportunity_policy() -> &'static TransitionPolicy<Self::OpportunityStatus>;
    fn proposal_policy() -> &'static TransitionPolicy<Self::ProposalStatus>;

    /// All scoring stages this mechanism runs, in order.
    fn stages() -> &'static [Stage];
    /// The subset of stages carrying an under-review/evaluated status pair.
    fn review_stages() -> &'static [Stage];

    fn opportunity_statuses() -> &'static [Self::OpportunityStatus];
    fn proposal_statuses() -> &'static [Self::ProposalStatus];

    fn draft_opportunity() -> Self::OpportunityStatus;
    fn under_review_opportunity() -> Option<Self::OpportunityStatus>;
    fn published() -> Self::OpportunityStatus;
    fn suspended() -> Option<Self::OpportunityStatus>;
    fn canceled() -> Self::OpportunityStatus;
    fn awarded_opportunity() -> Self::OpportunityStatus;
    /// Next step in the evaluation chain, starting from Published.
    fn next_evaluation_stage(
        current: Self::OpportunityStatus,
    ) -> Option<Self::OpportunityStatus>;
    /// Opportunity status from which the award action is legal.
    fn award_ready() -> Self::OpportunityStatus;
    /// Opportunity status during which the given stage is scored.
    fn scoring_stage(stage: Stage) -> Option<Self::OpportunityStatus>;
    /// Opportunity status during which panel members score independently.
    fn individual_evaluation_stage() -> Option<Self::OpportunityStatus>;

    fn uses_consensus() -> bool {
        Self::individual_evaluation_stage().is_some()
    }

    /// Opportunity status during which the chair reconciles the consensus.
    fn consensus_stage() -> Option<Self::OpportunityStatus> {
        if Self::uses_consensus() {
            Self::scoring_stage(Stage::Questions)
        } else {
            None
        }
    }

    fn draft_proposal() -> Self::ProposalStatus;
    fn submitted() -> Self::ProposalStatus;
    /// Status a submitted proposal enters when review begins.
    fn first_review() -> Self::ProposalStatus;
    fn under_review(stage: Stage) -> Option<Self::ProposalStatus>;
    fn evaluated(stage: Stage) -> Option<Self::ProposalStatus>;
    /// Status of a proposal that has completed every review stage.
    fn fully_evaluated() -> Self::ProposalStatus;
    fn awarded() -> Self::ProposalStatus;
    fn not_awarded() -> Self::ProposalStatus;
    fn disqualified() -> Self::ProposalStatus;
    fn withdrawn() -> Self::ProposalStatus;

    /// Disqualified and withdrawn proposals never receive a rank.
    fn ranking_excluded(status: Self::ProposalStatus) -> bool {
        status == Self::disqualified() || status == Self::withdrawn()
    }
}
