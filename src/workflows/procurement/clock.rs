use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pure time-gate resolution. Dates are validated upstream; this never
/// fails and never touches a system clock.
pub struct StageClock;

impl StageClock {
    pub fn has_passed(reference: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        reference < now
    }
}

/// Time condition attached to a transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeGate {
    BeforeProposalDeadline,
    AfterProposalDeadline,
    AfterAssignmentDate,
}

impl TimeGate {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BeforeProposalDeadline => "before the proposal deadline",
            Self::AfterProposalDeadline => "after the proposal deadline",
            Self::AfterAssignmentDate => "after the assignment date",
        }
    }
}

impl fmt::Display for TimeGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of which gates have passed, resolved once per engine call so a
/// decision is a pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFacts {
    pub proposal_deadline_passed: bool,
    pub assignment_date_passed: bool,
}

impl ClockFacts {
    pub fn resolve(
        proposal_deadline: DateTime<Utc>,
        assignment_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            proposal_deadline_passed: StageClock::has_passed(proposal_deadline, now),
            assignment_date_passed: StageClock::has_passed(assignment_date, now),
        }
    }

    pub fn satisfies(self, gate: TimeGate) -> bool {
        match gate {
            TimeGate::BeforeProposalDeadline => !self.proposal_deadline_passed,
            TimeGate::AfterProposalDeadline => self.proposal_deadline_passed,
            TimeGate::AfterAssignmentDate => self.assignment_date_passed,
        }
    }
}
