use super::clock::{ClockFacts, TimeGate};
use super::domain::{Role, Status};

/// Source side of a transition rule. `Where` captures transitions that are
/// legal from many states (disqualification, withdrawal, cancellation)
/// without repeating the row per state.
#[derive(Clone, Copy)]
pub enum RuleSource<S: 'static> {
    From(S),
    Where(fn(S) -> bool),
}

impl<S: Copy + PartialEq> RuleSource<S> {
    fn matches(&self, from: S) -> bool {
        match self {
            RuleSource::From(source) => *source == from,
            RuleSource::Where(predicate) => predicate(from),
        }
    }
}

/// One legal move: who may take it, and under which time condition.
pub struct TransitionRule<S: 'static> {
    pub from: RuleSource<S>,
    pub to: S,
    pub roles: &'static [Role],
    pub clock: Option<TimeGate>,
}

/// Finite table of the legal moves for one mechanism's status enum. The
/// table is the single authority for "is this status change allowed now,
/// by whom"; nothing else in the engine hand-checks statuses against roles.
pub struct TransitionPolicy<S: 'static> {
    pub rules: &'static [TransitionRule<S>],
}

impl<S: Status> TransitionPolicy<S> {
    /// Check one requested move. Rejections carry the specific rule that
    /// blocked the action so callers can surface it.
    pub fn check(
        &self,
        from: S,
        to: S,
        role: Role,
        clock: ClockFacts,
    ) -> Result<(), TransitionError> {
        let mut pair_defined = false;
        let mut role_permitted = false;
        let mut blocking_gate = None;

        for rule in self.rules.iter().filter(|rule| rule.to == to && rule.from.matches(from)) {
            pair_defined = true;
            if !rule.roles.contains(&role) {
                continue;
            }
            role_permitted = true;
            match rule.clock {
                Some(gate) if !clock.satisfies(gate) => blocking_gate = Some(gate),
                _ => return Ok(()),
            }
        }

        if !pair_defined {
            Err(TransitionError::NoSuchTransition {
                from: from.label(),
                to: to.label(),
            })
        } else if !role_permitted {
            Err(TransitionError::RoleNotPermitted { role })
        } else {
            Err(TransitionError::ClockNotSatisfied {
                gate: blocking_gate.unwrap_or(TimeGate::AfterProposalDeadline),
            })
        }
    }

    pub fn is_legal(&self, from: S, to: S, role: Role, clock: ClockFacts) -> bool {
        self.check(from, to, role, clock).is_ok()
    }

    /// Whether any rule defines the pair, regardless of role or clock.
    pub fn allows_pair(&self, from: S, to: S) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.to == to && rule.from.matches(from))
    }
}

/// Typed rejection reasons; never a bare boolean, since the workflow
/// coordinator must report which rule blocked the action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("the {} role is not permitted to make this status change", .role.label())]
    RoleNotPermitted { role: Role },
    #[error("this status change is only legal {gate}")]
    ClockNotSatisfied { gate: TimeGate },
    #[error("no status change from {from} to {to} is defined for this mechanism")]
    NoSuchTransition { from: &'static str, to: &'static str },
}
