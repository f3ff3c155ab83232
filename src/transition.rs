use crate::event::Actor;
use crate::flags::Flag;
use crate::region::Region;
use smol_str::SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The move must not be committed.
    Denied,
    Allowed { revoke_flight: bool },
}

impl Transition {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Transition::Allowed { .. })
    }
}

/// Decides whether a player may move from one region to another.
///
/// `can-fly` is only enforced on the way out: leaving such a region takes
/// flight away, entering one grants nothing. Granting is left to whatever
/// manages player abilities.
#[derive(Debug, Clone)]
pub struct TransitionEvaluator {
    fly_bypass_permission: SmolStr,
}

impl TransitionEvaluator {
    pub fn new(fly_bypass_permission: impl Into<SmolStr>) -> Self {
        TransitionEvaluator {
            fly_bypass_permission: fly_bypass_permission.into(),
        }
    }

    pub fn evaluate(&self, actor: &Actor, old: Option<&Region>, new: Option<&Region>) -> Transition {
        if let (Some(old), Some(new)) = (old, new) {
            if old.name() == new.name() {
                return Transition::Allowed {
                    revoke_flight: false,
                };
            }
        }
        if old.is_some_and(|r| r.has_flag(Flag::CannotLeave)) {
            return Transition::Denied;
        }
        if new.is_some_and(|r| r.has_flag(Flag::CannotEnter)) {
            return Transition::Denied;
        }
        let revoke_flight = old.is_some_and(|r| r.has_flag(Flag::CanFly))
            && !actor.has_permission(&self.fly_bypass_permission);
        Transition::Allowed { revoke_flight }
    }
}
