//! Events decoded at the engine boundary and the verdicts handed back.
//!
//! Each variant carries only what the guard reads. The engine adapter resolves
//! permissions it knows the guard asks about (see [`crate::GuardConfig`]) and
//! stores them on the [`Actor`].

use crate::bounding_box::Vec3;
use crate::session::ActorId;
use smol_str::SmolStr;

/// A player as seen by the guard.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    pub name: SmolStr,
    pub world: SmolStr,
    pub position: Vec3,
    permissions: Vec<SmolStr>,
}

impl Actor {
    pub fn new(
        id: ActorId,
        name: impl Into<SmolStr>,
        world: impl Into<SmolStr>,
        position: Vec3,
    ) -> Self {
        Actor {
            id,
            name: name.into(),
            world: world.into(),
            position,
            permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, node: impl Into<SmolStr>) -> Self {
        self.permissions.push(node.into());
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn has_permission(&self, node: &str) -> bool {
        self.permissions.iter().any(|p| p == node)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardEvent {
    Join {
        actor: Actor,
    },
    Quit {
        actor: Actor,
    },
    BlockPlace {
        actor: Actor,
        block: Vec3,
    },
    BlockBreak {
        actor: Actor,
        block: Vec3,
    },
    /// Interaction from where the actor stands, with the block clicked and the
    /// item held.
    Interact {
        actor: Actor,
        block: Vec3,
        block_id: u32,
        item_id: u32,
        right_click: bool,
    },
    Move {
        actor: Actor,
        from: Vec3,
        to: Vec3,
    },
    /// Only decoded when both sides are players.
    PlayerDamage {
        victim: Actor,
        damager: Actor,
    },
    Command {
        actor: Actor,
        line: String,
    },
    ItemDrop {
        actor: Actor,
    },
    Explosion {
        world: SmolStr,
        blocks: Vec<Vec3>,
    },
    BedEnter {
        actor: Actor,
        bed: Vec3,
    },
    Chat {
        actor: Actor,
        online: Vec<SmolStr>,
    },
    ProjectileLaunch {
        world: SmolStr,
        position: Vec3,
        entity_id: u32,
        shooter: Option<Actor>,
    },
}

/// Why an event was cancelled. Message text is up to the engine adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Denial {
    Edit,
    Interact { block_id: u32 },
    Potion { item_id: u32 },
    Tool { item_id: u32 },
    Movement,
    Pvp,
    Command(String),
    ItemDrop,
    Explosion,
    Sleep,
    Chat,
    EnderPearl,
}

/// Side effects the engine adapter must apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Disable flight and stop the actor flying.
    RevokeFlight,
    /// Push the actor back with this motion.
    Knockback(Vec3),
    /// Narrow chat delivery to these players.
    Recipients(Vec<SmolStr>),
    /// A wand click stored a selection corner (1 or 2).
    CornerSelected { index: usize, position: Vec3 },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Verdict {
    pub cancelled: bool,
    pub denial: Option<Denial>,
    pub effects: Vec<Effect>,
}

impl Verdict {
    pub fn allow() -> Self {
        Verdict::default()
    }

    pub fn deny(denial: Denial) -> Self {
        Verdict {
            cancelled: true,
            denial: Some(denial),
            effects: Vec::new(),
        }
    }

    /// Cancelled without a denial reason.
    pub fn cancel() -> Self {
        Verdict {
            cancelled: true,
            ..Verdict::default()
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_allowed(&self) -> bool {
        !self.cancelled
    }
}
