//! Per-player transient state and the chat mute list.

use crate::bounding_box::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

/// Engine-assigned player id.
pub type ActorId = u64;

/// A selection corner: position plus the world it was picked in.
#[derive(Debug, Clone, PartialEq)]
pub struct Corner {
    pub position: Vec3,
    pub world: SmolStr,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSession {
    current_region: Option<SmolStr>,
    corners: [Option<Corner>; 2],
    wand: bool,
}

impl PlayerSession {
    pub fn current_region(&self) -> Option<&str> {
        self.current_region.as_deref()
    }

    pub fn set_current_region(&mut self, region: Option<SmolStr>) {
        self.current_region = region;
    }

    /// `index` is 0 or 1.
    pub fn set_corner(&mut self, index: usize, corner: Corner) {
        self.corners[index] = Some(corner);
    }

    pub fn corner(&self, index: usize) -> Option<&Corner> {
        self.corners.get(index).and_then(Option::as_ref)
    }

    /// Both corners when the selection is complete.
    pub fn selection(&self) -> Option<(&Corner, &Corner)> {
        match &self.corners {
            [Some(a), Some(b)] => Some((a, b)),
            _ => None,
        }
    }

    pub fn clear_selection(&mut self) {
        self.corners = [None, None];
        self.wand = false;
    }

    pub fn start_wand(&mut self) {
        self.corners = [None, None];
        self.wand = true;
    }

    pub fn wand_active(&self) -> bool {
        self.wand
    }

    /// Records a wand click into the first empty corner and returns its index.
    /// The wand switches off once both corners are filled.
    pub fn record_wand_click(&mut self, corner: Corner) -> Option<usize> {
        if !self.wand {
            return None;
        }
        let index = self.corners.iter().position(Option::is_none)?;
        self.corners[index] = Some(corner);
        if index == 1 {
            self.wand = false;
        }
        Some(index)
    }
}

#[derive(Debug, Default)]
pub struct Sessions {
    players: FxHashMap<ActorId, PlayerSession>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a player, resetting any previous session.
    pub fn join(&mut self, id: ActorId) -> &mut PlayerSession {
        self.players.insert(id, PlayerSession::default());
        self.session_mut(id)
    }

    pub fn quit(&mut self, id: ActorId) -> Option<PlayerSession> {
        self.players.remove(&id)
    }

    pub fn get(&self, id: ActorId) -> Option<&PlayerSession> {
        self.players.get(&id)
    }

    /// Session for `id`, created on first use.
    pub fn session_mut(&mut self, id: ActorId) -> &mut PlayerSession {
        self.players.entry(id).or_default()
    }

    pub fn current_region(&self, id: ActorId) -> Option<&str> {
        self.get(id).and_then(PlayerSession::current_region)
    }

    /// Forgets a region in every session, e.g. after it was deleted.
    pub fn forget_region(&mut self, region: &str) {
        for session in self.players.values_mut() {
            if session.current_region() == Some(region) {
                session.current_region = None;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Players whose chat is hidden from everyone else.
#[derive(Debug, Default, Clone)]
pub struct MuteList {
    muted: FxHashSet<SmolStr>,
}

impl MuteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mute(&mut self, player: &str) -> bool {
        self.muted.insert(SmolStr::new(player.to_lowercase()))
    }

    pub fn unmute(&mut self, player: &str) -> bool {
        self.muted.remove(player.to_lowercase().as_str())
    }

    pub fn is_muted(&self, player: &str) -> bool {
        self.muted.contains(player.to_lowercase().as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.muted.is_empty()
    }

    /// Online players minus the muted ones. The sender always receives their
    /// own message.
    pub fn recipients(&self, online: &[SmolStr], sender: &str) -> Vec<SmolStr> {
        let mut recipients: Vec<SmolStr> = online
            .iter()
            .filter(|player| !self.is_muted(player))
            .cloned()
            .collect();
        if !recipients.iter().any(|player| player.eq_ignore_ascii_case(sender)) {
            recipients.push(SmolStr::new(sender));
        }
        recipients
    }
}
