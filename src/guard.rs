//! Event gating.
//!
//! [`RegionGuard`] owns the region table, player sessions, the mute list and
//! the configuration, and turns each decoded [`GuardEvent`] into a
//! [`Verdict`]. It never talks to the engine directly.

use crate::bounding_box::Vec3;
use crate::config::GuardConfig;
use crate::error::FormatError;
use crate::event::{Actor, Denial, Effect, GuardEvent, Verdict};
use crate::flags::Flag;
use crate::region::Region;
use crate::session::{Corner, MuteList, Sessions};
use crate::store::RegionStore;
use crate::transition::{Transition, TransitionEvaluator};
use smol_str::SmolStr;
use tracing::{debug, info};

pub struct RegionGuard {
    pub(crate) store: RegionStore,
    pub(crate) sessions: Sessions,
    pub(crate) muted: MuteList,
    pub(crate) config: GuardConfig,
    transitions: TransitionEvaluator,
}

impl RegionGuard {
    /// A guard with an empty table. Nothing is read from disk.
    pub fn new(config: GuardConfig) -> Self {
        let transitions = TransitionEvaluator::new(config.fly_bypass_permission.as_str());
        RegionGuard {
            store: RegionStore::new(),
            sessions: Sessions::new(),
            muted: MuteList::new(),
            config,
            transitions,
        }
    }

    /// Builds a guard and loads `config.data_file` if it exists.
    ///
    /// Any load failure is returned as-is; the caller must not continue
    /// activation with a partial table.
    pub fn start(config: GuardConfig) -> Result<Self, FormatError> {
        let mut guard = RegionGuard::new(config);
        let path = guard.config.data_file.clone();
        if !guard.store.formats().supports(&path) {
            return Err(FormatError::UnsupportedExtension(path));
        }
        if path.exists() {
            guard.store.load_all(&path)?;
        } else {
            info!(path = %path.display(), "no region file yet, starting empty");
        }
        Ok(guard)
    }

    /// Flushes the table to `config.data_file`.
    pub fn stop(&self) -> Result<(), FormatError> {
        if let Some(parent) = self.config.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.store.save_all(&self.config.data_file)
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RegionStore {
        &mut self.store
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn mute_list(&self) -> &MuteList {
        &self.muted
    }

    pub fn mute_list_mut(&mut self) -> &mut MuteList {
        &mut self.muted
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Re-indexes a world's regions when it is loaded.
    pub fn activate_world(&mut self, world: &str) -> usize {
        self.store.rebuild_chunk_index(world)
    }

    pub fn region_at(&mut self, world: &str, position: Vec3) -> Option<&Region> {
        self.store.find_containing(world, position)
    }

    pub fn handle(&mut self, event: GuardEvent) -> Verdict {
        match event {
            GuardEvent::Join { actor } => self.on_join(&actor),
            GuardEvent::Quit { actor } => {
                self.sessions.quit(actor.id);
                Verdict::allow()
            }
            GuardEvent::BlockPlace { actor, block } | GuardEvent::BlockBreak { actor, block } => {
                self.on_edit(&actor, block)
            }
            GuardEvent::Interact {
                actor,
                block,
                block_id,
                item_id,
                right_click,
            } => self.on_interact(&actor, block, block_id, item_id, right_click),
            GuardEvent::Move { actor, from, to } => self.on_move(&actor, from, to),
            GuardEvent::PlayerDamage { victim, damager } => self.on_damage(&victim, &damager),
            GuardEvent::Command { actor, line } => self.on_command(&actor, &line),
            GuardEvent::ItemDrop { actor } => {
                self.gate_at_actor(&actor, Flag::ItemDrop, Denial::ItemDrop)
            }
            GuardEvent::Explosion { world, blocks } => self.on_explosion(&world, &blocks),
            GuardEvent::BedEnter { actor, bed } => self.on_sleep(&actor, bed),
            GuardEvent::Chat { actor, online } => self.on_chat(&actor, &online),
            GuardEvent::ProjectileLaunch {
                world,
                position,
                entity_id,
                shooter,
            } => self.on_projectile(&world, position, entity_id, shooter.as_ref()),
        }
    }

    fn on_join(&mut self, actor: &Actor) -> Verdict {
        let current = self
            .store
            .find_containing(&actor.world, actor.position)
            .map(|r| r.key().clone());
        self.sessions.join(actor.id).set_current_region(current);
        Verdict::allow()
    }

    fn on_edit(&mut self, actor: &Actor, block: Vec3) -> Verdict {
        let Self { store, config, .. } = self;
        match store.find_containing(&actor.world, block) {
            Some(region) if region.restricts(Flag::Editable) && !exempt(config, region, actor) => {
                Verdict::deny(Denial::Edit)
            }
            _ => Verdict::allow(),
        }
    }

    fn on_interact(
        &mut self,
        actor: &Actor,
        block: Vec3,
        block_id: u32,
        item_id: u32,
        right_click: bool,
    ) -> Verdict {
        if right_click {
            let session = self.sessions.session_mut(actor.id);
            let corner = Corner {
                position: block,
                world: actor.world.clone(),
            };
            if let Some(index) = session.record_wand_click(corner) {
                debug!(actor = %actor.name, corner = index + 1, position = %block, "wand selection");
                return Verdict::cancel().with_effect(Effect::CornerSelected {
                    index: index + 1,
                    position: block,
                });
            }
        }

        let Self { store, config, .. } = self;
        let Some(region) = store.find_containing(&actor.world, actor.position) else {
            return Verdict::allow();
        };
        if exempt(config, region, actor) {
            return Verdict::allow();
        }
        if region.restricts(Flag::Use) && config.usable_blocks.contains(&block_id) {
            return Verdict::deny(Denial::Interact { block_id });
        }
        if region.restricts(Flag::Potions) && config.potion_items.contains(&item_id) {
            return Verdict::deny(Denial::Potion { item_id });
        }
        if region.restricts(Flag::Editable) && config.tool_items.contains(&item_id) {
            return Verdict::deny(Denial::Tool { item_id });
        }
        Verdict::allow()
    }

    fn on_move(&mut self, actor: &Actor, from: Vec3, to: Vec3) -> Verdict {
        if from == to {
            return Verdict::allow();
        }
        // the recorded region counts only while it still holds `from`
        let old_name: Option<SmolStr> = match self.sessions.current_region(actor.id) {
            Some(name)
                if self
                    .store
                    .get(name)
                    .is_some_and(|r| r.world() == actor.world.as_str() && r.contains(from)) =>
            {
                Some(SmolStr::new(name))
            }
            _ => self
                .store
                .find_containing(&actor.world, from)
                .map(|r| r.key().clone()),
        };
        let new_name = self
            .store
            .find_containing(&actor.world, to)
            .map(|r| r.key().clone());
        if old_name == new_name {
            if self.sessions.current_region(actor.id) != new_name.as_deref() {
                self.sessions
                    .session_mut(actor.id)
                    .set_current_region(new_name);
            }
            return Verdict::allow();
        }

        let old = old_name.as_deref().and_then(|name| self.store.get(name));
        let new = new_name.as_deref().and_then(|name| self.store.get(name));
        match self.transitions.evaluate(actor, old, new) {
            Transition::Denied => {
                debug!(
                    actor = %actor.name,
                    from = old_name.as_deref().unwrap_or("-"),
                    to = new_name.as_deref().unwrap_or("-"),
                    "region transition denied"
                );
                let push = (from - to).normalize() * self.config.knockback_strength;
                Verdict::deny(Denial::Movement).with_effect(Effect::Knockback(push))
            }
            Transition::Allowed { revoke_flight } => {
                self.sessions
                    .session_mut(actor.id)
                    .set_current_region(new_name);
                let verdict = Verdict::allow();
                if revoke_flight {
                    verdict.with_effect(Effect::RevokeFlight)
                } else {
                    verdict
                }
            }
        }
    }

    /// Gated on the victim's position; a whitelisted damager is exempt.
    fn on_damage(&mut self, victim: &Actor, damager: &Actor) -> Verdict {
        let Self { store, config, .. } = self;
        match store.find_containing(&victim.world, victim.position) {
            Some(region) if region.restricts(Flag::Pvp) && !exempt(config, region, damager) => {
                Verdict::deny(Denial::Pvp)
            }
            _ => Verdict::allow(),
        }
    }

    fn on_command(&mut self, actor: &Actor, line: &str) -> Verdict {
        let Some(command) = line.split_whitespace().next() else {
            return Verdict::allow();
        };
        if !command.starts_with('/') {
            return Verdict::allow();
        }
        match self.store.find_containing(&actor.world, actor.position) {
            Some(region) if !region.is_command_allowed(command) => {
                Verdict::deny(Denial::Command(command.to_string()))
            }
            _ => Verdict::allow(),
        }
    }

    fn on_explosion(&mut self, world: &str, blocks: &[Vec3]) -> Verdict {
        for &block in blocks {
            if !self.store.index().has_any_region_at(world, block) {
                continue;
            }
            if let Some(region) = self.store.find_containing(world, block) {
                if region.restricts(Flag::Explosion) {
                    debug!(region = region.name(), "explosion cancelled");
                    return Verdict::deny(Denial::Explosion);
                }
            }
        }
        Verdict::allow()
    }

    fn on_sleep(&mut self, actor: &Actor, bed: Vec3) -> Verdict {
        let Self { store, config, .. } = self;
        match store.find_containing(&actor.world, bed) {
            Some(region) if region.restricts(Flag::Sleep) && !exempt(config, region, actor) => {
                Verdict::deny(Denial::Sleep)
            }
            _ => Verdict::allow(),
        }
    }

    fn on_chat(&mut self, actor: &Actor, online: &[SmolStr]) -> Verdict {
        let denied = self.gate_at_actor(actor, Flag::SendChat, Denial::Chat);
        if denied.cancelled || self.muted.is_empty() {
            return denied;
        }
        Verdict::allow().with_effect(Effect::Recipients(
            self.muted.recipients(online, &actor.name),
        ))
    }

    fn on_projectile(
        &mut self,
        world: &str,
        position: Vec3,
        entity_id: u32,
        shooter: Option<&Actor>,
    ) -> Verdict {
        if entity_id != self.config.pearl_entity_id {
            return Verdict::allow();
        }
        let Some(shooter) = shooter else {
            return Verdict::allow();
        };
        let Self { store, config, .. } = self;
        match store.find_containing(world, position) {
            Some(region)
                if region.restricts(Flag::Enderpearl) && !exempt(config, region, shooter) =>
            {
                Verdict::deny(Denial::EnderPearl)
            }
            _ => Verdict::allow(),
        }
    }

    /// Shared shape of the "region at the actor, `flag=false`, not exempt"
    /// checks.
    fn gate_at_actor(&mut self, actor: &Actor, flag: Flag, denial: Denial) -> Verdict {
        let Self { store, config, .. } = self;
        match store.find_containing(&actor.world, actor.position) {
            Some(region) if region.restricts(flag) && !exempt(config, region, actor) => {
                Verdict::deny(denial)
            }
            _ => Verdict::allow(),
        }
    }
}

fn exempt(config: &GuardConfig, region: &Region, actor: &Actor) -> bool {
    actor.has_permission(&config.bypass_permission) || region.is_whitelisted(actor)
}
