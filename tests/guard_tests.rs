use regionguard::{
    Actor, Denial, Effect, Flag, FlagValue, GuardConfig, GuardEvent, RegionGuard, Vec3,
};
use smol_str::SmolStr;

fn v(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

fn player(id: u64, name: &str, position: Vec3) -> Actor {
    Actor::new(id, name, "earth", position)
}

fn guard() -> RegionGuard {
    RegionGuard::new(GuardConfig::default())
}

fn add_region(guard: &mut RegionGuard, name: &str, min: Vec3, max: Vec3, flags: &[(Flag, FlagValue)]) {
    let store = guard.store_mut();
    store.create(name, min, max, "earth").unwrap();
    for (flag, value) in flags {
        store.set_flag(name, flag.name(), value.clone()).unwrap();
    }
}

fn place(guard: &mut RegionGuard, actor: &Actor, block: Vec3) -> bool {
    guard
        .handle(GuardEvent::BlockPlace {
            actor: actor.clone(),
            block,
        })
        .is_allowed()
}

/// Shop scenario: a non-editable region blocks building inside it and nowhere
/// else.
#[test]
fn test_shop_blocks_placement_inside_only() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "shop",
        v(0.0, 0.0, 0.0),
        v(10.0, 10.0, 10.0),
        &[(Flag::Editable, FlagValue::False)],
    );
    let steve = player(1, "steve", v(5.0, 5.0, 5.0));

    let verdict = guard.handle(GuardEvent::BlockPlace {
        actor: steve.clone(),
        block: v(5.0, 5.0, 5.0),
    });
    assert!(verdict.cancelled);
    assert_eq!(verdict.denial, Some(Denial::Edit));

    assert!(guard.region_at("earth", v(20.0, 20.0, 20.0)).is_none());
    assert!(place(&mut guard, &steve, v(20.0, 20.0, 20.0)));

    let broken = guard.handle(GuardEvent::BlockBreak {
        actor: steve,
        block: v(0.0, 10.0, 0.0),
    });
    assert_eq!(broken.denial, Some(Denial::Edit));
}

#[test]
fn test_whitelisted_actor_may_edit() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "shop",
        v(0.0, 0.0, 0.0),
        v(10.0, 10.0, 10.0),
        &[(Flag::Editable, FlagValue::False)],
    );
    guard.whitelist_add("shop", "Owner").unwrap();
    let owner = player(2, "owner", v(5.0, 5.0, 5.0));
    assert!(place(&mut guard, &owner, v(5.0, 5.0, 5.0)));
}

/// No flag allows PvP, `pvp=false` blocks it, removing the flag restores it.
#[test]
fn test_pvp_follows_flag_lifecycle() {
    let mut guard = guard();
    add_region(&mut guard, "arena", v(0.0, 0.0, 0.0), v(10.0, 10.0, 10.0), &[]);
    let victim = player(1, "victim", v(5.0, 5.0, 5.0));
    let attacker = player(2, "attacker", v(6.0, 5.0, 5.0));
    let hit = |guard: &mut RegionGuard| {
        guard.handle(GuardEvent::PlayerDamage {
            victim: victim.clone(),
            damager: attacker.clone(),
        })
    };

    assert!(hit(&mut guard).is_allowed());

    guard.set_region_flag("arena", "pvp", "false").unwrap();
    let verdict = hit(&mut guard);
    assert!(verdict.cancelled);
    assert_eq!(verdict.denial, Some(Denial::Pvp));

    guard.whitelist_add("arena", "attacker").unwrap();
    assert!(hit(&mut guard).is_allowed());
    guard.whitelist_remove("arena", "attacker").unwrap();

    assert!(guard.unset_region_flag("arena", "pvp").unwrap());
    assert!(hit(&mut guard).is_allowed());
}

fn walk(guard: &mut RegionGuard, actor: &Actor, from: Vec3, to: Vec3) -> regionguard::Verdict {
    guard.handle(GuardEvent::Move {
        actor: actor.clone().at(to),
        from,
        to,
    })
}

#[test]
fn test_cannot_leave_holds_player_in_place() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "jail",
        v(0.0, 0.0, 0.0),
        v(10.0, 10.0, 10.0),
        &[(Flag::CannotLeave, FlagValue::True)],
    );
    add_region(&mut guard, "yard", v(11.0, 0.0, 0.0), v(20.0, 10.0, 10.0), &[]);
    let steve = player(1, "steve", v(5.0, 5.0, 5.0));
    guard.handle(GuardEvent::Join {
        actor: steve.clone(),
    });
    assert_eq!(guard.sessions().current_region(1), Some("jail"));

    // moving inside the jail is fine
    assert!(walk(&mut guard, &steve, v(5.0, 5.0, 5.0), v(9.0, 5.0, 5.0)).is_allowed());

    for target in [v(15.0, 5.0, 5.0), v(50.0, 5.0, 5.0)] {
        let verdict = walk(&mut guard, &steve, v(9.0, 5.0, 5.0), target);
        assert!(verdict.cancelled);
        assert_eq!(verdict.denial, Some(Denial::Movement));
        match verdict.effects.as_slice() {
            [Effect::Knockback(push)] => {
                assert!(push.x < 0.0, "push should point back toward the jail");
                assert!((push.length() - 4.0).abs() < 1e-9);
            }
            other => panic!("unexpected effects {:?}", other),
        }
        assert_eq!(guard.sessions().current_region(1), Some("jail"));
    }
}

#[test]
fn test_cannot_enter_keeps_player_out() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "vault",
        v(0.0, 0.0, 0.0),
        v(10.0, 10.0, 10.0),
        &[(Flag::CannotEnter, FlagValue::True)],
    );
    let steve = player(1, "steve", v(-5.0, 5.0, 5.0));
    guard.handle(GuardEvent::Join {
        actor: steve.clone(),
    });
    let verdict = walk(&mut guard, &steve, v(-5.0, 5.0, 5.0), v(1.0, 5.0, 5.0));
    assert_eq!(verdict.denial, Some(Denial::Movement));
    assert_eq!(guard.sessions().current_region(1), None);
}

#[test]
fn test_moving_between_plain_regions_updates_session() {
    let mut guard = guard();
    add_region(&mut guard, "a", v(0.0, 0.0, 0.0), v(10.0, 10.0, 10.0), &[]);
    add_region(&mut guard, "b", v(11.0, 0.0, 0.0), v(20.0, 10.0, 10.0), &[]);
    let steve = player(1, "steve", v(5.0, 5.0, 5.0));
    guard.handle(GuardEvent::Join {
        actor: steve.clone(),
    });

    let verdict = walk(&mut guard, &steve, v(5.0, 5.0, 5.0), v(15.0, 5.0, 5.0));
    assert!(verdict.is_allowed());
    assert!(verdict.effects.is_empty());
    assert_eq!(guard.sessions().current_region(1), Some("b"));

    walk(&mut guard, &steve, v(15.0, 5.0, 5.0), v(40.0, 5.0, 5.0));
    assert_eq!(guard.sessions().current_region(1), None);
}

/// Known quirk: leaving a `can-fly` region revokes flight, but entering one
/// never grants it. Granting is left to the ability manager.
#[test]
fn test_can_fly_is_only_enforced_on_exit() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "sky",
        v(0.0, 0.0, 0.0),
        v(10.0, 100.0, 10.0),
        &[(Flag::CanFly, FlagValue::True)],
    );
    let steve = player(1, "steve", v(-5.0, 50.0, 5.0));
    guard.handle(GuardEvent::Join {
        actor: steve.clone(),
    });

    let entering = walk(&mut guard, &steve, v(-5.0, 50.0, 5.0), v(5.0, 50.0, 5.0));
    assert!(entering.is_allowed());
    assert!(entering.effects.is_empty());

    let leaving = walk(&mut guard, &steve, v(5.0, 50.0, 5.0), v(-5.0, 50.0, 5.0));
    assert_eq!(leaving.effects, vec![Effect::RevokeFlight]);

    let pilot = player(2, "pilot", v(5.0, 50.0, 5.0)).with_permission("worldguard.fly.bypass");
    guard.handle(GuardEvent::Join {
        actor: pilot.clone(),
    });
    let leaving = walk(&mut guard, &pilot, v(5.0, 50.0, 5.0), v(-5.0, 50.0, 5.0));
    assert!(leaving.effects.is_empty());
}

#[test]
fn test_deleted_region_no_longer_blocks_movement() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "jail",
        v(0.0, 0.0, 0.0),
        v(10.0, 10.0, 10.0),
        &[(Flag::CannotLeave, FlagValue::True)],
    );
    let steve = player(1, "steve", v(5.0, 5.0, 5.0));
    guard.handle(GuardEvent::Join {
        actor: steve.clone(),
    });
    guard.delete_region("jail").unwrap();
    assert!(walk(&mut guard, &steve, v(5.0, 5.0, 5.0), v(30.0, 5.0, 5.0)).is_allowed());
}

/// A region deleted straight from the store and recreated elsewhere under the
/// same name must not hold players who were inside the old one.
#[test]
fn test_recreated_region_does_not_hold_previous_occupants() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "jail",
        v(0.0, 0.0, 0.0),
        v(10.0, 10.0, 10.0),
        &[(Flag::CannotLeave, FlagValue::True)],
    );
    let steve = player(1, "steve", v(5.0, 5.0, 5.0));
    guard.handle(GuardEvent::Join {
        actor: steve.clone(),
    });
    assert_eq!(guard.sessions().current_region(1), Some("jail"));

    assert!(guard.store_mut().delete("jail"));
    add_region(
        &mut guard,
        "jail",
        v(100.0, 0.0, 100.0),
        v(110.0, 10.0, 110.0),
        &[(Flag::CannotLeave, FlagValue::True)],
    );

    let verdict = walk(&mut guard, &steve, v(5.0, 5.0, 5.0), v(30.0, 5.0, 5.0));
    assert!(verdict.is_allowed());
    assert_eq!(guard.sessions().current_region(1), None);

    // the new jail still holds whoever walks into it
    walk(&mut guard, &steve, v(99.0, 5.0, 105.0), v(105.0, 5.0, 105.0));
    assert_eq!(guard.sessions().current_region(1), Some("jail"));
    let verdict = walk(&mut guard, &steve, v(105.0, 5.0, 105.0), v(120.0, 5.0, 105.0));
    assert_eq!(verdict.denial, Some(Denial::Movement));
}

#[test]
fn test_interact_gates_by_block_and_item_lists() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "town",
        v(0.0, 0.0, 0.0),
        v(50.0, 50.0, 50.0),
        &[
            (Flag::Use, FlagValue::False),
            (Flag::Potions, FlagValue::False),
            (Flag::Editable, FlagValue::False),
        ],
    );
    let steve = player(1, "steve", v(5.0, 5.0, 5.0));
    let interact = |guard: &mut RegionGuard, block_id: u32, item_id: u32| {
        guard.handle(GuardEvent::Interact {
            actor: steve.clone(),
            block: v(6.0, 5.0, 5.0),
            block_id,
            item_id,
            right_click: true,
        })
    };

    // chest
    assert_eq!(interact(&mut guard, 54, 0).denial, Some(Denial::Interact { block_id: 54 }));
    // splash potion on stone
    assert_eq!(interact(&mut guard, 1, 438).denial, Some(Denial::Potion { item_id: 438 }));
    // bucket on stone
    assert_eq!(interact(&mut guard, 1, 325).denial, Some(Denial::Tool { item_id: 325 }));
    // bread on stone
    assert!(interact(&mut guard, 1, 297).is_allowed());
}

#[test]
fn test_interact_without_flags_is_allowed() {
    let mut guard = guard();
    add_region(&mut guard, "park", v(0.0, 0.0, 0.0), v(50.0, 50.0, 50.0), &[]);
    let verdict = guard.handle(GuardEvent::Interact {
        actor: player(1, "steve", v(5.0, 5.0, 5.0)),
        block: v(6.0, 5.0, 5.0),
        block_id: 54,
        item_id: 325,
        right_click: true,
    });
    assert!(verdict.is_allowed());
}

#[test]
fn test_command_lists_apply_to_slash_commands_only() {
    let mut guard = guard();
    add_region(&mut guard, "pit", v(0.0, 0.0, 0.0), v(10.0, 10.0, 10.0), &[]);
    guard.set_region_flag("pit", "blocked-cmds", "/home,/tpa").unwrap();
    let steve = player(1, "steve", v(5.0, 5.0, 5.0));
    let run = |guard: &mut RegionGuard, line: &str| {
        guard.handle(GuardEvent::Command {
            actor: steve.clone(),
            line: line.to_string(),
        })
    };

    assert_eq!(run(&mut guard, "/home base").denial, Some(Denial::Command("/home".to_string())));
    assert!(run(&mut guard, "/spawn").is_allowed());
    assert!(run(&mut guard, "home please").is_allowed());
    assert!(run(&mut guard, "").is_allowed());
}

#[test]
fn test_item_drop_sleep_and_chat_flags() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "library",
        v(0.0, 0.0, 0.0),
        v(10.0, 10.0, 10.0),
        &[
            (Flag::ItemDrop, FlagValue::False),
            (Flag::Sleep, FlagValue::False),
            (Flag::SendChat, FlagValue::False),
        ],
    );
    let steve = player(1, "steve", v(5.0, 5.0, 5.0));
    let outside = player(2, "alex", v(50.0, 5.0, 5.0));

    let dropped = guard.handle(GuardEvent::ItemDrop {
        actor: steve.clone(),
    });
    assert_eq!(dropped.denial, Some(Denial::ItemDrop));
    assert!(guard
        .handle(GuardEvent::ItemDrop {
            actor: outside.clone()
        })
        .is_allowed());

    let slept = guard.handle(GuardEvent::BedEnter {
        actor: outside.clone(),
        bed: v(2.0, 1.0, 2.0),
    });
    assert_eq!(slept.denial, Some(Denial::Sleep));

    let chat = guard.handle(GuardEvent::Chat {
        actor: steve,
        online: vec!["steve".into(), "alex".into()],
    });
    assert_eq!(chat.denial, Some(Denial::Chat));
}

#[test]
fn test_mute_list_narrows_chat_recipients() {
    let mut guard = guard();
    let alex = player(2, "alex", v(50.0, 5.0, 5.0));
    let online: Vec<SmolStr> = vec!["steve".into(), "alex".into(), "bob".into()];

    let plain = guard.handle(GuardEvent::Chat {
        actor: alex.clone(),
        online: online.clone(),
    });
    assert!(plain.effects.is_empty());

    guard.mute_list_mut().mute("bob");
    let narrowed = guard.handle(GuardEvent::Chat {
        actor: alex,
        online,
    });
    assert!(narrowed.is_allowed());
    assert_eq!(
        narrowed.effects,
        vec![Effect::Recipients(vec!["steve".into(), "alex".into()])]
    );
}

#[test]
fn test_explosion_is_cancelled_by_any_protected_block() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "bunker",
        v(100.0, 0.0, 100.0),
        v(110.0, 10.0, 110.0),
        &[(Flag::Explosion, FlagValue::False)],
    );
    add_region(&mut guard, "field", v(0.0, 0.0, 0.0), v(10.0, 10.0, 10.0), &[]);

    let harmless = guard.handle(GuardEvent::Explosion {
        world: "earth".into(),
        blocks: vec![v(1.0, 1.0, 1.0), v(500.0, 1.0, 500.0)],
    });
    assert!(harmless.is_allowed());

    let blocked = guard.handle(GuardEvent::Explosion {
        world: "earth".into(),
        blocks: vec![v(1.0, 1.0, 1.0), v(99.0, 1.0, 100.0), v(100.0, 1.0, 100.0)],
    });
    assert_eq!(blocked.denial, Some(Denial::Explosion));
}

#[test]
fn test_ender_pearls_check_the_shooter() {
    let mut guard = guard();
    add_region(
        &mut guard,
        "arena",
        v(0.0, 0.0, 0.0),
        v(10.0, 10.0, 10.0),
        &[(Flag::Enderpearl, FlagValue::False)],
    );
    guard.whitelist_add("arena", "judge").unwrap();
    let launch = |guard: &mut RegionGuard, entity_id: u32, shooter: Option<Actor>| {
        guard.handle(GuardEvent::ProjectileLaunch {
            world: "earth".into(),
            position: v(5.0, 5.0, 5.0),
            entity_id,
            shooter,
        })
    };

    let steve = player(1, "steve", v(5.0, 5.0, 5.0));
    assert_eq!(
        launch(&mut guard, 87, Some(steve.clone())).denial,
        Some(Denial::EnderPearl)
    );
    // snowball
    assert!(launch(&mut guard, 81, Some(steve)).is_allowed());
    assert!(launch(&mut guard, 87, None).is_allowed());
    assert!(launch(&mut guard, 87, Some(player(3, "judge", v(5.0, 5.0, 5.0)))).is_allowed());
}
