mod common;

use common::{SharedHost, init_tracing};
use monarch_content::ContentFactory;
use monarch_core::{
    DamageSource, EntityId, FixedRng, MinionCommand, PlayerId, Position, SkillId, Tick,
    WorldEvent,
};
use monarch_runtime::{
    Authority, ClientMessage, Event, EventBus, MinionEvent, ServerMessage, Topic,
};

const OWNER: PlayerId = PlayerId(3);

fn authority() -> Authority {
    let content = ContentFactory::bundled().expect("bundled content");
    Authority::new(content, 11, EventBus::new()).with_rng(FixedRng(0.0))
}

fn drain(authority: &mut Authority) -> Vec<(PlayerId, ServerMessage)> {
    let mut sink: Vec<(PlayerId, ServerMessage)> = Vec::new();
    authority.flush(&mut sink);
    sink
}

fn extract(authority: &mut Authority, host: &mut SharedHost) -> Result<(), String> {
    authority
        .handle_client(
            OWNER,
            ClientMessage::ActivateSkill {
                skill: SkillId::from("shadow_extraction"),
            },
            host,
        )
        .map_err(|e| e.code().to_string())
}

/// Raising, defending and losing a shadow soldier:
/// 1. Extraction at level 3 costs 90 mana and is refused below that
/// 2. A successful extraction consumes the corpse and grows the army
/// 3. Owner hits are ignored and other hits are mitigated
/// 4. The shadow dissipates once the owner is gone for longer than the timeout
#[test]
fn shadow_lifecycle() {
    init_tracing();
    let mut authority = authority();
    let mut host = SharedHost::new();
    host.add_player(OWNER, Position::ORIGIN);
    authority.join(OWNER, None);
    let mut minion_events = authority.events().subscribe(Topic::Minion);
    drain(&mut authority);

    // ================================================================
    // PHASE 1: Upgrade and cost
    // ================================================================
    authority.admin(OWNER, |record, _| record.set_stat_points(2));
    for _ in 0..2 {
        authority
            .handle_client(
                OWNER,
                ClientMessage::UpgradeSkill {
                    skill: SkillId::from("shadow_extraction"),
                },
                &mut host,
            )
            .expect("upgrade");
    }
    let level = authority
        .capability(OWNER)
        .and_then(|c| c.skills().get(&SkillId::from("shadow_extraction")).map(|s| s.level));
    assert_eq!(level, Some(3));

    authority.admin(OWNER, |record, _| record.set_resource(50.0));
    drain(&mut authority);
    host.add_corpse("minecraft:zombie", Position::new(1.0, 0.0, 1.0));

    assert_eq!(
        extract(&mut authority, &mut host),
        Err("INSUFFICIENT_RESOURCE".into())
    );
    assert!(drain(&mut authority).contains(&(
        OWNER,
        ServerMessage::Rejected {
            reason: "Not enough mana (90 required).".into()
        }
    )));

    // ================================================================
    // PHASE 2: Extraction
    // ================================================================
    authority.admin(OWNER, |record, _| record.set_resource(100.0));
    extract(&mut authority, &mut host).expect("extraction");

    let record = authority.capability(OWNER).expect("joined").record();
    assert!((record.mana() - 10.0).abs() < 1e-4);
    assert_eq!(authority.minions().count(OWNER), 1);
    assert!(host.world().corpses.is_empty());

    let minion: EntityId = match minion_events.try_recv().expect("spawn event") {
        Event::Minion(MinionEvent::Spawned { minion, owner, .. }) => {
            assert_eq!(owner, OWNER);
            minion
        }
        other => panic!("unexpected event: {other:?}"),
    };

    // ================================================================
    // PHASE 3: Incoming damage
    // ================================================================
    assert_eq!(
        authority.minion_damage(minion, DamageSource::Player(OWNER), 10.0),
        Some(0.0)
    );
    let mitigated = authority
        .minion_damage(minion, DamageSource::Entity(EntityId(9_999)), 10.0)
        .expect("managed minion");
    assert!((mitigated - 7.0).abs() < 1e-4);
    assert_eq!(
        authority.minion_damage(EntityId(9_999), DamageSource::Environment, 10.0),
        None
    );

    // ================================================================
    // PHASE 4: Owner absence
    // ================================================================
    host.remove_player(OWNER);
    authority.tick(Tick(6_000), &mut host);
    assert_eq!(authority.minions().count(OWNER), 1);

    authority.tick(Tick(6_001), &mut host);
    assert_eq!(authority.minions().count(OWNER), 0);
    assert!(host
        .world()
        .minion_commands
        .contains(&MinionCommand::Remove { minion }));
    assert!(matches!(
        minion_events.try_recv(),
        Ok(Event::Minion(MinionEvent::Dissipated { .. }))
    ));

    let sent = drain(&mut authority);
    let snapshot = sent
        .iter()
        .find_map(|(_, message)| match message {
            ServerMessage::FullSnapshot(snapshot) => Some(snapshot),
            _ => None,
        })
        .expect("dissipation resends the snapshot");
    assert_eq!(snapshot.army_size, 0);
}

#[test]
fn attackers_of_the_owner_become_targets() {
    init_tracing();
    let mut authority = authority();
    let mut host = SharedHost::new();
    host.add_player(OWNER, Position::ORIGIN);
    authority.join(OWNER, None);
    host.add_corpse("minecraft:skeleton", Position::new(1.0, 0.0, 0.0));
    extract(&mut authority, &mut host).expect("extraction");
    let attacker = host.add_mob("minecraft:zombie", Position::new(4.0, 0.0, 0.0), 20.0);

    authority.handle_world(
        WorldEvent::PlayerDamaged {
            player: OWNER,
            attacker: Some(attacker.id),
            amount: 3.0,
            health_after: 17.0,
            max_health: 20.0,
        },
        &mut host,
    );
    authority.tick(Tick(1), &mut host);

    let commands = host.world().minion_commands.clone();
    assert!(
        commands
            .iter()
            .any(|c| matches!(c, MinionCommand::Attack { target, .. } if *target == attacker.id)),
        "expected an attack on the owner's attacker, got {commands:?}"
    );
}
