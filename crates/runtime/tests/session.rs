mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{SharedHost, init_tracing};
use monarch_core::{PlayerId, Position, SkillId, Tick, WorldEvent};
use monarch_runtime::{
    ClientMessage, FileSaveRepository, InMemorySaveRepository, ItemStack, Observer, Outbound,
    PlayerRepository, Runtime, RuntimeConfig, RuntimeError, SaveData, ServerMessage, Topic,
    WireCodec,
};
use tokio::sync::mpsc;

const STEVE: PlayerId = PlayerId(1);

fn test_config(save_dir: &std::path::Path) -> RuntimeConfig {
    RuntimeConfig {
        save_dir: save_dir.to_path_buf(),
        session_seed: Some(42),
        ..RuntimeConfig::default()
    }
}

async fn next_for(rx: &mut mpsc::Receiver<Outbound>, player: PlayerId) -> ServerMessage {
    loop {
        let outbound = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("outbound message within timeout")
            .expect("outbound channel open");
        if outbound.player == player {
            return outbound.message;
        }
    }
}

async fn next_snapshot_level(rx: &mut mpsc::Receiver<Outbound>) -> u32 {
    loop {
        if let ServerMessage::FullSnapshot(snapshot) = next_for(rx, STEVE).await {
            return snapshot.record.level();
        }
    }
}

/// Full session through the async handle:
/// 1. A new player joins and the observer receives the default snapshot
/// 2. Two boss kills level the player up
/// 3. Requests are validated; refusals reach the observer as `Rejected`
/// 4. Leaving persists the record and rejoining restores it
#[tokio::test]
async fn session_levels_up_and_survives_rejoin() {
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let repository = Arc::new(InMemorySaveRepository::new());
    let host = SharedHost::new();
    host.add_player(STEVE, Position::ORIGIN);

    let mut runtime = Runtime::builder()
        .config(test_config(dir.path()))
        .repository(repository.clone())
        .build(host.clone())
        .await
        .expect("runtime should start");
    let mut outbound = runtime.take_outbound().expect("default sink");
    let handle = runtime.handle();
    let mut observer = Observer::new(STEVE);

    // ================================================================
    // PHASE 1: Join
    // ================================================================
    handle.join(STEVE).await.expect("join");
    let message = next_for(&mut outbound, STEVE).await;
    observer.apply(message);
    let snapshot = observer.snapshot().expect("initial snapshot");
    assert_eq!(snapshot.record.level(), 1);
    assert_eq!(snapshot.record.experience_to_next(), 500);

    // ================================================================
    // PHASE 2: Experience
    // ================================================================
    let mut progression = handle.subscribe(Topic::Progression);
    let boss = host.add_mob("minecraft:wither", Position::new(3.0, 0.0, 0.0), 200.0);
    for _ in 0..2 {
        let outcome = handle
            .world(WorldEvent::EntityKilled {
                killer: STEVE,
                victim: boss.clone(),
            })
            .await
            .expect("world event");
        assert_eq!(outcome.experience, 480);
    }
    assert_eq!(next_snapshot_level(&mut outbound).await, 1);
    assert_eq!(next_snapshot_level(&mut outbound).await, 2);
    assert!(progression.recv().await.is_ok());

    let snapshot = handle
        .query_snapshot(STEVE)
        .await
        .expect("query")
        .expect("joined player");
    assert_eq!(snapshot.record.level(), 2);
    assert_eq!(snapshot.record.experience(), 460);
    assert_eq!(snapshot.record.stat_points(), 5);

    // ================================================================
    // PHASE 3: Requests
    // ================================================================
    handle
        .submit(
            STEVE,
            ClientMessage::AllocateStat {
                stat: "strength".into(),
            },
        )
        .await
        .expect("allocation");

    let err = handle
        .submit(
            STEVE,
            ClientMessage::AllocateStat {
                stat: "luck".into(),
            },
        )
        .await
        .expect_err("unknown stat");
    match err {
        RuntimeError::Request(request) => assert_eq!(request.code(), "UNKNOWN_STAT"),
        other => panic!("unexpected error: {other}"),
    }

    let err = handle
        .submit_frame(STEVE, &[0xde, 0xad, 0xbe, 0xef, 0xff])
        .await
        .expect_err("garbage frame");
    assert!(matches!(err, RuntimeError::Codec(_)));

    let frame = WireCodec::encode_client(&ClientMessage::RequestSnapshot).expect("encode");
    handle.submit_frame(STEVE, &frame).await.expect("framed request");

    let mut saw_rejection = false;
    while !saw_rejection {
        let message = next_for(&mut outbound, STEVE).await;
        saw_rejection = matches!(message, ServerMessage::Rejected { .. });
        observer.apply(message);
    }
    assert_eq!(observer.last_rejection(), Some("There is no stat called 'luck'."));

    // ================================================================
    // PHASE 4: Leave and rejoin
    // ================================================================
    assert!(handle.leave(STEVE).await.expect("leave"));
    assert!(!handle.leave(STEVE).await.expect("second leave"));
    let saved: SaveData = repository
        .load(STEVE)
        .expect("load")
        .expect("save written on leave");
    assert_eq!(saved.level, 2);
    assert_eq!(saved.strength, 11);
    assert_eq!(saved.stat_points, 4);

    assert!(handle.query_snapshot(STEVE).await.expect("query").is_none());
    handle.join(STEVE).await.expect("rejoin");
    let snapshot = handle
        .query_snapshot(STEVE)
        .await
        .expect("query")
        .expect("rejoined");
    assert_eq!(snapshot.record.level(), 2);
    assert_eq!(snapshot.record.experience(), 460);
    assert_eq!(snapshot.record.stats().strength, 11);

    drop(handle);
    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn requests_from_unknown_players_are_refused_silently() {
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let mut runtime = Runtime::builder()
        .config(test_config(dir.path()))
        .repository(Arc::new(InMemorySaveRepository::new()))
        .build(SharedHost::new())
        .await
        .expect("runtime should start");
    let mut outbound = runtime.take_outbound().expect("default sink");
    let handle = runtime.handle();

    let err = handle
        .submit(PlayerId(77), ClientMessage::RequestSnapshot)
        .await
        .expect_err("not joined");
    match err {
        RuntimeError::Request(request) => assert_eq!(request.code(), "NOT_AUTHORIZED"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        handle.respawned(PlayerId(77)).await,
        Err(RuntimeError::UnknownPlayer(PlayerId(77)))
    ));
    assert!(outbound.try_recv().is_err());

    drop(handle);
    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn shutdown_writes_save_files() {
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let host = SharedHost::new();
    host.add_player(STEVE, Position::ORIGIN);
    host.give(STEVE, ItemStack::new("minecraft:diamond", 3));

    let runtime = Runtime::builder()
        .config(test_config(dir.path()))
        .build(host.clone())
        .await
        .expect("runtime should start");
    let handle = runtime.handle();

    handle.join(STEVE).await.expect("join");
    handle
        .admin(STEVE, |record, config| record.set_level(config, 9))
        .await
        .expect("admin edit");
    handle
        .submit(
            STEVE,
            ClientMessage::StoreItem {
                item: ItemStack::new("minecraft:diamond", 3),
            },
        )
        .await
        .expect("store");
    handle.tick(Tick(40)).await.expect("tick");

    drop(handle);
    runtime.shutdown().await.expect("shutdown");

    let repository = FileSaveRepository::new(dir.path()).expect("reopen");
    assert_eq!(repository.list_players().expect("list"), vec![STEVE]);
    let save = repository.load(STEVE).expect("load").expect("saved");
    assert_eq!(save.level, 9);
    assert_eq!(save.storage.len(), 1);
    assert!(save.saved_at.is_some());
    assert!(host.world().inventories[&STEVE].is_empty());
}

#[tokio::test]
async fn skill_events_reach_subscribers() {
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let host = SharedHost::new();
    host.add_player(STEVE, Position::ORIGIN);
    let runtime = Runtime::builder()
        .config(test_config(dir.path()))
        .repository(Arc::new(InMemorySaveRepository::new()))
        .build(host)
        .await
        .expect("runtime should start");
    let handle = runtime.handle();
    let mut skills = handle.subscribe(Topic::Skill);

    handle.join(STEVE).await.expect("join");
    let err = handle
        .submit(
            STEVE,
            ClientMessage::ActivateSkill {
                skill: SkillId::from("shadow_strike"),
            },
        )
        .await
        .expect_err("not unlocked yet");
    match err {
        RuntimeError::Request(request) => assert_eq!(request.code(), "SKILL_NOT_UNLOCKED"),
        other => panic!("unexpected error: {other}"),
    }
    let event = tokio::time::timeout(Duration::from_secs(2), skills.recv())
        .await
        .expect("event within timeout")
        .expect("bus open");
    assert_eq!(event.topic(), Topic::Skill);

    drop(handle);
    runtime.shutdown().await.expect("shutdown");
}
