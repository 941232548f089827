use std::time::Duration;

use dungeonion_core::{Command, EnemyKind, Event, Health, MapSnapshot, RoundPhase, TileId};
use dungeonion_simulation::{Session, SessionConfig};
use dungeonion_system_player_control::PlayerInput;
use dungeonion_system_round_director::Config as DirectorConfig;
use dungeonion_world::query;
use glam::Vec2;

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn crab_strikes_once_when_teleported_into_melee_range() {
    let mut session = Session::new(SessionConfig::new(21));
    let spawned = session.submit(Command::SpawnEnemy {
        kind: EnemyKind::Crab,
        position: Vec2::new(300.0, 160.0),
        max_health: Health::ZERO,
    });
    let crab = spawned
        .iter()
        .find_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .expect("crab spawned");

    let events = session.step(&PlayerInput::IDLE, FRAME).to_vec();
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::PlayerDamaged { .. })),
        "a crab 44px away must not strike",
    );
    assert_eq!(query::player(session.world()).health, Health::new(100));

    let _ = session.submit(Command::RelocateEnemy {
        enemy: crab,
        position: Vec2::new(260.0, 164.0),
    });
    let events = session.step(&PlayerInput::IDLE, FRAME).to_vec();
    let strikes: Vec<&Event> = events
        .iter()
        .filter(|event| matches!(event, Event::PlayerDamaged { .. }))
        .collect();
    assert_eq!(
        strikes,
        vec![&Event::PlayerDamaged {
            source: crab,
            amount: 10,
            health: Health::new(90),
        }],
    );

    let view = query::enemy_view(session.world());
    let snapshot = view.get(crab).expect("crab still tracked");
    assert_eq!(snapshot.attack_cooldown, Duration::from_millis(1_000));
}

#[test]
fn expansion_grows_the_default_dungeon_around_its_centre() {
    let director = DirectorConfig::default().with_expansion(0, 1.8, 10);
    let mut session = Session::new(SessionConfig::new(4).with_director(director));
    let before = session.map_snapshot();

    assert!(session.expand_map());

    let after = session.map_snapshot();
    assert_eq!((after.width, after.height), (42, 30));
    assert_eq!(after.grid[5][5], before.grid[0][0]);
    assert_eq!(after.grid[5][5], vec![TileId::DEFAULT_FLOOR, TileId::new(13)]);
    assert_eq!(after.grid[0][0], vec![TileId::DEFAULT_FLOOR]);
    assert_eq!(after.grid[29][41], vec![TileId::DEFAULT_FLOOR]);
    assert_eq!(
        query::player(session.world()).position,
        Vec2::new(256.0 + 80.0, 160.0 + 80.0),
    );
}

#[test]
fn full_size_arena_refuses_further_expansion() {
    let director = DirectorConfig::default().with_expansion(0, 1.8, 10);
    let mut session = Session::new(SessionConfig::new(4).with_director(director));
    session.load_map(MapSnapshot::filled(1_020, 8, 16, TileId::DEFAULT_FLOOR));

    assert!(session.expand_map());
    let grown = session.map_snapshot();
    assert_eq!((grown.width, grown.height), (1_024, 12));

    assert!(!session.expand_map());
    let unchanged = session.map_snapshot();
    assert_eq!((unchanged.width, unchanged.height), (1_024, 12));
}

#[test]
fn map_survives_export_and_reload() {
    let mut session = Session::new(SessionConfig::new(8));
    let _ = session.submit(Command::PaintTile {
        row: 3,
        column: 4,
        tile: TileId::new(7),
    });
    let snapshot = session.map_snapshot();

    let mut other = Session::new(SessionConfig::new(99));
    other.load_map(snapshot.clone());
    assert_eq!(other.map_snapshot(), snapshot);
}

#[test]
fn winning_the_final_round_pauses_the_session() {
    let director = DirectorConfig::default()
        .with_rounds(1, Duration::ZERO)
        .with_wave_size(0);
    let mut session = Session::new(SessionConfig::new(6).with_director(director));

    let _ = session.step(&PlayerInput::IDLE, FRAME);
    assert_eq!(session.round_state().phase(), RoundPhase::BetweenRounds);
    assert!(!session.is_paused());

    let _ = session.step(&PlayerInput::IDLE, FRAME);
    assert_eq!(session.round_state().phase(), RoundPhase::Won);
    assert!(session.is_paused());

    session.resume();
    assert!(session.is_paused(), "a won session stays paused");
    assert_eq!(session.hud().phase, RoundPhase::Won);
}

#[test]
fn cleared_round_advances_after_the_pause() {
    let director = DirectorConfig::default()
        .with_rounds(3, Duration::from_millis(32))
        .with_wave_size(0);
    let mut session = Session::new(SessionConfig::new(6).with_director(director));

    let _ = session.step(&PlayerInput::IDLE, FRAME);
    assert_eq!(session.round_state().phase(), RoundPhase::BetweenRounds);
    assert_eq!(session.round_state().round(), 1);

    let _ = session.step(&PlayerInput::IDLE, FRAME);
    assert_eq!(session.round_state().phase(), RoundPhase::BetweenRounds);
    assert_eq!(session.round_state().round(), 1);

    let _ = session.step(&PlayerInput::IDLE, FRAME);
    assert_eq!(session.round_state().round(), 2);
}

#[test]
fn player_walks_and_fires_through_input() {
    let mut session = Session::new(SessionConfig::new(12));
    let input = PlayerInput::moving(1, 0).firing_at(Vec2::new(400.0, 168.0));
    let events = session.step(&input, FRAME).to_vec();

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProjectileFired { .. })));
    let player = query::player(session.world());
    assert_eq!(player.heading, (1, 0));
    assert!(player.position.x > 256.0);
}
