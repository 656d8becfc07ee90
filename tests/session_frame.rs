use cgmath::Rad;
use voxel_frontier::{
    config::GameConfig,
    engine_state::{
        inventory::ItemKind,
        physics::player::PITCH_LIMIT,
        rendering::{DrawCommand, RecordingCanvas},
        session::{InteractionOutcome, Session},
        PlayerIntent,
    },
};

const FRAME_MS: f32 = 16.66;

fn seeded_session() -> Session {
    let mut config = GameConfig::default();
    config.world.seed = Some(1234);
    Session::new(config)
}

fn run_frames(session: &mut Session, frames: usize) {
    let idle = PlayerIntent::default();
    for _ in 0..frames {
        session.advance(FRAME_MS, &idle);
    }
}

#[test]
fn player_falls_onto_the_terrain_and_stays_there() {
    let mut session = seeded_session();
    let spawn_height = session.player().position.z;

    run_frames(&mut session, 120);

    let player = session.player();
    assert!(player.position.z <= spawn_height);
    assert!(player.position.z > session.config().world.kill_plane);
    assert_eq!(player.velocity.z, 0.0);

    let resting = player.position;
    run_frames(&mut session, 30);
    assert_eq!(session.player().position, resting);
}

#[test]
fn a_frame_starts_with_the_sky_and_draws_the_world() {
    let mut session = seeded_session();
    run_frames(&mut session, 60);

    let mut canvas = RecordingCanvas::new(1280.0, 720.0);
    session.render(&mut canvas, 0.0);

    assert!(matches!(canvas.commands.first(), Some(DrawCommand::Clear(_))));
    let polygons = canvas
        .commands
        .iter()
        .filter(|command| matches!(command, DrawCommand::Polygon(..)))
        .count();
    assert!(polygons > 10, "only {polygons} polygons drawn");
}

#[test]
fn new_world_resets_the_player_and_the_day() {
    let mut session = seeded_session();
    run_frames(&mut session, 200);
    assert_ne!(session.time_of_day(), 800);

    let intent = PlayerIntent {
        new_world: true,
        ..PlayerIntent::default()
    };
    session.advance(FRAME_MS, &intent);

    let position = session.player().position;
    assert_eq!((position.x, position.y), (0.0, 0.0));
    assert!(position.z <= 15.0 && position.z > 14.9);
    assert_eq!(session.time_of_day(), 800);
    assert_eq!(session.stats().health, 100.0);
}

#[test]
fn mining_the_ground_underfoot() {
    let mut session = seeded_session();
    run_frames(&mut session, 120);

    session.player_mut().pitch = Rad(PITCH_LIMIT);
    session.refresh_highlight();
    let target = session.highlight().expect("ground within reach").hit;

    let intent = PlayerIntent {
        interact: true,
        select_slot: Some(1),
        ..PlayerIntent::default()
    };
    let outcome = session.advance(FRAME_MS, &intent);

    assert_eq!(session.inventory().selected().kind, ItemKind::Pickaxe);
    assert_eq!(outcome, Some(InteractionOutcome::Mined(target)));
    assert!(!session.store().contains(
        target.position.x,
        target.position.y,
        target.position.z
    ));
}
