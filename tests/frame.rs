use raycast_engine::input::{Command, InputState, TurnRates};
use raycast_engine::{
    Camera, EngineConfig, EngineError, FrameConfig, Obstacle, RayCaster, World, WorldBounds,
    cast_fan, render_frame,
};

fn facing_wall() -> (World, Camera) {
    let world = World::new(vec![Obstacle::wall([250.0, 100.0], [650.0, 100.0])]);
    let camera = Camera {
        fov: 90.0,
        density: 5.0,
        max_range: 800.0,
        ..Camera::new([300.0, 250.0], 270.0)
    };
    (world, camera)
}

#[test]
fn center_ray_hits_wall_ahead() {
    let (world, camera) = facing_wall();
    let config = FrameConfig::new([1280, 640]);

    let hits = cast_fan(&camera, &world, &config).unwrap();
    assert_eq!(hits.len(), 19);

    let center = hits[hits.len() / 2].expect("center ray hits the wall");
    assert!((center.distance - 150.0).abs() <= 1.0, "distance {}", center.distance);
    assert_eq!(center.obstacle, 0);
    assert_eq!(center.angle, 270.0);
}

#[test]
fn frame_has_one_column_per_hit() {
    let (world, camera) = facing_wall();
    let config = FrameConfig::new([1280, 640]);

    let hits = cast_fan(&camera, &world, &config).unwrap();
    let columns = render_frame(&camera, &world, &config).unwrap();
    assert_eq!(columns.len(), hits.iter().flatten().count());

    // Wall spans x in [250, 650]: rays leaning left of x = 250 miss it.
    assert!(hits[0].is_none());
    assert!(hits[18].is_some());

    let width = 1280 / 19;
    for col in &columns {
        assert_eq!(col.width, width as f32);
        assert_eq!(col.x, (col.ray * width) as f32);
        assert!(col.shade > 0.0 && col.shade < 255.0);
    }
}

#[test]
fn flat_wall_projects_to_equal_heights() {
    // Fish-eye correction makes a wall perpendicular to the heading uniform.
    let (world, camera) = facing_wall();
    let columns = render_frame(&camera, &world, &FrameConfig::new([1280, 640])).unwrap();
    let center = columns.iter().find(|c| c.ray == 9).unwrap();
    for col in &columns {
        let ratio = col.height / center.height;
        assert!((ratio - 1.0).abs() < 0.02, "ray {} ratio {ratio}", col.ray);
    }
}

#[test]
fn empty_world_renders_nothing() {
    let camera = Camera::new([0.0, 0.0], 0.0);
    let columns = render_frame(&camera, &World::default(), &FrameConfig::new([640, 480])).unwrap();
    assert!(columns.is_empty());
}

#[test]
fn degenerate_settings_fail_fast() {
    let (world, mut camera) = facing_wall();
    let mut config = FrameConfig::new([1280, 640]);
    config.caster = RayCaster {
        step: 0.0,
        ..RayCaster::default()
    };
    assert!(matches!(
        render_frame(&camera, &world, &config),
        Err(EngineError::InvalidArgument { name: "step", .. })
    ));

    camera.density = 0.0;
    let config = FrameConfig::new([1280, 640]);
    assert!(matches!(
        render_frame(&camera, &world, &config),
        Err(EngineError::InvalidArgument { name: "density", .. })
    ));
}

#[test]
fn demo_scene_from_default_config() {
    let config = EngineConfig::default();
    let camera = config.camera();
    let world = config.world();
    let frame = config.frame_config();

    let hits = cast_fan(&camera, &world, &frame).unwrap();
    assert_eq!(hits.len(), 91);
    let columns = render_frame(&camera, &world, &frame).unwrap();
    // The player starts inside the outer hollow block.
    assert_eq!(columns.len(), 91);
    assert!(columns.iter().all(|c| c.height > 0.0));
}

#[test]
fn walking_through_the_right_edge_wraps() {
    let bounds = WorldBounds::new(1280.0 / 2.0, 640.0);
    let mut camera = Camera {
        speed: 2.0,
        ..Camera::new([1280.0 / 2.0 + 1.0, 300.0], 0.0)
    };
    let mut input = InputState::new();
    input.press(Command::Forward);
    input.apply(&mut camera, TurnRates::default(), &bounds);
    assert_eq!(camera.pos, [0.0, 300.0]);
}

#[test]
fn non_finite_range_fails_instead_of_marching_forever() {
    // Single ray pointing away from the only wall: nothing would stop it.
    let world = World::new(vec![Obstacle::wall([-100.0, -10.0], [-100.0, 10.0])]);
    let config = FrameConfig::new([640, 480]);
    for max_range in [f32::NAN, f32::INFINITY] {
        let camera = Camera {
            fov: 0.0,
            density: 1.0,
            max_range,
            ..Camera::new([0.0, 0.0], 0.0)
        };
        assert!(matches!(
            render_frame(&camera, &world, &config),
            Err(EngineError::InvalidArgument { name: "max_range", .. })
        ));
    }
}
