use spotlit_scene::animation::{sphere_position, CUBE_ROTATION_STEP};
use spotlit_scene::{Controls, FrameLoop, SceneState, Variant};

/// Drives the state the way the app does on each redraw.
fn redraw(state: &mut SceneState, frame_loop: &mut FrameLoop) {
    if frame_loop.tick() {
        state.advance_frame();
    }
}

#[test]
fn static_scene_renders_identically_twice() {
    let state = SceneState::bootstrap(Variant::Static, 1024, 768);
    assert_eq!(state.frame_data(), state.frame_data());
}

#[test]
fn scene_population_per_variant() {
    assert_eq!(SceneState::bootstrap(Variant::Static, 640, 480).scene.len(), 4);
    assert_eq!(SceneState::bootstrap(Variant::Animated, 640, 480).scene.len(), 5);
    assert_eq!(
        SceneState::bootstrap(Variant::Animated, 640, 480)
            .scene
            .meshes()
            .count(),
        3
    );
}

#[test]
fn phase_grows_linearly_with_frames() {
    let mut state = SceneState::bootstrap(Variant::Animated, 800, 600);
    let mut frame_loop = FrameLoop::new();
    frame_loop.start();

    let frames = 250;
    for _ in 0..frames {
        redraw(&mut state, &mut frame_loop);
    }

    let expected = frames as f64 * f64::from(Controls::DEFAULT_BOUNCING_SPEED);
    assert!((state.phase() - expected).abs() < 1e-3, "phase = {}", state.phase());

    let cube = state.scene.mesh(state.cube()).unwrap();
    let spun = frames as f32 * CUBE_ROTATION_STEP;
    assert!((cube.rotation.x - spun).abs() < 1e-3);
}

#[test]
fn sphere_follows_bounce_path_every_frame() {
    let mut state = SceneState::bootstrap(Variant::Animated, 800, 600);
    state.controls.set_bouncing_speed(0.5);
    for _ in 0..500 {
        state.advance_frame();
        let sphere = state.scene.mesh(state.sphere()).unwrap();
        assert!(sphere.position.y >= 2.0);
        assert!((10.0..=30.0).contains(&sphere.position.x));
        assert_eq!(sphere.position, sphere_position(state.phase(), 2.0));
    }
}

#[test]
fn resize_updates_camera_and_surface() {
    let mut state = SceneState::bootstrap(Variant::Animated, 800, 600);
    for (width, height) in [(1920_u32, 1080_u32), (333, 777), (1, 1)] {
        assert!(state.resize(width, height));
        assert_eq!(state.camera.aspect, width as f32 / height as f32);
        assert_eq!(state.surface_size(), (width, height));
    }
}

#[test]
fn boundary_speeds_reach_the_next_frame() {
    let mut state = SceneState::bootstrap(Variant::Animated, 800, 600);

    state.controls.set_bouncing_speed(0.0);
    state.advance_frame();
    assert_eq!(state.phase(), 0.0);

    state.controls.set_bouncing_speed(0.5);
    state.advance_frame();
    assert_eq!(state.phase(), 0.5);

    state.controls.set_bouncing_speed(7.0);
    state.advance_frame();
    assert_eq!(state.phase(), 1.0);
}

#[test]
fn stopped_loop_freezes_the_scene() {
    let mut state = SceneState::bootstrap(Variant::Animated, 800, 600);
    let mut frame_loop = FrameLoop::new();
    frame_loop.start();
    redraw(&mut state, &mut frame_loop);

    frame_loop.stop();
    let frozen = state.frame_data();
    for _ in 0..10 {
        redraw(&mut state, &mut frame_loop);
    }
    assert_eq!(state.frame_data(), frozen);
    assert_eq!(frame_loop.frames(), 1);
}
