//! Headless turntable demo: builds a small scene, spins it for a few frames
//! against the trace backend and runs a hit test at the viewport centre.
//!
//! Run with `RUST_LOG=debug cargo run --example turntable` to see the
//! degradation/truncation logging paths.

use tartan::prelude::*;

fn main() {
    env_logger::init();

    let mut backend = TraceBackend::new();
    let mut scene = Scene::new();
    scene.design_mode = true;
    scene.initialise(&mut backend);
    scene.resize(&mut backend, 800, 600);

    let mut camera = Camera::new("main");
    camera.transform.translate = Vector3::new(0.0, 2.0, 6.0);
    scene.add_camera(camera);
    scene.set_active_camera(0).expect("camera just added");

    scene.add_material(Material::from_rgb("brass", 0.8, 0.6, 0.2));

    let mut floor = Polygon::unit_quad("floor");
    floor.transform.scale = Vector3::new(8.0, 8.0, 1.0);
    floor.transform.rotate = Vector3::new(-90.0, 0.0, 0.0);
    scene.add_polygon(floor);

    let mut ball = Quadric::sphere("ball", 1.0, 16, 12);
    ball.transform.translate = Vector3::new(0.0, 1.0, 0.0);
    scene.add_quadric(ball);

    scene.add_object(Box::new(ParticleSystem::new("sparks", 64)));

    for frame in 0..8 {
        scene.quadrics[0].transform.rotate.y = frame as f32 * 45.0;
        scene.draw(&mut backend);
    }

    match scene.hit_test(&mut backend, 400, 300) {
        Ok(picks) => println!("hit test returned {} pick(s)", picks.len()),
        Err(err) => eprintln!("hit test failed: {err}"),
    }

    println!(
        "recorded {} backend commands over 8 frames",
        backend.commands().len()
    );
}
