//! Demo scene: three colored meshes, five actors (two sharing geometry with
//! the originals), and three switchable cameras.
//!
//! Controls: WASD/Space/E/X/Q move the active camera, right mouse drag looks
//! around, Shift/Ctrl adjust speed, Tab cycles cameras, Escape quits.

use argos::*;

fn build_scene(gpu: &GpuContext) -> Scene {
    let mut scene = Scene::new();
    scene.set_background(Color::rgb(0.4, 0.6, 0.75));

    let triangle = Geometry::new(
        "Triangle",
        vec![
            Vertex::new([0.0, 0.5, 0.0], Color::RED),
            Vertex::new([0.5, -0.5, 0.0], Color::BLUE),
            Vertex::new([-0.5, -0.5, 0.0], Color::GREEN),
        ],
        vec![0, 1, 2],
    )
    .upload(gpu);

    let quad = Geometry::new(
        "Quad",
        vec![
            Vertex::new([-0.8, 0.8, 0.0], Color::RED),
            Vertex::new([-0.5, 0.8, 0.0], Color::GREEN),
            Vertex::new([-0.5, 0.6, 0.0], Color::BLUE),
            Vertex::new([-0.8, 0.6, 0.0], Color::WHITE),
        ],
        vec![0, 1, 2, 2, 3, 0],
    )
    .upload(gpu);

    let spaceship = Geometry::new(
        "Spaceship",
        vec![
            Vertex::new([0.7, 0.7, 0.0], Color::WHITE),
            Vertex::new([0.75, 0.8, 0.0], Color::BLACK),
            Vertex::new([0.9, 0.75, 0.0], Color::BLACK),
            Vertex::new([0.8, 0.7, 0.0], Color::BLACK),
            Vertex::new([0.9, 0.65, 0.0], Color::BLACK),
            Vertex::new([0.75, 0.6, 0.0], Color::BLACK),
        ],
        vec![0, 1, 3, 1, 2, 3, 0, 3, 5, 3, 4, 5],
    )
    .upload(gpu);

    scene.add_actor(Actor::new(triangle.clone()).named("Triangle"));
    scene.add_actor(Actor::new(quad).named("Quad"));
    scene.add_actor(Actor::new(spaceship.clone()).named("Spaceship"));

    // Two more actors reusing the shared meshes at offset positions.
    let mut other1 = Actor::new(triangle).named("Other Actor 1");
    other1
        .transform_mut()
        .set_position(Vec3::new(-0.5, -0.5, 0.0));
    scene.add_actor(other1);

    let mut other2 = Actor::new(spaceship).named("Other Actor 2");
    other2
        .transform_mut()
        .set_position(Vec3::new(-0.55, -0.5, 0.0));
    scene.add_actor(other2);

    let aspect = gpu.aspect();
    scene.add_camera(Camera::new(aspect).position(Vec3::new(0.0, 0.0, -1.0)));
    scene.add_camera(
        Camera::new(aspect)
            .position(Vec3::new(-2.0, 0.0, -1.0))
            .rotation(Vec3::new(0.0, 45.0f32.to_radians(), 0.0))
            .with_fov(45.0),
    );
    scene.add_camera(
        Camera::new(aspect)
            .position(Vec3::new(2.0, 0.0, -1.0))
            .rotation(Vec3::new(0.0, -45.0f32.to_radians(), 0.0))
            .with_fov(70.0),
    );

    scene
}

fn main() {
    env_logger::init();

    run_with_config(AppConfig::new().title("Argos Demo"), |gpu| {
        let scene = build_scene(gpu);

        (
            scene,
            move |scene: &mut Scene, input: &Input, _dt: f32, total: f32| {
                // Bob every actor side to side.
                for actor in scene.actors_mut() {
                    let position = actor.transform().position();
                    actor.transform_mut().set_position(Vec3::new(
                        total.sin() * 0.5,
                        position.y,
                        position.z,
                    ));
                }

                if input.key_pressed(KeyCode::Tab) {
                    let next = (scene.active_camera_index() + 1) % scene.cameras().len();
                    scene.set_active_camera(next);
                    log::info!(
                        "camera {next}: fov {:.1} degrees",
                        scene.active_camera().fov().to_degrees()
                    );
                }

                if input.key_down(KeyCode::Escape) {
                    scene.request_quit();
                }
            },
        )
    });
}
