//! Bevy 2D viewer for windowed (real-time) runs
//!
//! Runs one simulation step per rendered frame. Space toggles the engine
//! between sequential and parallel; B toggles the quadtree overlay.

use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::math::primitives::Circle;

use crate::simulation::barnes_hut::{BHTree, Rect};
use crate::simulation::engine::{EngineMode, RealtimeEngine};

#[derive(Component)]
struct BodyIndex(pub usize);

/// Engine state behind the viewer. Non-send because the parallel engine
/// holds a channel receiver.
struct SimView {
    engine: RealtimeEngine,
    draw_tree: bool,
    last_tree: Option<BHTree>,
}

pub fn run_window(engine: RealtimeEngine) {
    println!(
        "run_window: starting viewer with {} bodies ({:?} mode; Space toggles, B draws the tree)",
        engine.bodies().len(),
        engine.mode()
    );

    let domain = engine.domain();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "N-Body Simulation".into(),
                resolution: (domain.width, domain.height).into(),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .insert_non_send_resource(SimView {
            engine,
            draw_tree: false,
            last_tree: None,
        })
        .add_systems(Startup, setup_bodies_system)
        .add_systems(
            Update,
            (
                handle_input_system,
                physics_step_system,
                sync_transforms_system,
                draw_tree_system,
            )
                .chain(),
        )
        .run();
}

/// Map a domain point (origin top-left, y down) to Bevy world coordinates
/// (origin centered, y up).
fn to_world(x: f32, y: f32, domain: Rect) -> Vec2 {
    Vec2::new(x - domain.width / 2.0, domain.height / 2.0 - y)
}

fn setup_bodies_system(
    mut commands: Commands,
    view: NonSend<SimView>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn(Camera2dBundle::default());

    let domain = view.engine.domain();
    for (i, body) in view.engine.bodies().iter().enumerate() {
        let world = to_world(body.position.x, body.position.y, domain);

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(body.radius.max(1.0)))),
                material: materials.add(ColorMaterial::from(Color::GREEN)),
                transform: Transform::from_xyz(world.x, world.y, 0.0),
                ..Default::default()
            },
            BodyIndex(i),
        ));
    }
}

fn handle_input_system(keys: Res<ButtonInput<KeyCode>>, mut view: NonSendMut<SimView>) {
    if keys.just_pressed(KeyCode::Space) {
        view.engine.toggle_mode();
        println!(
            "engine mode: {}",
            match view.engine.mode() {
                EngineMode::Sequential => "sequential",
                EngineMode::Parallel => "parallel",
            }
        );
    }

    if keys.just_pressed(KeyCode::KeyB) {
        view.draw_tree = !view.draw_tree;
    }
}

fn physics_step_system(mut view: NonSendMut<SimView>) {
    let tree = view.engine.step();
    view.last_tree = tree;
}

fn sync_transforms_system(
    view: NonSend<SimView>,
    mut query: Query<(&BodyIndex, &mut Transform)>,
) {
    let domain = view.engine.domain();

    for (BodyIndex(i), mut transform) in &mut query {
        if let Some(b) = view.engine.bodies().get(*i) {
            let world = to_world(b.position.x, b.position.y, domain);
            transform.translation.x = world.x;
            transform.translation.y = world.y;
        }
    }
}

fn draw_tree_system(view: NonSend<SimView>, mut gizmos: Gizmos) {
    if !view.draw_tree {
        return;
    }

    if let Some(tree) = &view.last_tree {
        draw_node(&mut gizmos, tree, view.engine.domain());
    }
}

fn draw_node(gizmos: &mut Gizmos, node: &BHTree, domain: Rect) {
    let b = node.boundary();
    let center = to_world(b.x + b.width / 2.0, b.y + b.height / 2.0, domain);
    gizmos.rect_2d(center, 0.0, Vec2::new(b.width, b.height), Color::BLUE);

    if let Some(children) = node.children() {
        for child in children {
            draw_node(gizmos, child, domain);
        }
    }
}
