//! Egui console example.
//!
//! Demonstrates the egui-based developer console with typed commands.
//!
//! Run with: `cargo run --example egui`
//!
//! Controls:
//! - Press ` (grave/tilde) to toggle console
//! - Press Enter to submit commands
//! - Press ArrowUp/ArrowDown to navigate history
//!
//! Try these commands:
//! - `help` - List all commands
//! - `spawn 5` / `despawn` - Spawn/despawn entities
//! - `color set 0.2 0.6 0.9` - Change the clear color
//! - `log ring 20` - Keep only 20 log lines

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_devconsole::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(LogPlugin {
            custom_layer: custom_log_layer,
            ..default()
        }))
        .add_plugins(bevy_egui::EguiPlugin::default())
        .add_plugins(ConsolePlugin)
        .add_systems(Startup, setup)
        .run();
}

/// Marker for demo entities.
#[derive(Component)]
struct DemoEntity;

fn setup(mut commands: Commands, mut console: Console) {
    commands.spawn(Camera2d);

    let spawn = ConCommand::new("spawn", |args, world| {
        let count = args.integer(0).unwrap_or(1).max(0);
        for i in 0..count {
            let x = (i as f32 - count as f32 / 2.0) * 40.0;
            world.spawn((
                DemoEntity,
                Sprite::from_color(Color::srgb(0.9, 0.5, 0.2), Vec2::splat(30.0)),
                Transform::from_xyz(x, 0.0, 0.0),
            ));
        }
        info!("Spawned {} entities", count);
    })
    .params([ParamKind::OptionalInteger])
    .description("Spawn demo entities");

    let despawn = ConCommand::new("despawn", |_args, world| {
        let entities: Vec<Entity> = world
            .query_filtered::<Entity, With<DemoEntity>>()
            .iter(world)
            .collect();
        let count = entities.len();
        for entity in entities {
            world.despawn(entity);
        }
        info!("Despawned {} entities", count);
    })
    .description("Despawn all demo entities");

    let color = ConCommand::new("color set", |args, world| {
        let channel = |i| args.float(i).unwrap_or_default().clamp(0.0, 1.0) as f32;
        world.insert_resource(ClearColor(Color::srgb(channel(0), channel(1), channel(2))));
    })
    .params([ParamKind::Float, ParamKind::Float, ParamKind::Float])
    .description("Set the clear color (0..1 per channel)");

    for cmd in [spawn, despawn, color] {
        console.register_cmd(cmd).ok();
    }

    info!("Press ` to open the console");
    warn!("This is what a warning looks like");
}
