//! Terminal console example.
//!
//! Demonstrates using bevy_devconsole with stdin/stdout for headless
//! applications like dedicated servers.
//!
//! Run with: `cargo run --example terminal --no-default-features --features terminal`
//!
//! Commands:
//! - `help` - List available commands
//! - `status` - Show server status
//! - `maxplayers 16` - Change the player limit
//! - `quit` - Exit the application

use bevy::ecs::message::Messages;
use bevy::prelude::*;
use bevy_devconsole::{ConCommand, Console, LogBuffer, ParamKind, TerminalConfig};

#[derive(Resource)]
struct Server {
    hostname: String,
    max_players: i64,
}

fn main() {
    println!("=== Terminal Console Example ===");
    println!("Type commands and press Enter. Type 'quit' to exit.");
    println!();

    // Ensure output is flushed before starting the app
    use std::io::Write;
    let _ = std::io::stdout().flush();

    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(bevy_devconsole::ConsolePlugin)
        .insert_resource(TerminalConfig { colored: true })
        .insert_resource(Server {
            hostname: "My Server".to_string(),
            max_players: 32,
        })
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut console: Console) {
    let status = ConCommand::new("status", |_args, world| {
        let server = world.resource::<Server>();
        let line = format!("{} ({} players max)", server.hostname, server.max_players);
        world.resource::<LogBuffer>().info(line);
    })
    .description("Show server status");

    let max_players = ConCommand::new("maxplayers", |args, world| {
        let Some(value) = args.integer(0) else {
            let current = world.resource::<Server>().max_players;
            world.resource::<LogBuffer>().info(format!("maxplayers = {current}"));
            return;
        };
        if !(1..=64).contains(&value) {
            world.resource::<LogBuffer>().warn("maxplayers must be between 1 and 64");
            return;
        }
        world.resource_mut::<Server>().max_players = value;
    })
    .params([ParamKind::OptionalInteger])
    .description("Query or set the player limit");

    let quit = ConCommand::new("quit", |_args, world| {
        world.resource_mut::<Messages<AppExit>>().write(AppExit::Success);
    })
    .description("Exit the application");

    for cmd in [status, max_players, quit] {
        console.register_cmd(cmd).ok();
    }
}
