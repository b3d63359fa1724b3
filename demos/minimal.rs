//! Minimal headless console example.
//!
//! Demonstrates using bevy_devconsole programmatically without any UI:
//! typed parameters, subcommands, and reading the console log.
//!
//! Run with: `cargo run --example minimal --no-default-features`

use bevy::prelude::*;
use bevy_devconsole::prelude::*;

/// Values set through the `cfg set` command.
#[derive(Resource, Default, Debug)]
struct Settings(Vec<(String, i64)>);

fn main() {
    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin)
        .init_resource::<Settings>()
        .add_systems(Startup, setup)
        .add_systems(Update, send_test_commands.run_if(run_once))
        .add_systems(PostUpdate, (print_log, exit_after_frames).chain())
        .run();
}

fn setup(mut console: Console) {
    let commands = [
        ConCommand::new("greet", |args, world| {
            let name = args.text_or(0, "World");
            world.resource::<LogBuffer>().info(format!("Hello, {name}!"));
        })
        .params([ParamKind::OptionalText])
        .description("Greet someone"),
        ConCommand::new("add", |args, world| {
            let sum = args.integer(0).unwrap_or(0) + args.integer(1).unwrap_or(0);
            world.resource::<LogBuffer>().info(sum.to_string());
        })
        .params([ParamKind::Integer, ParamKind::Integer])
        .description("Add two integers"),
        ConCommand::new("cfg set", |args, world| {
            let key = args.text_or(0, "").to_string();
            let value = args.integer(1).unwrap_or_default();
            world.resource_mut::<Settings>().0.push((key, value));
        })
        .params([ParamKind::Text, ParamKind::Integer])
        .description("Store an integer setting"),
    ];

    for cmd in commands {
        console.register_cmd(cmd).ok();
    }
    println!("Console initialized with {} commands", console.len());
}

/// Send some test commands programmatically.
fn send_test_commands(mut events: MessageWriter<ConsoleInputEvent>, queue: Res<CommandQueue>) {
    events.write(ConsoleInputEvent::new("greet   Developer of   things"));
    events.write(ConsoleInputEvent::new("add 2 3"));
    events.write(ConsoleInputEvent::new("cfg set volume 7"));

    // These fail and are reported in the log
    queue.push("add 2 x");
    queue.push("add 1");
    queue.push("missing");
    queue.push("help cfg");
}

/// Print log entries added since the last frame.
fn print_log(log: Res<LogBuffer>, mut seen: Local<u64>) {
    let entries = log.since(*seen);
    if let Some(last) = entries.last() {
        *seen = last.seq;
    }
    for entry in entries {
        println!("{}", entry.render());
    }
}

fn exit_after_frames(mut frames: Local<u32>, settings: Res<Settings>, mut exit: MessageWriter<AppExit>) {
    *frames += 1;
    if *frames == 3 {
        println!("Settings: {:?}", settings.0);
        exit.write(AppExit::Success);
    }
}
