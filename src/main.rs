//! Wayfinder CLI - route-impact analysis for front-end codebases
//!
//! Usage: wayfinder <command> [arguments]

mod build_cmd;
mod cli;
mod component_cmd;
mod detect_cmd;
mod info_cmd;
mod status_cmd;
mod watch_cmd;

use cli::Command;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match cli::parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!();
            cli::print_usage();
            return ExitCode::from(2);
        }
    };

    let result = match command {
        Command::Help => {
            cli::print_usage();
            Ok(())
        }
        Command::Version => {
            println!("{}", wayfinder::version::version());
            Ok(())
        }
        Command::Build {
            root,
            store,
            use_gitignore,
            output,
        } => build_cmd::run(root, store, use_gitignore, output),
        Command::Detect {
            root,
            files,
            store,
            rebuild,
            exhaustive,
            depth,
            output,
        } => detect_cmd::run(root, files, store, rebuild, exhaustive, depth, output),
        Command::Info {
            root,
            files,
            store,
            rebuild,
            output,
        } => info_cmd::run(root, files, store, rebuild, output),
        Command::Status {
            root,
            store,
            rebuild,
            output,
        } => status_cmd::run(root, store, rebuild, output),
        Command::Component {
            root,
            file,
            store,
            rebuild,
            output,
        } => component_cmd::run(root, file, store, rebuild, output),
        Command::Watch {
            root,
            store,
            debounce_ms,
        } => watch_cmd::run(root, store, debounce_ms),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
