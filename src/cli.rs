//! CLI argument parsing for Wayfinder
//!
//! Defines the Command enum and parse_args() function for all CLI commands.

use anyhow::{bail, Result};
use std::path::PathBuf;
use wayfinder::OutputFormat;

pub fn print_usage() {
    eprintln!("Wayfinder - Route-impact analysis for front-end codebases");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  wayfinder <command> [arguments]");
    eprintln!("  wayfinder --help");
    eprintln!();
    eprintln!("  wayfinder build --root <DIR> [--store <DIR>] [--no-gitignore] [--output <FORMAT>]");
    eprintln!("  wayfinder detect --root <DIR> --file <PATH>... [--store <DIR>] [--rebuild] [--exhaustive] [--depth <N>] [--output <FORMAT>]");
    eprintln!("  wayfinder info --root <DIR> --file <PATH>... [--store <DIR>] [--rebuild] [--output <FORMAT>]");
    eprintln!("  wayfinder status --root <DIR> [--store <DIR>] [--rebuild] [--output <FORMAT>]");
    eprintln!("  wayfinder component --root <DIR> --file <PATH> [--store <DIR>] [--rebuild] [--output <FORMAT>]");
    eprintln!("  wayfinder watch --root <DIR> [--store <DIR>] [--debounce-ms <N>]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  build      Build the import graph and persist a snapshot");
    eprintln!("  detect     Routes affected by the given changed files");
    eprintln!("  info       Affected routes plus route-file classification");
    eprintln!("  status     Graph statistics and skip counts");
    eprintln!("  component  Routes served by a specific component file");
    eprintln!("  watch      Watch the project and keep the graph fresh");
    eprintln!();
    eprintln!("Global arguments:");
    eprintln!("  --root <DIR>        Project root directory");
    eprintln!("  --store <DIR>       Snapshot store directory (optional)");
    eprintln!("  --output <FORMAT>   Output format: human (default), json, or pretty");
    eprintln!();
    eprintln!("Detect arguments:");
    eprintln!("  --file <PATH>       Changed file; repeatable");
    eprintln!("  --rebuild           Ignore any persisted snapshot and rebuild");
    eprintln!("  --exhaustive        Disable BFS early termination");
    eprintln!("  --depth <N>         Early-termination depth bound (default: 4)");
    eprintln!();
    eprintln!("Watch arguments:");
    eprintln!("  --debounce-ms <N>   Debounce delay in milliseconds (default: 500)");
}

/// Parsed CLI command
#[derive(Debug, Clone)]
pub enum Command {
    Build {
        root: PathBuf,
        store: Option<PathBuf>,
        use_gitignore: bool,
        output: OutputFormat,
    },
    Detect {
        root: PathBuf,
        files: Vec<String>,
        store: Option<PathBuf>,
        rebuild: bool,
        exhaustive: bool,
        depth: Option<usize>,
        output: OutputFormat,
    },
    Info {
        root: PathBuf,
        files: Vec<String>,
        store: Option<PathBuf>,
        rebuild: bool,
        output: OutputFormat,
    },
    Status {
        root: PathBuf,
        store: Option<PathBuf>,
        rebuild: bool,
        output: OutputFormat,
    },
    Component {
        root: PathBuf,
        file: String,
        store: Option<PathBuf>,
        rebuild: bool,
        output: OutputFormat,
    },
    Watch {
        root: PathBuf,
        store: Option<PathBuf>,
        debounce_ms: u64,
    },
    Version,
    Help,
}

/// Parse CLI arguments into a Command
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some(command) = args.first() else {
        return Ok(Command::Help);
    };

    match command.as_str() {
        "--help" | "-h" | "help" => Ok(Command::Help),
        "--version" | "-V" | "version" => Ok(Command::Version),
        "build" => parse_build(&args[1..]),
        "detect" => parse_detect(&args[1..]),
        "info" => parse_info(&args[1..]),
        "status" => parse_status(&args[1..]),
        "component" => parse_component(&args[1..]),
        "watch" => parse_watch(&args[1..]),
        other => bail!("unknown command: {}", other),
    }
}

struct Flags<'a> {
    args: &'a [String],
    index: usize,
}

impl<'a> Flags<'a> {
    fn new(args: &'a [String]) -> Self {
        Self { args, index: 0 }
    }

    fn next_flag(&mut self) -> Option<&'a str> {
        let flag = self.args.get(self.index)?;
        self.index += 1;
        Some(flag.as_str())
    }

    fn value(&mut self, flag: &str) -> Result<&'a str> {
        match self.args.get(self.index) {
            Some(value) => {
                self.index += 1;
                Ok(value.as_str())
            }
            None => bail!("{} requires a value", flag),
        }
    }
}

fn parse_output(value: &str) -> Result<OutputFormat> {
    OutputFormat::parse(value)
        .ok_or_else(|| anyhow::anyhow!("invalid output format: {} (expected human, json, or pretty)", value))
}

fn parse_build(args: &[String]) -> Result<Command> {
    let mut root = None;
    let mut store = None;
    let mut use_gitignore = true;
    let mut output = OutputFormat::Human;

    let mut flags = Flags::new(args);
    while let Some(flag) = flags.next_flag() {
        match flag {
            "--root" => root = Some(PathBuf::from(flags.value("--root")?)),
            "--store" => store = Some(PathBuf::from(flags.value("--store")?)),
            "--no-gitignore" => use_gitignore = false,
            "--gitignore-aware" => use_gitignore = true,
            "--output" => output = parse_output(flags.value("--output")?)?,
            other => bail!("unknown build argument: {}", other),
        }
    }

    let Some(root) = root else {
        bail!("build requires --root <DIR>");
    };
    Ok(Command::Build {
        root,
        store,
        use_gitignore,
        output,
    })
}

fn parse_detect(args: &[String]) -> Result<Command> {
    let mut root = None;
    let mut files = Vec::new();
    let mut store = None;
    let mut rebuild = false;
    let mut exhaustive = false;
    let mut depth = None;
    let mut output = OutputFormat::Human;

    let mut flags = Flags::new(args);
    while let Some(flag) = flags.next_flag() {
        match flag {
            "--root" => root = Some(PathBuf::from(flags.value("--root")?)),
            "--file" => files.push(flags.value("--file")?.to_string()),
            "--store" => store = Some(PathBuf::from(flags.value("--store")?)),
            "--rebuild" => rebuild = true,
            "--exhaustive" => exhaustive = true,
            "--depth" => {
                let value = flags.value("--depth")?;
                depth = Some(value.parse().map_err(|_| {
                    anyhow::anyhow!("--depth expects a number, got: {}", value)
                })?);
            }
            "--output" => output = parse_output(flags.value("--output")?)?,
            other => bail!("unknown detect argument: {}", other),
        }
    }

    let Some(root) = root else {
        bail!("detect requires --root <DIR>");
    };
    if files.is_empty() {
        bail!("detect requires at least one --file <PATH>");
    }
    Ok(Command::Detect {
        root,
        files,
        store,
        rebuild,
        exhaustive,
        depth,
        output,
    })
}

fn parse_info(args: &[String]) -> Result<Command> {
    let mut root = None;
    let mut files = Vec::new();
    let mut store = None;
    let mut rebuild = false;
    let mut output = OutputFormat::Human;

    let mut flags = Flags::new(args);
    while let Some(flag) = flags.next_flag() {
        match flag {
            "--root" => root = Some(PathBuf::from(flags.value("--root")?)),
            "--file" => files.push(flags.value("--file")?.to_string()),
            "--store" => store = Some(PathBuf::from(flags.value("--store")?)),
            "--rebuild" => rebuild = true,
            "--output" => output = parse_output(flags.value("--output")?)?,
            other => bail!("unknown info argument: {}", other),
        }
    }

    let Some(root) = root else {
        bail!("info requires --root <DIR>");
    };
    if files.is_empty() {
        bail!("info requires at least one --file <PATH>");
    }
    Ok(Command::Info {
        root,
        files,
        store,
        rebuild,
        output,
    })
}

fn parse_status(args: &[String]) -> Result<Command> {
    let mut root = None;
    let mut store = None;
    let mut rebuild = false;
    let mut output = OutputFormat::Human;

    let mut flags = Flags::new(args);
    while let Some(flag) = flags.next_flag() {
        match flag {
            "--root" => root = Some(PathBuf::from(flags.value("--root")?)),
            "--store" => store = Some(PathBuf::from(flags.value("--store")?)),
            "--rebuild" => rebuild = true,
            "--output" => output = parse_output(flags.value("--output")?)?,
            other => bail!("unknown status argument: {}", other),
        }
    }

    let Some(root) = root else {
        bail!("status requires --root <DIR>");
    };
    Ok(Command::Status {
        root,
        store,
        rebuild,
        output,
    })
}

fn parse_component(args: &[String]) -> Result<Command> {
    let mut root = None;
    let mut file = None;
    let mut store = None;
    let mut rebuild = false;
    let mut output = OutputFormat::Human;

    let mut flags = Flags::new(args);
    while let Some(flag) = flags.next_flag() {
        match flag {
            "--root" => root = Some(PathBuf::from(flags.value("--root")?)),
            "--file" => file = Some(flags.value("--file")?.to_string()),
            "--store" => store = Some(PathBuf::from(flags.value("--store")?)),
            "--rebuild" => rebuild = true,
            "--output" => output = parse_output(flags.value("--output")?)?,
            other => bail!("unknown component argument: {}", other),
        }
    }

    let Some(root) = root else {
        bail!("component requires --root <DIR>");
    };
    let Some(file) = file else {
        bail!("component requires --file <PATH>");
    };
    Ok(Command::Component {
        root,
        file,
        store,
        rebuild,
        output,
    })
}

fn parse_watch(args: &[String]) -> Result<Command> {
    let mut root = None;
    let mut store = None;
    let mut debounce_ms = 500u64;

    let mut flags = Flags::new(args);
    while let Some(flag) = flags.next_flag() {
        match flag {
            "--root" => root = Some(PathBuf::from(flags.value("--root")?)),
            "--store" => store = Some(PathBuf::from(flags.value("--store")?)),
            "--debounce-ms" => {
                let value = flags.value("--debounce-ms")?;
                debounce_ms = value.parse().map_err(|_| {
                    anyhow::anyhow!("--debounce-ms expects a number, got: {}", value)
                })?;
            }
            other => bail!("unknown watch argument: {}", other),
        }
    }

    let Some(root) = root else {
        bail!("watch requires --root <DIR>");
    };
    Ok(Command::Watch {
        root,
        store,
        debounce_ms,
    })
}
