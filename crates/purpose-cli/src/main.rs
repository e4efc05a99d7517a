use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use purpose_core::{
    dummy, edge_window, is_buffer_dedicated, is_dedicated, resolve_buffer, set_window_purpose,
    toggle_buffer_dedicated, toggle_dedicated, window_purpose, windows_with_purpose, Buffers,
    Edge, ModeTag, Purpose, PurposeClassifier, PurposeConfig, PurposeError, Result, Scenario,
    Session, WindowId, WindowTree, Windows,
};

mod args;
use args::{Cli, Commands, ConfigAction, DummyAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = resolve_base_dir(cli.base_dir.clone()).and_then(|base_dir| run(cli, &base_dir));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: Cli, base_dir: &Path) -> Result<()> {
    let json = cli.json;
    let config = cli.config.as_deref();
    let scenario = cli.scenario.as_deref();

    match cli.command {
        Commands::Classify { buffers, mode } => {
            let classifier = load_classifier(config, base_dir)?;
            let session = scenario.map(load_session).transpose()?;
            handle_classify(&classifier, session.as_ref(), &buffers, &mode, json)
        }
        Commands::Purposes { sorted } => {
            let classifier = load_classifier(config, base_dir)?;
            handle_purposes(&classifier, sorted, json);
            Ok(())
        }
        Commands::Windows { purpose } => {
            let classifier = load_classifier(config, base_dir)?;
            let session = require_session(scenario)?;
            handle_windows(&classifier, &session, purpose.as_deref(), json)
        }
        Commands::Edges => {
            let session = require_session(scenario)?;
            handle_edges(&session, json);
            Ok(())
        }
        Commands::Dedicate { window, buffer } => {
            let path = require_scenario(scenario)?;
            let mut session = load_session(path)?;
            handle_dedicate(&mut session, WindowId(window), buffer)?;
            save_session(&session, path)
        }
        Commands::Show {
            window,
            purpose,
            no_dedicate,
        } => {
            let classifier = load_classifier(config, base_dir)?;
            let path = require_scenario(scenario)?;
            let mut session = load_session(path)?;
            handle_show(
                &classifier,
                &mut session,
                WindowId(window),
                Purpose::new(&purpose),
                no_dedicate,
            )?;
            save_session(&session, path)
        }
        Commands::Dummy { action } => handle_dummy(action),
        Commands::Config { action } => handle_config(action, base_dir),
        Commands::Completions { shell } => {
            handle_completions(shell);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "window-purpose", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(base) = cli_base {
        return Ok(base);
    }

    if let Ok(base) = std::env::var("WINDOW_PURPOSE_BASE") {
        return Ok(PathBuf::from(base));
    }

    dirs::home_dir()
        .map(|h| h.join(".window-purpose"))
        .ok_or(PurposeError::HomeNotFound)
}

fn load_classifier(config: Option<&Path>, base_dir: &Path) -> Result<PurposeClassifier> {
    let config = match config {
        Some(path) => PurposeConfig::load_file(path)?,
        None => PurposeConfig::load(base_dir)?,
    };
    debug!(
        modes = config.modes.len(),
        names = config.names.len(),
        regexps = config.regexps.len(),
        "loaded purpose tables"
    );
    PurposeClassifier::from_config(&config)
}

fn load_session(path: &Path) -> Result<Session> {
    Scenario::load(path)?.build()
}

fn require_scenario(path: Option<&Path>) -> Result<&Path> {
    path.ok_or_else(|| PurposeError::InvalidScenario {
        message: "this command needs --scenario <FILE>".to_string(),
    })
}

fn require_session(path: Option<&Path>) -> Result<Session> {
    load_session(require_scenario(path)?)
}

/// Write the changed frame back so the next command sees it.
fn save_session(session: &Session, path: &Path) -> Result<()> {
    Scenario::from_session(session)?.save(path)?;
    debug!(path = %path.display(), "saved scenario");
    Ok(())
}

fn handle_classify(
    classifier: &PurposeClassifier,
    session: Option<&Session>,
    buffers: &[String],
    mode: &str,
    json: bool,
) -> Result<()> {
    let mut results = Vec::with_capacity(buffers.len());
    for name in buffers {
        let classification = match session {
            Some(session) => {
                let id = resolve_buffer(session, name)?;
                classifier.explain(session, id)?
            }
            None => {
                // a throwaway frame holding just this buffer
                let session = Session::new(name, ModeTag::new(mode));
                let id = resolve_buffer(&session, name)?;
                classifier.explain(&session, id)?
            }
        };
        results.push((name, classification));
    }

    if json {
        let out: Vec<_> = results
            .iter()
            .map(|(name, c)| {
                json!({
                    "buffer": name,
                    "purpose": c.purpose.name(),
                    "rule": c.rule.to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(out));
        return Ok(());
    }

    for (name, c) in results {
        println!(
            "{} {} {} {}",
            name,
            "->".dimmed(),
            c.purpose.to_string().cyan().bold(),
            format!("({})", c.rule).dimmed()
        );
    }
    Ok(())
}

fn handle_purposes(classifier: &PurposeClassifier, sorted: bool, json: bool) {
    let purposes: Vec<Purpose> = if sorted {
        classifier.sorted_purposes()
    } else {
        classifier.all_purposes().iter().copied().collect()
    };

    if json {
        let names: Vec<_> = purposes.iter().map(|p| p.name()).collect();
        println!("{}", json!(names));
        return;
    }

    let default = classifier.default_purpose();
    for purpose in purposes {
        if purpose == default {
            println!("{} {}", purpose.to_string().cyan(), "(default)".dimmed());
        } else {
            println!("{}", purpose);
        }
    }
}

fn handle_windows(
    classifier: &PurposeClassifier,
    session: &Session,
    purpose: Option<&str>,
    json: bool,
) -> Result<()> {
    let windows = match purpose {
        Some(p) => windows_with_purpose(classifier, session, Purpose::new(p))?,
        None => session.leaves(),
    };

    let mut rows = Vec::with_capacity(windows.len());
    for window in windows {
        let buffer = session.window_buffer(window)?;
        rows.push((
            window,
            session.buffer_name(buffer).unwrap_or_default().to_string(),
            window_purpose(classifier, session, window)?,
            is_dedicated(session, window)?,
            is_buffer_dedicated(session, window)?,
        ));
    }

    if json {
        let out: Vec<_> = rows
            .iter()
            .map(|(window, buffer, purpose, dedicated, buffer_dedicated)| {
                json!({
                    "window": window.0,
                    "buffer": buffer,
                    "purpose": purpose.name(),
                    "dedicated": dedicated,
                    "buffer_dedicated": buffer_dedicated,
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(out));
        return Ok(());
    }

    for (window, buffer, purpose, dedicated, buffer_dedicated) in rows {
        let mut flags = String::new();
        if dedicated {
            flags.push_str(" [P]");
        }
        if buffer_dedicated {
            flags.push_str(" [B]");
        }
        println!(
            "{:>3}  {} {}{}",
            window.0,
            format!("{:<12}", purpose.name()).cyan(),
            buffer,
            flags.yellow()
        );
    }
    Ok(())
}

fn handle_edges(session: &Session, json: bool) {
    let edges: Vec<(Edge, Option<WindowId>)> = Edge::ALL
        .iter()
        .map(|edge| (*edge, edge_window(session, *edge)))
        .collect();

    if json {
        let out: serde_json::Map<String, serde_json::Value> = edges
            .iter()
            .map(|(edge, window)| (edge.to_string(), json!(window.map(|w| w.0))))
            .collect();
        println!("{}", serde_json::Value::Object(out));
        return;
    }

    for (edge, window) in edges {
        match window {
            Some(window) => println!("{:<6} {}", edge, window.0.to_string().green()),
            None => println!("{:<6} {}", edge, "-".dimmed()),
        }
    }
}

fn handle_dedicate(session: &mut Session, window: WindowId, buffer: bool) -> Result<()> {
    let (kind, value) = if buffer {
        ("buffer", toggle_buffer_dedicated(session, window)?)
    } else {
        ("purpose", toggle_dedicated(session, window)?)
    };

    if value {
        println!("{} window {} is {}-dedicated", "Dedicated:".green(), window.0, kind);
    } else {
        println!(
            "{} window {} is no longer {}-dedicated",
            "Released:".yellow(),
            window.0,
            kind
        );
    }
    Ok(())
}

fn handle_show(
    classifier: &PurposeClassifier,
    session: &mut Session,
    window: WindowId,
    purpose: Purpose,
    no_dedicate: bool,
) -> Result<()> {
    let buffer = set_window_purpose(classifier, session, window, purpose, no_dedicate)?;
    let name = session.buffer_name(buffer).unwrap_or_default();
    println!(
        "{} window {} shows {} ({})",
        "Shown:".green(),
        window.0,
        name,
        purpose.to_string().cyan()
    );
    if !no_dedicate {
        println!("  window {} is purpose-dedicated", window.0);
    }
    Ok(())
}

fn handle_dummy(action: DummyAction) -> Result<()> {
    match action {
        DummyAction::Encode { purpose } => {
            println!("{}", dummy::encode(Purpose::new(&purpose)));
        }
        DummyAction::Decode { name } => {
            println!("{}", dummy::parse(&name)?);
        }
    }
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = PurposeConfig::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(PurposeError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = PurposeConfig::load(base_dir)?;
            config.set(&key, &value)?;
            // refuse to save tables the classifier could not load
            PurposeClassifier::from_config(&config)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::Unset { key } => {
            let mut config = PurposeConfig::load(base_dir)?;
            let old = config.unset(&key)?;
            config.save(base_dir)?;
            println!("{} {} (was {})", "Removed:".green(), key, old);
        }
        ConfigAction::List => {
            let config = PurposeConfig::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = PurposeConfig::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = PurposeConfig::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
