use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Once;
use termit::config::{RcConfig, RcLoader};
use termit::{ActionError, EditOptions, ExitHooks, edit_with_hooks};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "termit.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "termit", version, about = "The TERMinal edITor")]
struct Args {
    /// File to edit. Missing files start empty and are created on exit.
    path: Option<PathBuf>,
    /// Title bar text (defaults to the file name).
    #[arg(long)]
    title: Option<String>,
    /// Configuration file path (overrides discovery of `.termitrc`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn load_config(args: &Args) -> Result<RcConfig> {
    match &args.config {
        Some(path) => RcLoader::load_from(path).with_context(|| format!("reading config {}", path.display())),
        None => Ok(RcLoader::load_config()),
    }
}

fn read_initial(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(String::new());
    };
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_read_ok");
            Ok(content)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(target: "io", file = %path.display(), "new file");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
    }
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();

    let args = Args::parse();
    let config = load_config(&args)?;
    let initial = read_initial(args.path.as_deref())?;

    let file_title = args
        .path
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned());
    let title = args.title.clone().or_else(|| config.title.clone()).or(file_title);

    let mut hooks = ExitHooks::new();
    if let Some(path) = args.path.clone() {
        let original = initial.clone();
        hooks.push(Box::new(move |text: &str| -> Result<(), ActionError> {
            if text == original {
                return Ok(());
            }
            std::fs::write(&path, text)
                .map_err(|e| ActionError::Hook(format!("could not save {}: {e}", path.display())))?;
            info!(target: "io", file = %path.display(), size_bytes = text.len(), "file_saved");
            Ok(())
        }));
    }

    info!(target: "runtime", "startup");
    let text = edit_with_hooks(&initial, EditOptions { title, config }, hooks)?;
    info!(target: "runtime", size_bytes = text.len(), "shutdown");

    if args.path.is_none() {
        print!("{text}");
    }
    Ok(())
}
