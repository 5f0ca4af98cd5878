use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use virtual_gamepad::gamepad::HeadlessHost;
use virtual_gamepad::layout::Layout;
use virtual_gamepad::replay::{self, GestureScript};

const USAGE: &str = "usage: virtual-gamepad <script.toml> [layout.toml]";

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let mut args = std::env::args().skip(1);
    let script_path = PathBuf::from(args.next().ok_or_else(|| eyre!(USAGE))?);
    let layout_path = args.next().map(PathBuf::from);

    let layout = Layout::load_or_default(layout_path).await?;
    let host = HeadlessHost::new(layout.vibration);
    let gamepad = layout
        .into_gamepad(host)
        .map_err(|e| eyre!("Failed to build gamepad: {}", e))?;

    let script = GestureScript::load(&script_path).await?;
    info!(
        "Replaying {} events from {}",
        script.events.len(),
        script_path.display()
    );

    let finished = replay::replay(gamepad, script, step_interval()).await?;
    let report = finished.report();

    info!("Final state:\n{}", toml::to_string_pretty(&report)?);
    Ok(())
}

/// Optional pause between replayed steps, from `VIRTUAL_GAMEPAD_STEP_MS`
fn step_interval() -> Option<Duration> {
    let ms = std::env::var("VIRTUAL_GAMEPAD_STEP_MS").ok()?;
    match ms.parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            debug!("Ignoring VIRTUAL_GAMEPAD_STEP_MS={}: {}", ms, e);
            None
        }
    }
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| Level::from_str(&level).ok())
        .unwrap_or(Level::INFO);

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
