use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use winit::dpi::PhysicalSize;

use card::error::CardError;
use card::headful::CardApp;
use card::playtest::{CardLogic, run_until};
use card::render::render_state;
use card::settings::{CardSettings, SettingsStore};
use engine::app::{AppConfig, run_game};
use engine::snapshot::write_snapshot;
use engine::surface::Surface;

#[derive(Parser, Debug)]
#[command(name = "card")]
#[command(about = "Will you be my Valentine?", long_about = None)]
struct Cli {
    /// Window (or snapshot) width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window (or snapshot) height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Fixed RNG seed, for reproducible dodges and rain
    #[arg(long)]
    seed: Option<u64>,

    /// Freeze decorative loops
    #[arg(long)]
    reduce_motion: bool,

    /// Settings file; defaults to VALENTINE_SETTINGS_PATH or the user config dir
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_settings: bool,

    /// Write the effective settings (file plus flags) back to the settings file
    #[arg(long)]
    save_settings: bool,

    /// Render one frame headless to this path (raw RGBA) instead of opening a window
    #[arg(long, requires = "at_ms")]
    snapshot: Option<PathBuf>,

    /// Card time of the snapshot frame
    #[arg(long)]
    at_ms: Option<u64>,

    /// Click YES at this card time during the snapshot run
    #[arg(long)]
    confirm_at_ms: Option<u64>,
}

impl Cli {
    fn settings_store(&self) -> SettingsStore {
        match &self.settings {
            Some(path) => SettingsStore::new(path),
            None => SettingsStore::from_env(),
        }
    }

    fn effective_settings(&self, store: &SettingsStore) -> CardSettings {
        let mut settings = store.load();
        tracing::debug!(path = %store.path().display(), "settings loaded");

        if let Some(width) = self.width {
            settings.window.width = width;
        }
        if let Some(height) = self.height {
            settings.window.height = height;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.reduce_motion {
            settings.motion.reduce_motion = true;
        }
        settings.sanitized()
    }
}

fn snapshot(cli: &Cli, settings: &CardSettings, seed: u64, path: PathBuf) -> Result<(), CardError> {
    let at_ms = cli.at_ms.ok_or(CardError::MissingSnapshotTime)?;
    if let Some(confirm_ms) = cli.confirm_at_ms {
        if confirm_ms > at_ms {
            return Err(CardError::ConfirmAfterSnapshot { confirm_ms, at_ms });
        }
    }

    let logic = CardLogic::new(seed, (settings.window.width, settings.window.height))
        .with_reduce_motion(settings.motion.reduce_motion);
    let state = run_until(
        logic,
        Duration::from_millis(at_ms),
        cli.confirm_at_ms.map(Duration::from_millis),
    );
    let surface = render_state(&state);
    let record = write_snapshot(&path, surface.size(), surface.frame())?;
    tracing::info!(
        path = %path.display(),
        at_ms,
        screen = ?state.screen(),
        "snapshot written"
    );
    println!("{}", record.hash);
    Ok(())
}

fn main() -> Result<(), CardError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let store = cli.settings_store();
    let settings = cli.effective_settings(&store);

    if cli.save_settings {
        store.save(&settings)?;
        tracing::info!(path = %store.path().display(), "settings saved");
    }

    if cli.print_settings {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let seed = settings.seed.unwrap_or_else(|| fastrand::u64(..));
    tracing::info!(seed, "card seed");

    if let Some(path) = cli.snapshot.clone() {
        return snapshot(&cli, &settings, seed, path);
    }

    let config = AppConfig {
        title: settings.window.title.clone(),
        desired_size: PhysicalSize::new(settings.window.width, settings.window.height),
        clamp_to_monitor: true,
        vsync: settings.window.vsync,
    };
    run_game(config, CardApp::new(seed, settings.motion.reduce_motion))
        .map_err(|err| CardError::Window(err.to_string()))
}
