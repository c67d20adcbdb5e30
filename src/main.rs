use eframe::egui;
use embassy_executor::{Executor, Spawner};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::{Path, PathBuf};
use std::thread;

mod animation;
mod animator;
mod categories;
mod render;
mod ui;
mod waves;

use ui::{AppState, UICommand, UIRefreshState};
use waves::WaveConfig;
use waves::config::DEFAULT_CONFIG_FILE;

const UI_REFRESH_QUEUE_SIZE: usize = 100;
type UIRefreshQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;
pub(crate) type UIRefreshQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;
pub(crate) type UIRefreshQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, UIRefreshState, UI_REFRESH_QUEUE_SIZE>;

const UI_COMMAND_QUEUE_SIZE: usize = 100;
type UICommandQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, UICommand, UI_COMMAND_QUEUE_SIZE>;
pub(crate) type UICommandQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, UICommand, UI_COMMAND_QUEUE_SIZE>;
pub(crate) type UICommandQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, UICommand, UI_COMMAND_QUEUE_SIZE>;

/// Resolve the startup configuration.
///
/// An explicit path (first CLI argument) must load; otherwise the default file
/// is used when present. Failures fall back to defaults and are returned as an
/// alert for the UI.
fn load_startup_config(explicit: Option<PathBuf>) -> (WaveConfig, Option<String>) {
    let path = match explicit {
        Some(path) => path,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if !default_path.exists() {
                info!("No {} found, using default wave configuration", DEFAULT_CONFIG_FILE);
                return (WaveConfig::default(), None);
            }
            default_path.to_path_buf()
        }
    };
    match WaveConfig::load(&path) {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("{:#}", e);
            (WaveConfig::default(), Some(format!("{:#}\n\nUsing default wave configuration.", e)))
        }
    }
}

fn embassy_init(
    spawner: Spawner,
    ui_refresh_tx: UIRefreshQueueSender,
    ui_command_rx: UICommandQueueReceiver,
    config: WaveConfig,
    startup_alert: Option<String>,
) {
    if let Err(e) = spawner.spawn(animator::animation_task(ui_refresh_tx, ui_command_rx, config, startup_alert)) {
        log::error!("Failed to spawn animation task: {:?}", e);
    }
}

fn main() -> eframe::Result {
    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("circle_waves"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Starting up");

    let (config, startup_alert) = load_startup_config(std::env::args_os().nth(1).map(PathBuf::from));

    let ui_refresh_queue: &'static UIRefreshQueue = Box::leak(Box::new(UIRefreshQueue::new()));
    let ui_command_queue: &'static UICommandQueue = Box::leak(Box::new(UICommandQueue::new()));

    let ui_refresh_tx = ui_refresh_queue.sender();
    let ui_refresh_rx = ui_refresh_queue.receiver();
    let ui_command_tx = ui_command_queue.sender();
    let ui_command_rx = ui_command_queue.receiver();

    // Spawn Embassy executor on a dedicated background thread
    let spawned = thread::Builder::new().name("embassy-executor".to_string()).spawn(move || {
        // Leak the executor to satisfy the 'static lifetime required by run()
        let executor: &'static mut Executor = Box::leak(Box::new(Executor::new()));
        executor.run(|spawner| embassy_init(spawner, ui_refresh_tx, ui_command_rx, config, startup_alert));
    });
    if let Err(e) = spawned {
        log::error!("Failed to spawn embassy executor thread: {}", e);
        return Err(eframe::Error::AppCreation(Box::new(e)));
    }

    // Start the GUI on the main thread (required on macOS)
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Circle Waves Network Map",
        native_options,
        Box::new(move |cc| Ok(Box::new(AppState::new(ui_refresh_rx, ui_command_tx, cc.storage)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_config_falls_back_with_alert() {
        let (config, alert) = load_startup_config(Some(PathBuf::from("/nonexistent/circle_waves.toml")));
        assert_eq!(config, WaveConfig::default());
        let alert = alert.expect("missing file must raise an alert");
        assert!(alert.contains("/nonexistent/circle_waves.toml"));
    }
}
