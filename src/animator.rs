//! Central animation task driving the waves and the category reveal.
//!
//! High-level flow each loop iteration:
//! 1) Compute the next wake-up: the next frame (16 ms of real time) while
//!    anything animates, otherwise the next scheduled event (introduction or
//!    auto-stop), otherwise none.
//! 2) `select` waits for a UI command or that deadline. With no deadline the
//!    task only waits for commands.
//! 3) Apply the command, if any, then advance the sequencer and layout to
//!    "now" and publish a fresh `SceneFrame`.
//!
//! All animation state lives in `Animator` and is only touched from this task.

use embassy_futures::select::{Either, select};
use embassy_sync::channel::TrySendError;
use embassy_time::{Duration, Instant, Timer};
use std::path::Path;

use crate::animation::AnimationClock;
use crate::categories::CategoryLayout;
use crate::render::SceneFrame;
use crate::ui::{UICommand, UIRefreshState};
use crate::waves::{WaveConfig, WaveSequencer, max_radius_for_viewport};
use crate::{UICommandQueueReceiver, UIRefreshQueueSender};

/// Real time between published frames while something animates.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Owns every piece of animation state. Inputs are real executor instants;
/// they are mapped to animation time through the speed-scaled clock.
pub struct Animator {
    clock: AnimationClock,
    sequencer: WaveSequencer,
    layout: Option<CategoryLayout>,
    /// Last map size in points, once known.
    viewport: Option<(f32, f32)>,
}

impl Animator {
    pub fn new(config: WaveConfig, real_now: Instant) -> Self {
        Self {
            clock: AnimationClock::new(real_now),
            sequencer: WaveSequencer::new(config, 0.0),
            layout: None,
            viewport: None,
        }
    }

    #[cfg(test)]
    pub fn sequencer(&self) -> &WaveSequencer {
        &self.sequencer
    }

    pub fn speed_percent(&self) -> u32 {
        self.clock.speed_percent()
    }

    /// Apply one UI command. Returns the messages the UI should receive.
    pub fn handle_command(&mut self, command: UICommand, real_now: Instant) -> Vec<UIRefreshState> {
        let now = self.clock.now(real_now);
        match command {
            UICommand::ViewportChanged { width, height } => {
                self.viewport = Some((width, height));
                let max_radius = max_radius_for_viewport(width, height, self.sequencer.config().scale_factor);
                self.sequencer.set_max_radius(max_radius);
                match &mut self.layout {
                    Some(layout) => layout.relayout(height, now),
                    None => {
                        // First known size: reveal the categories and start the waves.
                        log::info!("Viewport {:.0}x{:.0}, starting animations", width, height);
                        self.layout = Some(CategoryLayout::reveal(height, now));
                        self.sequencer.start(now);
                    }
                }
                Vec::new()
            }
            UICommand::ResetWaves => {
                if self.sequencer.is_started() {
                    self.sequencer.reset(now);
                }
                Vec::new()
            }
            UICommand::StopWaves => {
                log::info!("Stopping waves {:?}", self.sequencer.active_indices().collect::<Vec<_>>());
                self.sequencer.stop(now);
                Vec::new()
            }
            UICommand::SetPlaybackMode(playback) => {
                let config = WaveConfig {
                    playback,
                    ..self.sequencer.config().clone()
                };
                self.apply_config(config, now)
            }
            UICommand::SetEasing(easing) => {
                let config = WaveConfig {
                    easing,
                    ..self.sequencer.config().clone()
                };
                self.apply_config(config, now)
            }
            UICommand::SetSpeedPercent(percent) => {
                self.clock.set_speed_percent(real_now, percent);
                vec![UIRefreshState::SpeedChanged(self.speed_percent())]
            }
            UICommand::LoadConfig(path) => match WaveConfig::load(Path::new(&path)) {
                Ok(config) => self.apply_config(config, now),
                Err(e) => {
                    log::error!("Failed to load configuration {}: {:#}", path, e);
                    vec![UIRefreshState::Alert(format!("Could not load {}:\n{:#}", path, e))]
                }
            },
        }
    }

    /// New configuration means a new run; before the first viewport size is
    /// known it is only stored. The max radius follows the new scale factor.
    fn apply_config(&mut self, config: WaveConfig, now: Instant) -> Vec<UIRefreshState> {
        let applied = config.clone();
        let max_radius = self
            .viewport
            .map(|(width, height)| max_radius_for_viewport(width, height, config.scale_factor))
            .unwrap_or(0.0);
        if self.sequencer.is_started() {
            self.sequencer.set_max_radius(max_radius);
            self.sequencer.replace_config(config, now);
        } else {
            self.sequencer = WaveSequencer::new(config, max_radius);
        }
        vec![UIRefreshState::ConfigApplied(applied)]
    }

    /// Bring everything to `real_now` and snapshot it for rendering.
    pub fn advance(&mut self, real_now: Instant) -> SceneFrame {
        let now = self.clock.now(real_now);
        self.sequencer.tick(now);
        if let Some(layout) = &mut self.layout {
            layout.tick(now);
        }
        SceneFrame {
            run: self.sequencer.run(),
            waves: self.sequencer.frames(),
            markers: self.layout.as_ref().map(|l| l.frames()).unwrap_or_default(),
            stopped: self.sequencer.is_stopped(),
            playback: self.sequencer.config().playback,
            max_radius: self.sequencer.max_radius(),
            run_elapsed_ms: self.sequencer.run_elapsed(now).as_millis(),
        }
    }

    pub fn is_animating(&self, real_now: Instant) -> bool {
        let now = self.clock.now(real_now);
        self.sequencer.is_animating(now) || self.layout.as_ref().is_some_and(|l| l.is_animating(now))
    }

    /// Real instant of the next required wake-up, or `None` to sleep until a command.
    pub fn next_wake(&self, real_now: Instant) -> Option<Instant> {
        let event = self.sequencer.next_event_at().map(|at| self.clock.real_deadline(at));
        if self.is_animating(real_now) {
            let frame = real_now + FRAME_INTERVAL;
            return Some(match event {
                Some(event) if event < frame => event,
                _ => frame,
            });
        }
        event
    }
}

fn publish(ui_refresh_tx: &UIRefreshQueueSender, message: UIRefreshState) {
    if let Err(TrySendError::Full(message)) = ui_refresh_tx.try_send(message) {
        log::log!(dropped_message_level(&message), "UI refresh queue full, dropping {:?}", message);
    }
}

/// Frames are superseded by the next one; anything else is lost for good.
fn dropped_message_level(message: &UIRefreshState) -> log::Level {
    match message {
        UIRefreshState::FrameUpdated(_) => log::Level::Trace,
        _ => log::Level::Warn,
    }
}

/// Central animation task.
///
/// Receives `UICommand`s, advances the animation on frame and event deadlines,
/// and publishes `SceneFrame`s to the UI. `startup_alert` is shown once, for
/// problems found before the task started (e.g. an invalid config file).
#[embassy_executor::task]
pub async fn animation_task(ui_refresh_tx: UIRefreshQueueSender, ui_command_rx: UICommandQueueReceiver, config: WaveConfig, startup_alert: Option<String>) {
    let mut animator = Animator::new(config.clone(), Instant::now());
    publish(&ui_refresh_tx, UIRefreshState::ConfigApplied(config));
    if let Some(alert) = startup_alert {
        publish(&ui_refresh_tx, UIRefreshState::Alert(alert));
    }

    loop {
        let command = match animator.next_wake(Instant::now()) {
            Some(deadline) => match select(ui_command_rx.receive(), Timer::at(deadline)).await {
                Either::First(command) => Some(command),
                Either::Second(_) => None,
            },
            None => Some(ui_command_rx.receive().await),
        };

        if let Some(command) = command {
            log::debug!("UI command: {:?}", command);
            for message in animator.handle_command(command, Instant::now()) {
                publish(&ui_refresh_tx, message);
            }
        }

        let frame = animator.advance(Instant::now());
        publish(&ui_refresh_tx, UIRefreshState::FrameUpdated(frame));
    }
}
