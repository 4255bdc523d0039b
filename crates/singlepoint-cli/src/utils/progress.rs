use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use singlepoint::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

const SPINNER_TICK_MS: u64 = 80;

#[derive(Debug)]
struct PhaseTracker {
    bar: ProgressBar,
    current: Option<&'static str>,
    completed: Vec<&'static str>,
}

/// Drives one terminal progress line from evaluator events.
///
/// Each phase shows a spinner; tasks inside a phase switch it to a bar over their work
/// items (atom rows for pairs, bonds for bonded terms).
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PhaseTracker>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A handler that tracks phases without drawing anything.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target)
            .with_style(Self::spinner_style())
            .with_message("Preparing evaluation...");
        bar.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(PhaseTracker {
                bar,
                current: None,
                completed: Vec::new(),
            })),
        }
    }

    pub fn completed_phases(&self) -> Vec<&'static str> {
        self.state
            .lock()
            .map(|state| state.completed.clone())
            .unwrap_or_default()
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };
            let bar = state.bar.clone();

            match progress {
                Progress::PhaseStart { name } => {
                    state.current = Some(name);
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(Self::spinner_style());
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    bar.set_message(name);
                }
                Progress::PhaseFinish => {
                    bar.disable_steady_tick();
                    if let Some(name) = state.current.take() {
                        let elapsed_ms = bar.elapsed().as_millis() as u64;
                        info!(phase = name, elapsed_ms, "Phase finished");
                        state.completed.push(name);
                        bar.finish_with_message(format!("✓ {}", name));
                    } else {
                        bar.finish_with_message("✓ Done");
                    }
                }
                Progress::TaskStart { total_steps } => {
                    bar.disable_steady_tick();
                    bar.reset();
                    bar.set_length(total_steps);
                    bar.set_position(0);
                    bar.set_style(Self::bar_style());
                    bar.set_message(state.current.unwrap_or("Working"));
                }
                Progress::TaskIncrement => {
                    bar.inc(1);
                }
                Progress::TaskFinish => {
                    let length = bar.length().unwrap_or(0);
                    if bar.position() < length {
                        bar.set_position(length);
                    }
                    bar.finish();
                }
                Progress::Message(msg) => {
                    if bar.is_finished() {
                        bar.set_message(msg);
                    } else {
                        bar.println(format!("  {}", msg));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<28} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
            })
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
