//! Headless runner for the Inkfolio site.
//!
//! Mounts a [`PageShell`] on a runtime, feeds it a script of input events and
//! logs a text summary of the frame after each one. With [`Pacing::Simulated`]
//! time only moves on `wait` and the run is instant and reproducible; with
//! [`Pacing::Realtime`] waits sleep on the system clock.

pub mod script;

pub use inkfolio_site::{ConfigError, SiteConfig, load_config};
pub use script::*;

use anyhow::{Context, bail};
use inkfolio_core::{ManualClock, Runtime, SystemClock};
use inkfolio_navigation::Route;
use inkfolio_site::{ClickAction, PageShell, SubmitError};
use web_time::{Duration, Instant};

/// Step used to sample smoothed values while waiting.
pub const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Debug, Default)]
pub enum Pacing {
    #[default]
    Simulated,
    Realtime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Frame summary after every event.
    pub summaries: Vec<String>,
    pub actions: Vec<ClickAction>,
    pub rejected_submissions: Vec<SubmitError>,
    pub route: Route,
    pub elapsed: Duration,
}

enum Driver {
    Manual(ManualClock),
    System,
}

impl Driver {
    fn wait(&self, rt: &Runtime, shell: &PageShell, d: Duration) {
        let end = rt.now() + d;
        loop {
            let left = end.saturating_duration_since(rt.now());
            if left.is_zero() {
                break;
            }
            let step = left.min(FRAME);
            match self {
                Driver::Manual(clock) => {
                    rt.advance(clock, step);
                }
                Driver::System => {
                    std::thread::sleep(step);
                    rt.fire_due();
                }
            }
            shell.tick();
        }
    }
}

/// Runs `script` against a fresh shell on a manual clock.
pub fn run_headless(config: SiteConfig, script: &[ScriptEvent]) -> anyhow::Result<RunReport> {
    run_with(config, script, Pacing::Simulated)
}

pub fn run_with(config: SiteConfig, script: &[ScriptEvent], pacing: Pacing) -> anyhow::Result<RunReport> {
    config.validate().context("refusing to run with an invalid config")?;
    let viewport = config.viewport_size();
    let (driver, rt) = match pacing {
        Pacing::Simulated => {
            let clock = ManualClock::new();
            let rt = Runtime::with_options(clock.shared(), viewport, config.seed);
            (Driver::Manual(clock), rt)
        }
        Pacing::Realtime => (
            Driver::System,
            Runtime::with_options(SystemClock::shared(), viewport, config.seed),
        ),
    };
    let started: Instant = rt.now();
    let shell = PageShell::mount(&rt, config, Route::Home);
    log::info!("headless run: {} event(s)", script.len());

    let mut report = RunReport {
        summaries: Vec::new(),
        actions: Vec::new(),
        rejected_submissions: Vec::new(),
        route: Route::Home,
        elapsed: Duration::ZERO,
    };

    for (i, event) in script.iter().enumerate() {
        log::debug!("event {i}: {event:?}");
        match event {
            ScriptEvent::PointerMove(p) => shell.pointer_moved(*p),
            ScriptEvent::Click(p) => {
                let action = shell.click(*p);
                if let ClickAction::Download(path) = action {
                    log::info!("download {path}");
                }
                report.actions.push(action);
            }
            ScriptEvent::Navigate(path) => {
                shell.navigate_path(path);
            }
            ScriptEvent::Back => {
                if !shell.back() {
                    log::warn!("back: already at the first page");
                }
            }
            ScriptEvent::Scroll(y) => shell.scrolled_to(*y),
            ScriptEvent::Resize(size) => rt.input().resized(*size),
            ScriptEvent::Type { field, value } => {
                if !shell.type_into(*field, value) {
                    bail!("event {i}: cannot type into {field:?} on {}", shell.route());
                }
            }
            ScriptEvent::Submit => match shell.submit() {
                Some(Ok(())) => {}
                Some(Err(e)) => {
                    log::warn!("submit rejected: {e}");
                    report.rejected_submissions.push(e);
                }
                None => bail!("event {i}: no form to submit on {}", shell.route()),
            },
            ScriptEvent::Wait(d) => driver.wait(&rt, &shell, *d),
        }

        let summary = shell.describe();
        for line in summary.lines() {
            log::info!("[{i:>3}] {line}");
        }
        report.summaries.push(summary);
    }

    report.route = shell.route();
    report.elapsed = rt.now().saturating_duration_since(started);
    shell.teardown();
    if rt.pending_timers() > 0 {
        log::warn!("{} timer(s) still pending after teardown", rt.pending_timers());
    }
    Ok(report)
}
