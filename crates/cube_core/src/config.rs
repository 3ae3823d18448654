use std::{collections::HashMap, fs, sync::Arc, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use solver_integration::{ExternalSolver, HttpSolver, MissingSolver, ProcessSolver};
use tracing::{info, warn};

use crate::{
    orchestrator::{FallbackPolicy, SolveOrchestrator},
    playback::PlaybackTiming,
};

pub const SETTINGS_FILE: &str = "cube_solver.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    pub solver_url: Option<String>,
    pub solver_command: Option<String>,
    pub solver_args: Vec<String>,
    pub solver_input_prefix: Option<String>,
    pub solver_timeout_secs: u64,
    pub auto_play_interval_ms: u64,
    pub settle_delay_ms: u64,
    pub placeholder_fallback: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            solver_url: None,
            solver_command: None,
            solver_args: Vec::new(),
            solver_input_prefix: None,
            solver_timeout_secs: 30,
            auto_play_interval_ms: 2000,
            settle_delay_ms: 1000,
            placeholder_fallback: false,
        }
    }
}

impl EngineSettings {
    pub fn playback_timing(&self) -> PlaybackTiming {
        PlaybackTiming {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            auto_play_interval: Duration::from_millis(self.auto_play_interval_ms),
        }
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        if self.placeholder_fallback {
            FallbackPolicy::Placeholder
        } else {
            FallbackPolicy::SurfaceError
        }
    }

    pub fn solve_timeout(&self) -> Duration {
        Duration::from_secs(self.solver_timeout_secs)
    }
}

/// Defaults, then `cube_solver.toml` in the working directory, then the environment.
pub fn load_settings() -> EngineSettings {
    let mut settings = EngineSettings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        if let Err(err) = apply_file_overrides(&mut settings, &raw) {
            warn!(file = SETTINGS_FILE, error = %err, "ignoring settings file");
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn value_text(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(n) => Some(n.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn apply_file_overrides(settings: &mut EngineSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: HashMap<String, toml::Value> =
        toml::from_str(raw).context("settings file is not a flat toml table")?;

    let text = |key: &str| file_cfg.get(key).and_then(value_text);

    if let Some(v) = text("solver_url") {
        settings.solver_url = Some(v);
    }
    if let Some(v) = text("solver_command") {
        settings.solver_command = Some(v);
    }
    if let Some(v) = file_cfg.get("solver_args") {
        settings.solver_args = match v {
            toml::Value::Array(items) => items.iter().filter_map(value_text).collect(),
            other => value_text(other)
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        };
    }
    if let Some(v) = text("solver_input_prefix") {
        settings.solver_input_prefix = Some(v);
    }
    if let Some(v) = text("solver_timeout_secs").and_then(|v| v.parse().ok()) {
        settings.solver_timeout_secs = v;
    }
    if let Some(v) = text("auto_play_interval_ms").and_then(|v| v.parse().ok()) {
        settings.auto_play_interval_ms = v;
    }
    if let Some(v) = text("settle_delay_ms").and_then(|v| v.parse().ok()) {
        settings.settle_delay_ms = v;
    }
    if let Some(v) = text("placeholder_fallback").and_then(|v| flag(&v)) {
        settings.placeholder_fallback = v;
    }

    Ok(())
}

pub fn apply_env_overrides(settings: &mut EngineSettings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SOLVER_URL") {
        settings.solver_url = Some(v);
    }
    if let Some(v) = var("APP__SOLVER_URL") {
        settings.solver_url = Some(v);
    }

    if let Some(v) = var("SOLVER_COMMAND") {
        settings.solver_command = Some(v);
    }
    if let Some(v) = var("APP__SOLVER_COMMAND") {
        settings.solver_command = Some(v);
    }

    if let Some(v) = var("APP__SOLVER_ARGS") {
        settings.solver_args = v.split_whitespace().map(str::to_string).collect();
    }
    if let Some(v) = var("APP__SOLVER_INPUT_PREFIX") {
        settings.solver_input_prefix = Some(v);
    }

    if let Some(v) = var("APP__SOLVER_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.solver_timeout_secs = parsed;
        }
    }
    if let Some(v) = var("APP__AUTO_PLAY_INTERVAL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.auto_play_interval_ms = parsed;
        }
    }
    if let Some(v) = var("APP__SETTLE_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.settle_delay_ms = parsed;
        }
    }
    if let Some(v) = var("APP__PLACEHOLDER_FALLBACK").and_then(|v| flag(&v)) {
        settings.placeholder_fallback = v;
    }
}

/// URL wins over command; with neither configured every solve reports the
/// solver as unavailable.
pub fn build_solver(settings: &EngineSettings) -> anyhow::Result<Arc<dyn ExternalSolver>> {
    let url = settings.solver_url.as_deref().map(str::trim).filter(|s| !s.is_empty());
    if let Some(url) = url {
        let solver = HttpSolver::new(url).with_context(|| format!("invalid solver url '{url}'"))?;
        info!(endpoint = %solver.endpoint(), "using http solver");
        return Ok(Arc::new(solver));
    }

    let command = settings
        .solver_command
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(command) = command {
        let mut solver = ProcessSolver::new(command).args(settings.solver_args.iter().cloned());
        if let Some(prefix) = &settings.solver_input_prefix {
            solver = solver.input_prefix(prefix.clone());
        }
        info!(%command, "using solver executable");
        return Ok(Arc::new(solver));
    }

    warn!("no solver configured; solves will report the solver as unavailable");
    Ok(Arc::new(MissingSolver))
}

pub fn build_orchestrator(settings: &EngineSettings) -> anyhow::Result<SolveOrchestrator> {
    Ok(SolveOrchestrator::new(build_solver(settings)?)
        .with_timeout(settings.solve_timeout())
        .with_fallback(settings.fallback_policy()))
}
