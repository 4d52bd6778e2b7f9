use anyhow::Result;
use chatlens_core::{FetchPlanInput, FetchPlanResult, ObserveConfig, runtime_dir};
use chrono::Utc;
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only record of the decisions a UI shell acted on.
///
/// The decision functions never log on their own; the shell hands each result to the
/// observer after computing it.
pub struct Observer {
    log_path: PathBuf,
    verbose: bool,
    log_decisions: bool,
}

impl Observer {
    pub fn new(workspace: &Path, cfg: &ObserveConfig) -> Result<Self> {
        let dir = runtime_dir(workspace);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            log_path: dir.join("observe.log"),
            verbose: cfg.verbose,
            log_decisions: cfg.log_decisions,
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn record_fetch_plan(&self, input: &FetchPlanInput, plan: &FetchPlanResult) -> Result<()> {
        if !self.log_decisions {
            return Ok(());
        }
        let payload = json!({
            "session_id": input.session_id,
            "status": input.status,
            "cached_state": input.cached_state,
            "cached_data_ok": input.cached_data_ok,
            "is_expanded": input.is_expanded,
            "should_fetch": plan.should_fetch(),
            "force": plan.force(),
        });
        self.verbose_log(&format!(
            "tool calls fetch={} force={} session={}",
            plan.should_fetch(),
            plan.force(),
            input.session_id.as_deref().unwrap_or("-")
        ));
        self.append_log_line(&format!(
            "{} FETCH_PLAN {}",
            Utc::now().to_rfc3339(),
            serde_json::to_string(&payload)?
        ))
    }

    /// `scanned` is the number of metadata records the pick was made from.
    pub fn record_model_pick(&self, scanned: usize, picked: Option<&str>) -> Result<()> {
        if !self.log_decisions {
            return Ok(());
        }
        self.verbose_log(&format!(
            "model pick from {scanned} records: {}",
            picked.unwrap_or("none")
        ));
        self.append_log_line(&format!(
            "{} MODEL_PICK {}",
            Utc::now().to_rfc3339(),
            json!({ "scanned": scanned, "model": picked })
        ))
    }

    /// Enable or disable verbose logging to stderr.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Log a message to stderr with `[chatlens]` prefix when verbose mode is on.
    pub fn verbose_log(&self, msg: &str) {
        if self.verbose {
            eprintln!("[chatlens] {msg}");
        }
    }

    /// Log a warning to stderr, and to the log file when it can be opened.
    pub fn warn_log(&self, msg: &str) {
        eprintln!("[chatlens WARN] {msg}");
        let _ = self.append_log_line(&format!("{} WARN {msg}", Utc::now().to_rfc3339()));
    }

    fn append_log_line(&self, line: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }
}
