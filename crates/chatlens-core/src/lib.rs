use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub type Result<T> = anyhow::Result<T>;

/// Tool-call status that keeps a task's call list live.
pub const RUNNING_STATUS: &str = "running";

pub fn runtime_dir(workspace: &Path) -> PathBuf {
    workspace.join(".chatlens")
}

pub fn normalize_status(status: &str) -> String {
    status.trim().to_lowercase()
}

/// Returns true if the status (in any case, with any surrounding whitespace) is `running`.
pub fn is_running_status(status: &str) -> bool {
    normalize_status(status) == RUNNING_STATUS
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown cached state `{0}` (expected idle, loading or ok)")]
    UnknownCachedState(String),
    #[error("invalid config path")]
    InvalidConfigPath,
}

/// Freshness of the tool-call list a UI layer holds for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachedState {
    #[default]
    Idle,
    Loading,
    Ok,
}

impl CachedState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ok => "ok",
        }
    }
}

impl fmt::Display for CachedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachedState {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "loading" => Ok(Self::Loading),
            "ok" => Ok(Self::Ok),
            _ => Err(CoreError::UnknownCachedState(s.to_string())),
        }
    }
}

/// Snapshot of the UI facts that decide whether a session's tool calls get fetched.
///
/// Field names serialize in camelCase so a frontend can hand over its state object as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchPlanInput {
    pub session_id: Option<String>,
    pub status: String,
    pub cached_state: CachedState,
    pub cached_data_ok: bool,
    pub is_expanded: bool,
}

impl FetchPlanInput {
    /// A session is present when the id is set and not the empty string.
    pub fn has_session(&self) -> bool {
        self.session_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Outcome of a fetch decision. `force` is only ever set together with `should_fetch`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPlanResult {
    should_fetch: bool,
    force: bool,
}

impl FetchPlanResult {
    pub const fn skip() -> Self {
        Self {
            should_fetch: false,
            force: false,
        }
    }

    pub const fn fetch() -> Self {
        Self {
            should_fetch: true,
            force: false,
        }
    }

    /// Fetch and bypass whatever is cached.
    pub const fn forced() -> Self {
        Self {
            should_fetch: true,
            force: true,
        }
    }

    pub fn should_fetch(&self) -> bool {
        self.should_fetch
    }

    pub fn force(&self) -> bool {
        self.force
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub ui: UiConfig,
    pub observe: ObserveConfig,
}

fn default_model_placeholder() -> String {
    "unknown model".to_string()
}
fn default_show_model_badge() -> bool {
    true
}
fn default_log_decisions() -> bool {
    true
}

impl AppConfig {
    pub fn user_settings_path() -> Option<PathBuf> {
        let home = std::env::var("HOME")
            .ok()
            .or_else(|| std::env::var("USERPROFILE").ok())?;
        Some(Path::new(&home).join(".chatlens/settings.json"))
    }

    pub fn project_settings_path(workspace: &Path) -> PathBuf {
        runtime_dir(workspace).join("settings.json")
    }

    pub fn project_local_settings_path(workspace: &Path) -> PathBuf {
        runtime_dir(workspace).join("settings.local.json")
    }

    /// Settings files in overlay order: user, project, project-local.
    fn layer_paths(workspace: &Path, user_settings: Option<PathBuf>) -> Vec<PathBuf> {
        user_settings
            .into_iter()
            .chain([
                Self::project_settings_path(workspace),
                Self::project_local_settings_path(workspace),
            ])
            .collect()
    }

    pub fn load(workspace: &Path) -> Result<Self> {
        Self::load_layers(workspace, Self::user_settings_path())
    }

    /// Overlays each existing settings file on the defaults. Later files win; objects
    /// merge key by key.
    pub fn load_layers(workspace: &Path, user_settings: Option<PathBuf>) -> Result<Self> {
        let mut merged = serde_json::to_value(Self::default())?;
        for path in Self::layer_paths(workspace, user_settings) {
            if !path.exists() {
                continue;
            }
            let layer: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
            overlay_settings(&mut merged, layer);
        }
        Ok(serde_json::from_value(merged)?)
    }

    pub fn ensure(workspace: &Path) -> Result<Self> {
        Self::ensure_layers(workspace, Self::user_settings_path())
    }

    /// Loads the settings layers if any of them exists, otherwise writes the defaults
    /// to the project settings file.
    pub fn ensure_layers(workspace: &Path, user_settings: Option<PathBuf>) -> Result<Self> {
        let paths = Self::layer_paths(workspace, user_settings.clone());
        if paths.iter().any(|path| path.exists()) {
            return Self::load_layers(workspace, user_settings);
        }
        let cfg = Self::default();
        cfg.save(workspace)?;
        Ok(cfg)
    }

    pub fn save(&self, workspace: &Path) -> Result<()> {
        let path = Self::project_settings_path(workspace);
        fs::create_dir_all(path.parent().ok_or(CoreError::InvalidConfigPath)?)?;
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }
}

fn overlay_settings(base: &mut serde_json::Value, layer: serde_json::Value) {
    use serde_json::Value;

    match (base, layer) {
        (Value::Object(base_obj), Value::Object(layer_obj)) => {
            for (key, value) in layer_obj {
                match base_obj.get_mut(&key) {
                    Some(slot) => overlay_settings(slot, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Text shown where no provider/model could be resolved from message metadata.
    #[serde(default = "default_model_placeholder")]
    pub model_placeholder: String,
    #[serde(default = "default_show_model_badge")]
    pub show_model_badge: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            model_placeholder: default_model_placeholder(),
            show_model_badge: default_show_model_badge(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserveConfig {
    /// Echo decision records to stderr.
    pub verbose: bool,
    /// Append fetch plans and model picks to `observe.log`.
    #[serde(default = "default_log_decisions")]
    pub log_decisions: bool,
}

impl Default for ObserveConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_decisions: default_log_decisions(),
        }
    }
}
