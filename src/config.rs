/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD or
/// `~/.local/share/lunar-labyrinth`, first match wins.
/// Falls back to sensible defaults if the file is missing or incomplete.

use log::warn;
use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::rules::GenerationParameters;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: GenerationParameters,
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    pub seed: Option<u64>,
    pub assets_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    maze: TomlMaze,
    #[serde(default)]
    score: TomlScore,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default = "default_window_width")]
    window_width: usize,
    #[serde(default = "default_window_height")]
    window_height: usize,
    #[serde(default = "default_cell_size")]
    cell_size: usize,
    #[serde(default = "default_key_count")]
    key_count: usize,
    #[serde(default = "default_trap_count")]
    trap_count: usize,
    #[serde(default = "default_required_keys")]
    required_keys: u32,
    #[serde(default = "default_max_placement_attempts")]
    max_placement_attempts: usize,
    #[serde(default = "default_generation_attempts")]
    generation_attempts: usize,
}

#[derive(Deserialize, Debug)]
struct TomlScore {
    #[serde(default = "default_key_score")]
    key: i64,
    #[serde(default = "default_trap_score")]
    trap: i64,
    #[serde(default = "default_level_score")]
    level: i64,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_assets_dir")]
    assets_dir: String,
}

// ── Defaults ──

fn default_window_width() -> usize { 800 }
fn default_window_height() -> usize { 600 }
fn default_cell_size() -> usize { 40 }
fn default_key_count() -> usize { 3 }
fn default_trap_count() -> usize { 5 }
fn default_required_keys() -> u32 { 3 }
fn default_max_placement_attempts() -> usize { 10_000 }
fn default_generation_attempts() -> usize { 3 }

fn default_key_score() -> i64 { 50 }
fn default_trap_score() -> i64 { -20 }
fn default_level_score() -> i64 { 100 }

fn default_tick_rate() -> u64 { 90 }  // held key repeats ~11 moves/s

fn default_restart() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_assets_dir() -> String { "assets".into() }

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze {
            window_width: default_window_width(),
            window_height: default_window_height(),
            cell_size: default_cell_size(),
            key_count: default_key_count(),
            trap_count: default_trap_count(),
            required_keys: default_required_keys(),
            max_placement_attempts: default_max_placement_attempts(),
            generation_attempts: default_generation_attempts(),
        }
    }
}

impl Default for TomlScore {
    fn default() -> Self {
        TomlScore {
            key: default_key_score(),
            trap: default_trap_score(),
            level: default_level_score(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            restart: default_restart(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            seed: None,
            assets_dir: default_assets_dir(),
        }
    }
}

// ── Derivation ──

/// Cells that fit along one window axis, rounded down to odd so the
/// border + odd-node layout closes evenly.
fn odd_cells(window: usize, cell_size: usize) -> usize {
    let n = window / cell_size.max(1);
    if n % 2 == 0 { n.saturating_sub(1) } else { n }
}

impl TomlConfig {
    fn generation_parameters(&self) -> GenerationParameters {
        let m = &self.maze;
        let params = GenerationParameters {
            width: odd_cells(m.window_width, m.cell_size),
            height: odd_cells(m.window_height, m.cell_size),
            key_count: m.key_count,
            trap_count: m.trap_count,
            required_keys: m.required_keys,
            key_score: self.score.key,
            trap_score: self.score.trap,
            level_score: self.score.level,
            max_placement_attempts: m.max_placement_attempts,
            generation_attempts: m.generation_attempts,
        };
        match params.validate() {
            Ok(()) => params,
            Err(e) => {
                warn!("{e}; using default maze settings");
                GenerationParameters::default()
            }
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/lunar-labyrinth`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Resolve assets directory
        let assets_str = &toml_cfg.general.assets_dir;
        let assets_dir = if PathBuf::from(assets_str).is_absolute() {
            PathBuf::from(assets_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(assets_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(assets_str))
        };

        GameConfig {
            rules: toml_cfg.generation_parameters(),
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms.max(1),
            },
            gamepad: GamepadConfig {
                restart: toml_cfg.gamepad.restart,
                quit: toml_cfg.gamepad.quit,
            },
            seed: toml_cfg.general.seed,
            assets_dir,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/lunar-labyrinth)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/lunar-labyrinth");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warn!("config.toml parse error: {e}");
                        warn!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
