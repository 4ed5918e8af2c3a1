/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub camera: CameraConfig,
    pub display: DisplayConfig,
    pub maze: MazeConfig,
}

#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Horizontal field of view, degrees.
    pub fov_degrees: f64,
    /// Maze cells per movement tick while a key is held.
    pub move_speed: f64,
    /// Radians per discrete rotation key press.
    pub rotation_speed: f64,
    /// Radians per terminal column of mouse drag.
    pub mouse_sensitivity: f64,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    /// Minimum elapsed time between movement ticks.
    pub frame_interval_ms: u64,
}

#[derive(Clone, Debug)]
pub struct MazeConfig {
    /// Fixed seed for reproducible mazes; absent = fresh entropy.
    pub seed: Option<u64>,
}

impl CameraConfig {
    pub fn fov_radians(&self) -> f64 {
        self.fov_degrees.to_radians()
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    camera: TomlCamera,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    maze: TomlMaze,
}

#[derive(Deserialize, Debug)]
struct TomlCamera {
    #[serde(default = "default_fov")]
    fov_degrees: f64,
    #[serde(default = "default_move_speed")]
    move_speed: f64,
    #[serde(default = "default_rotation_speed")]
    rotation_speed: f64,
    #[serde(default = "default_mouse_sensitivity")]
    mouse_sensitivity: f64,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_frame_interval")]
    frame_interval_ms: u64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlMaze {
    #[serde(default)]
    seed: Option<u64>,
}

// ── Defaults ──

fn default_fov() -> f64 { 60.0 }
fn default_move_speed() -> f64 { 0.1 }
fn default_rotation_speed() -> f64 { 0.1 }
fn default_mouse_sensitivity() -> f64 { 0.05 }
fn default_frame_interval() -> u64 { 16 }   // ~60 Hz movement cadence

impl Default for TomlCamera {
    fn default() -> Self {
        TomlCamera {
            fov_degrees: default_fov(),
            move_speed: default_move_speed(),
            rotation_speed: default_rotation_speed(),
            mouse_sensitivity: default_mouse_sensitivity(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            frame_interval_ms: default_frame_interval(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            camera: CameraConfig {
                fov_degrees: toml_cfg.camera.fov_degrees,
                move_speed: toml_cfg.camera.move_speed,
                rotation_speed: toml_cfg.camera.rotation_speed,
                mouse_sensitivity: toml_cfg.camera.mouse_sensitivity,
            },
            display: DisplayConfig {
                frame_interval_ms: toml_cfg.display.frame_interval_ms,
            },
            maze: MazeConfig {
                seed: toml_cfg.maze.seed,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
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
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
