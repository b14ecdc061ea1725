use std::fs;
use std::path::{Path, PathBuf};

use hexwalk_engine::{Hex, HexGrid, HexKey, Vec2, MAX_HEXAGON_RADIUS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const BOARD_ENV_VAR: &str = "HEXWALK_BOARD";
pub(crate) const DEFAULT_BOARD_FILE: &str = "default.json";

/// Board shape, actor spawn and presentation sizes. Coordinates are axial `[q, r]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BoardConfig {
    pub radius: u32,
    #[serde(default)]
    pub holes: Vec<[i32; 2]>,
    pub start: [i32; 2],
    pub hex_size: Vec2,
    pub actor_speed: f32,
    #[serde(default = "default_hex_depth")]
    pub hex_depth: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            radius: 4,
            holes: vec![[-4, 0], [4, 0], [0, 0]],
            start: [-2, 1],
            hex_size: Vec2::new(100.0, 50.0),
            actor_speed: 5.0,
            hex_depth: default_hex_depth(),
        }
    }
}

fn default_hex_depth() -> f32 {
    30.0
}

#[derive(Debug, Error)]
pub(crate) enum BoardConfigError {
    #[error("failed to read board file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse board file {path} at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("radius {radius} is larger than the maximum board radius {max}")]
    InvalidRadius { radius: u32, max: u32 },
    #[error("start hex {q}_{r} is not on the board")]
    InvalidStart { q: i32, r: i32 },
    #[error("actor_speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),
    #[error("hex_size must be positive and finite, got {x}x{y}")]
    InvalidSize { x: f32, y: f32 },
    #[error("hex_depth must be finite and not negative, got {0}")]
    InvalidDepth(f32),
}

/// Where the active board definition came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BoardSource {
    EnvOverride(PathBuf),
    File(PathBuf),
    BuiltIn,
}

impl BoardConfig {
    pub(crate) fn start_hex(&self) -> Hex {
        Hex::axial(self.start[0], self.start[1])
    }

    pub(crate) fn build_grid(&self) -> Result<HexGrid, BoardConfigError> {
        let mut grid =
            HexGrid::hexagon(self.radius).map_err(|_| BoardConfigError::InvalidRadius {
                radius: self.radius,
                max: MAX_HEXAGON_RADIUS,
            })?;
        for [q, r] in &self.holes {
            grid.remove(HexKey::new(*q, *r));
        }
        Ok(grid)
    }

    pub(crate) fn validate(&self) -> Result<(), BoardConfigError> {
        if self.radius > MAX_HEXAGON_RADIUS {
            return Err(BoardConfigError::InvalidRadius {
                radius: self.radius,
                max: MAX_HEXAGON_RADIUS,
            });
        }
        if !(self.actor_speed.is_finite() && self.actor_speed > 0.0) {
            return Err(BoardConfigError::InvalidSpeed(self.actor_speed));
        }
        let size = self.hex_size;
        if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(BoardConfigError::InvalidSize {
                x: size.x,
                y: size.y,
            });
        }
        if !(self.hex_depth.is_finite() && self.hex_depth >= 0.0) {
            return Err(BoardConfigError::InvalidDepth(self.hex_depth));
        }
        let [q, r] = self.start;
        if !self.build_grid()?.contains(HexKey::new(q, r)) {
            return Err(BoardConfigError::InvalidStart { q, r });
        }
        Ok(())
    }
}

/// An explicit override must load; the conventional file is optional and falls back to the
/// built-in board when absent.
pub(crate) fn load_board_config(
    env_override: Option<PathBuf>,
    boards_dir: Option<&Path>,
) -> Result<(BoardConfig, BoardSource), BoardConfigError> {
    if let Some(path) = env_override {
        let config = read_board_config(&path)?;
        return Ok((config, BoardSource::EnvOverride(path)));
    }

    if let Some(dir) = boards_dir {
        let path = dir.join(DEFAULT_BOARD_FILE);
        if path.is_file() {
            let config = read_board_config(&path)?;
            return Ok((config, BoardSource::File(path)));
        }
    }

    let config = BoardConfig::default();
    config.validate()?;
    Ok((config, BoardSource::BuiltIn))
}

pub(crate) fn board_env_override() -> Option<PathBuf> {
    std::env::var_os(BOARD_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub(crate) fn read_board_config(path: &Path) -> Result<BoardConfig, BoardConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| BoardConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_board_config(&raw, path)?;
    config.validate()?;
    Ok(config)
}

fn parse_board_config(raw: &str, path: &Path) -> Result<BoardConfig, BoardConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, BoardConfig>(&mut deserializer).map_err(|error| {
        let field = error.path().to_string();
        BoardConfigError::Parse {
            path: path.to_path_buf(),
            field,
            source: error.into_inner(),
        }
    })
}
