use hexwalk_engine::{resolve_app_paths, LoopConfig, Scene, Viewport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::config::{board_env_override, load_board_config, BoardConfigError, BoardSource};
use super::gameplay::HexWalkScene;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, BoardConfigError> {
    init_tracing();
    info!("=== hexwalk startup ===");

    let boards_dir = match resolve_app_paths() {
        Ok(paths) => Some(paths.boards_dir),
        Err(err) => {
            warn!(error = %err, "project_root_unresolved");
            None
        }
    };

    let (board, source) = load_board_config(board_env_override(), boards_dir.as_deref())?;
    match &source {
        BoardSource::EnvOverride(path) => {
            info!(path = %path.display(), "board_loaded_from_env")
        }
        BoardSource::File(path) => info!(path = %path.display(), "board_loaded_from_file"),
        BoardSource::BuiltIn => info!("board_loaded_builtin"),
    }
    info!(
        radius = board.radius,
        holes = board.holes.len(),
        start_q = board.start[0],
        start_r = board.start[1],
        "board_ready"
    );

    let config = LoopConfig::default();
    let viewport = Viewport {
        width: config.window_width,
        height: config.window_height,
    };
    let scene = Box::new(HexWalkScene::new(board, viewport)?);

    Ok(AppWiring { config, scene })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
