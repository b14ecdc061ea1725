use std::mem;

use hexwalk_engine::{Hex, HexGrid, HexKey, HexStyle, Layout, Vec2, Viewport};
use thiserror::Error;
use tracing::{debug, info};

use super::actor::Actor;
use super::notifier::Event;
use super::ui::{ButtonAction, ButtonId, Ui};
use crate::app::config::{BoardConfig, BoardConfigError};

pub(crate) const HOVER_FILL_COLOR: [u8; 4] = [0x01, 0x67, 0x2c, 0xff];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum GameError {
    #[error("actor cell {q}_{r} is not on the grid")]
    OffGridLookup { q: i32, r: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameEvent {
    HexHovered(Hex),
    HexClicked(Hex),
    ButtonHovered(ButtonId),
    ButtonClicked(ButtonId),
    TurnSkipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum GameEventKind {
    HexHovered,
    HexClicked,
    ButtonHovered,
    ButtonClicked,
    TurnSkipped,
}

impl Event for GameEvent {
    type Kind = GameEventKind;

    fn kind(&self) -> GameEventKind {
        match self {
            GameEvent::HexHovered(_) => GameEventKind::HexHovered,
            GameEvent::HexClicked(_) => GameEventKind::HexClicked,
            GameEvent::ButtonHovered(_) => GameEventKind::ButtonHovered,
            GameEvent::ButtonClicked(_) => GameEventKind::ButtonClicked,
            GameEvent::TurnSkipped => GameEventKind::TurnSkipped,
        }
    }
}

/// Waypoints shown while hovering; `target` records which cell they lead to.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PathPreview {
    visible: bool,
    target: Option<HexKey>,
    waypoints: Vec<Vec2>,
}

impl PathPreview {
    pub(crate) fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    fn show(&mut self, target: HexKey, waypoints: Vec<Vec2>) {
        self.visible = !waypoints.is_empty();
        self.target = Some(target);
        self.waypoints = waypoints;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn leads_to(&self, target: HexKey) -> bool {
        self.visible && self.target == Some(target)
    }
}

/// Board state for one play session.
///
/// Pointer input becomes [`GameEvent`]s here; the notifier routes them back into the handler
/// methods below. Follow-up events raised by handlers wait in the outbox until the scene drains
/// them.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    layout: Layout,
    grid: HexGrid,
    actor: Actor,
    preview: PathPreview,
    ui: Ui,
    player_turn: bool,
    hovered_cell: Option<HexKey>,
    outbox: Vec<GameEvent>,
}

impl Session {
    pub(crate) fn new(layout: Layout, grid: HexGrid, start: Hex, speed: f32) -> Self {
        let actor = Actor::spawn(start, &layout, speed);
        Self {
            layout,
            grid,
            actor,
            preview: PathPreview::default(),
            ui: Ui::default(),
            player_turn: true,
            hovered_cell: None,
            outbox: Vec::new(),
        }
    }

    pub(crate) fn from_board(
        board: &BoardConfig,
        viewport: Viewport,
    ) -> Result<Self, BoardConfigError> {
        let layout = Layout::new(viewport.center(), board.hex_size);
        Ok(Self::new(
            layout,
            board.build_grid()?,
            board.start_hex(),
            board.actor_speed,
        ))
    }

    pub(crate) fn layout(&self) -> &Layout {
        &self.layout
    }

    pub(crate) fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub(crate) fn actor(&self) -> &Actor {
        &self.actor
    }

    pub(crate) fn preview(&self) -> &PathPreview {
        &self.preview
    }

    pub(crate) fn ui(&self) -> &Ui {
        &self.ui
    }

    pub(crate) fn is_player_turn(&self) -> bool {
        self.player_turn
    }

    pub(crate) fn hovered_cell(&self) -> Option<HexKey> {
        self.hovered_cell
    }

    /// Resolves a pointer move. Buttons claim the pointer before the grid; a pointer outside
    /// both hides the preview. `None` means the pointer left the window.
    pub(crate) fn pointer_moved(&mut self, point: Option<Vec2>) -> Option<GameEvent> {
        self.ui.clear_hover();
        let Some(point) = point else {
            self.preview.hide();
            self.set_hover_highlight(None);
            return None;
        };

        if let Some(id) = self.ui.hit_test(point) {
            self.set_hover_highlight(None);
            return Some(GameEvent::ButtonHovered(id));
        }

        match self.member_at(point) {
            Some(hex) => {
                self.set_hover_highlight(Some(hex.key()));
                Some(GameEvent::HexHovered(hex))
            }
            None => {
                self.preview.hide();
                self.set_hover_highlight(None);
                None
            }
        }
    }

    pub(crate) fn pointer_clicked(&self, point: Vec2) -> Option<GameEvent> {
        if let Some(id) = self.ui.hit_test(point) {
            return Some(GameEvent::ButtonClicked(id));
        }
        self.member_at(point).map(GameEvent::HexClicked)
    }

    fn member_at(&self, point: Vec2) -> Option<Hex> {
        let hex = self.layout.pixel_to_hex(point);
        self.grid.get(hex.key()).copied()
    }

    pub(crate) fn show_path_preview(&mut self, target: &Hex) -> Result<(), GameError> {
        if !self.actor.is_idle() || !self.player_turn || self.actor.is_at(target) {
            self.preview.hide();
            return Ok(());
        }

        let waypoints = self.plan_waypoints(target)?;
        debug!(
            q = target.q(),
            r = target.r(),
            steps = waypoints.len(),
            "path_preview"
        );
        self.preview.show(target.key(), waypoints);
        Ok(())
    }

    /// Commits a move to `target`. Ignored while moving, off turn, or for non-member cells.
    pub(crate) fn start_player_action(&mut self, target: &Hex) -> Result<(), GameError> {
        if !self.actor.is_idle() || !self.player_turn {
            debug!(q = target.q(), r = target.r(), "click_ignored");
            return Ok(());
        }
        if !self.grid.contains_hex(target) {
            return Ok(());
        }

        let waypoints = if self.preview.leads_to(target.key()) {
            self.preview.waypoints.clone()
        } else {
            self.plan_waypoints(target)?
        };
        let steps = waypoints.len();
        if self.actor.begin_route(waypoints) {
            info!(q = target.q(), r = target.r(), steps, "move_committed");
        }
        self.preview.clear();
        Ok(())
    }

    pub(crate) fn hover_button(&mut self, id: ButtonId) {
        self.ui.set_hovered(id);
        self.preview.hide();
    }

    /// Buttons only act while the actor stands still.
    pub(crate) fn click_button(&mut self, id: ButtonId) {
        if !self.actor.is_idle() {
            return;
        }
        let Some(button) = self.ui.get(id) else {
            return;
        };
        match button.action() {
            ButtonAction::SkipTurn => self.outbox.push(GameEvent::TurnSkipped),
        }
    }

    pub(crate) fn toggle_turn(&mut self) {
        self.player_turn = !self.player_turn;
        if !self.player_turn {
            self.preview.hide();
        }
        info!(player_turn = self.player_turn, "turn_skipped");
    }

    pub(crate) fn take_pending_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.outbox)
    }

    pub(crate) fn tick(&mut self) {
        self.actor.update(&self.layout);
    }

    /// Recenters the board on the new window and carries the actor across. The preview is
    /// dropped and rebuilt by the next hover.
    pub(crate) fn resize(&mut self, viewport: Viewport) {
        let shift = self.layout.recenter(viewport.center());
        self.actor.rebase(shift);
        self.preview.clear();
        debug!(
            width = viewport.width,
            height = viewport.height,
            "board_recentered"
        );
    }

    fn plan_waypoints(&self, target: &Hex) -> Result<Vec<Vec2>, GameError> {
        let actor_key = self.actor.hex().key();
        let Some(start) = self.grid.get(actor_key) else {
            return Err(GameError::OffGridLookup {
                q: actor_key.q,
                r: actor_key.r,
            });
        };
        Ok(self
            .grid
            .search_path(start, target)
            .iter()
            .map(|hex| self.layout.hex_to_pixel(hex))
            .collect())
    }

    fn set_hover_highlight(&mut self, next: Option<HexKey>) {
        if self.hovered_cell == next {
            return;
        }
        if let Some(previous) = self.hovered_cell.take() {
            self.grid.restyle(previous, HexStyle::default());
        }
        if let Some(key) = next {
            let highlight = HexStyle {
                fill: HOVER_FILL_COLOR,
                ..HexStyle::default()
            };
            if self.grid.restyle(key, highlight) {
                self.hovered_cell = Some(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_session() -> Session {
        Session::from_board(
            &BoardConfig::default(),
            Viewport {
                width: 1280,
                height: 720,
            },
        )
        .expect("default board")
    }

    fn center_of(session: &Session, q: i32, r: i32) -> Vec2 {
        session.layout().hex_to_pixel(&Hex::axial(q, r))
    }

    #[test]
    fn session_starts_centered_and_idle() {
        let session = board_session();
        assert_eq!(session.layout().origin(), Vec2::new(640.0, 360.0));
        assert!(session.actor().is_at(&Hex::axial(-2, 1)));
        assert!(session.actor().is_idle());
        assert!(session.is_player_turn());
        assert!(!session.preview().is_visible());
    }

    #[test]
    fn hover_builds_preview_ending_at_target() {
        let mut session = board_session();
        let target = Hex::axial(2, -1);
        session.show_path_preview(&target).expect("preview");

        let waypoints = session.preview().waypoints();
        assert!(session.preview().is_visible());
        assert_eq!(waypoints.last().copied(), Some(center_of(&session, 2, -1)));
        let start = session.actor().hex();
        assert_eq!(waypoints.len() as u32, start.distance(&target));
    }

    #[test]
    fn hover_on_actor_cell_hides_preview() {
        let mut session = board_session();
        session
            .show_path_preview(&Hex::axial(1, 0))
            .expect("preview");
        session
            .show_path_preview(&Hex::axial(-2, 1))
            .expect("preview");
        assert!(!session.preview().is_visible());
    }

    #[test]
    fn click_commits_route_and_clears_preview() {
        let mut session = board_session();
        let target = Hex::axial(-1, 1);
        session.show_path_preview(&target).expect("preview");
        session.start_player_action(&target).expect("click");

        assert!(!session.actor().is_idle());
        assert_eq!(session.actor().remaining_waypoints(), 1);
        assert!(!session.preview().is_visible());
        assert!(session.preview().waypoints().is_empty());
    }

    #[test]
    fn click_without_fresh_preview_replans() {
        let mut session = board_session();
        session
            .show_path_preview(&Hex::axial(2, 2))
            .expect("preview");
        session
            .start_player_action(&Hex::axial(-2, 2))
            .expect("click");

        let route: Vec<Vec2> = session.actor().route().copied().collect();
        assert_eq!(route, [center_of(&session, -2, 2)]);
    }

    #[test]
    fn pointer_over_button_claims_event_and_clears_highlight() {
        let mut session = board_session();
        let over_cell = center_of(&session, -2, 1);
        assert!(matches!(
            session.pointer_moved(Some(over_cell)),
            Some(GameEvent::HexHovered(_))
        ));
        assert_eq!(session.hovered_cell(), Some(HexKey::new(-2, 1)));

        let event = session.pointer_moved(Some(Vec2::new(150.0, 100.0)));
        assert!(matches!(event, Some(GameEvent::ButtonHovered(_))));
        assert_eq!(session.hovered_cell(), None);
        let restored = session.grid().get(HexKey::new(-2, 1)).expect("cell");
        assert_eq!(restored.style(), HexStyle::default());
    }

    #[test]
    fn hover_highlight_moves_between_cells() {
        let mut session = board_session();
        session.pointer_moved(Some(center_of(&session, 1, 0)));
        session.pointer_moved(Some(center_of(&session, 1, 1)));

        let previous = session.grid().get(HexKey::new(1, 0)).expect("cell");
        let current = session.grid().get(HexKey::new(1, 1)).expect("cell");
        assert_eq!(previous.style().fill, hexwalk_engine::DEFAULT_FILL_COLOR);
        assert_eq!(current.style().fill, HOVER_FILL_COLOR);
    }

    #[test]
    fn pointer_off_grid_hides_preview() {
        let mut session = board_session();
        session
            .show_path_preview(&Hex::axial(3, 0))
            .expect("preview");
        assert!(session.preview().is_visible());

        assert_eq!(session.pointer_moved(Some(center_of(&session, 0, 0))), None);
        assert!(!session.preview().is_visible());

        session
            .show_path_preview(&Hex::axial(3, 0))
            .expect("preview");
        assert_eq!(session.pointer_moved(None), None);
        assert!(!session.preview().is_visible());
    }

    #[test]
    fn clicks_resolve_buttons_before_cells() {
        let session = board_session();
        assert!(matches!(
            session.pointer_clicked(Vec2::new(100.0, 50.0)),
            Some(GameEvent::ButtonClicked(_))
        ));
        assert!(matches!(
            session.pointer_clicked(center_of(&session, 1, 0)),
            Some(GameEvent::HexClicked(hex)) if hex == Hex::axial(1, 0)
        ));
        assert_eq!(session.pointer_clicked(center_of(&session, 4, 0)), None);
    }

    #[test]
    fn button_click_queues_turn_skip_only_while_idle() {
        let mut session = board_session();
        let id = session.ui().hit_test(Vec2::new(150.0, 100.0)).expect("button");

        session.click_button(id);
        assert_eq!(session.take_pending_events(), [GameEvent::TurnSkipped]);
        assert!(session.take_pending_events().is_empty());

        session
            .start_player_action(&Hex::axial(2, 0))
            .expect("click");
        session.click_button(id);
        assert!(session.take_pending_events().is_empty());
    }

    #[test]
    fn off_turn_blocks_preview_and_moves() {
        let mut session = board_session();
        session.toggle_turn();
        assert!(!session.is_player_turn());

        session
            .show_path_preview(&Hex::axial(1, 0))
            .expect("preview");
        session
            .start_player_action(&Hex::axial(1, 0))
            .expect("click");
        assert!(!session.preview().is_visible());
        assert!(session.actor().is_idle());
    }

    #[test]
    fn off_grid_actor_is_reported() {
        let layout = Layout::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0));
        let mut grid = HexGrid::hexagon(2).expect("radius in range");
        grid.remove(HexKey::new(0, 0));
        let mut session = Session::new(layout, grid, Hex::axial(0, 0), 5.0);

        let error = session
            .show_path_preview(&Hex::axial(1, 0))
            .expect_err("should fail");
        assert_eq!(error, GameError::OffGridLookup { q: 0, r: 0 });
    }

    #[test]
    fn resize_recenters_and_rebases_actor() {
        let mut session = board_session();
        session
            .show_path_preview(&Hex::axial(3, 0))
            .expect("preview");
        session
            .start_player_action(&Hex::axial(3, 0))
            .expect("click");
        session.tick();
        let before = session.actor().position();

        session.resize(Viewport {
            width: 800,
            height: 600,
        });

        let after = session.actor().position();
        assert_eq!(session.layout().origin(), Vec2::new(400.0, 300.0));
        assert!((after.x - (before.x - 240.0)).abs() < 0.001);
        assert!((after.y - (before.y - 60.0)).abs() < 0.001);
        let last = session.actor().route().last().copied().expect("route");
        let expected = center_of(&session, 3, 0);
        assert!((last.x - expected.x).abs() < 0.001);
        assert!((last.y - expected.y).abs() < 0.001);
        assert!(!session.preview().is_visible());
    }
}
