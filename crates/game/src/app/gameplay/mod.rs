mod actor;
mod notifier;
mod session;
mod ui;

use std::collections::VecDeque;

use hexwalk_engine::{
    text_size_px, DrawList, InputSnapshot, Scene, SceneCommand, Vec2, Viewport,
};
use tracing::{error, info};

use self::actor::Facing;
use self::notifier::{HandlerId, Notifier};
use self::session::{GameError, GameEvent, GameEventKind, Session};
use crate::app::config::{BoardConfig, BoardConfigError};

const BACKGROUND_COLOR: [u8; 4] = [0x24, 0x22, 0x20, 0xff];
const DEPTH_FILL_COLOR: [u8; 4] = [0x15, 0x14, 0x14, 0xff];
const HEX_LINE_WIDTH: u32 = 3;
const PATH_COLOR: [u8; 4] = [0xe8, 0xd4, 0x8a, 0xff];
const PATH_LINE_WIDTH: u32 = 3;
const PATH_MARKER_HALF_SIZE_PX: f32 = 4.0;
const ACTOR_BODY_COLOR: [u8; 4] = [0xd9, 0x6b, 0x3b, 0xff];
const ACTOR_OUTLINE_COLOR: [u8; 4] = [0x2a, 0x14, 0x0c, 0xff];
const ACTOR_EYE_COLOR: [u8; 4] = [0xf4, 0xf0, 0xe6, 0xff];
const ACTOR_HALF_WIDTH_PX: f32 = 14.0;
const ACTOR_HEIGHT_PX: f32 = 40.0;
const BUTTON_FILL_COLOR: [u8; 4] = [0x3a, 0x36, 0x32, 0xff];
const BUTTON_HOVER_FILL_COLOR: [u8; 4] = [0x55, 0x4f, 0x48, 0xff];
const BUTTON_BORDER_COLOR: [u8; 4] = [0xb8, 0xae, 0xa0, 0xff];
const BUTTON_LABEL_COLOR: [u8; 4] = [0xf4, 0xf0, 0xe6, 0xff];
const BUTTON_LABEL_SCALE: u32 = 2;

type GameNotifier = Notifier<GameEvent, Session, GameError>;

/// The hex board scene: one actor, the skip-turn button and the path preview.
pub(crate) struct HexWalkScene {
    board: BoardConfig,
    session: Session,
    notifier: GameNotifier,
    subscriptions: Vec<(GameEventKind, HandlerId)>,
}

impl HexWalkScene {
    pub(crate) fn new(board: BoardConfig, viewport: Viewport) -> Result<Self, BoardConfigError> {
        let session = Session::from_board(&board, viewport)?;
        let mut notifier = GameNotifier::new();
        let subscriptions = register_handlers(&mut notifier);
        Ok(Self {
            board,
            session,
            notifier,
            subscriptions,
        })
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Emits `events` in order, then anything the handlers queued, until the outbox is empty.
    fn dispatch(&mut self, events: impl IntoIterator<Item = GameEvent>) -> Result<(), GameError> {
        let mut queue: VecDeque<GameEvent> = events.into_iter().collect();
        while let Some(event) = queue.pop_front() {
            self.notifier.emit(&mut self.session, &event)?;
            queue.extend(self.session.take_pending_events());
        }
        Ok(())
    }

    fn collect_pointer_events(&mut self, input: &InputSnapshot) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if input.cursor_moved() {
            events.extend(self.session.pointer_moved(input.cursor_position_px()));
        }
        if input.left_click_pressed() {
            if let Some(point) = input.cursor_position_px() {
                events.extend(self.session.pointer_clicked(point));
            }
        }
        events
    }

    fn draw_board(&self, draw_list: &mut DrawList) {
        let layout = self.session.layout();
        let depth = self.board.hex_depth;
        let cells: Vec<_> = self.session.grid().iter_draw_order().copied().collect();

        for hex in &cells {
            let corners = layout.corners(hex);
            let lowered = |corner: Vec2| Vec2::new(corner.x, corner.y + depth);
            let skirt = [
                corners[1],
                lowered(corners[1]),
                lowered(corners[2]),
                lowered(corners[3]),
                corners[3],
                corners[2],
            ];
            draw_list.fill_polygon(&skirt, DEPTH_FILL_COLOR);
            draw_list.polyline(&skirt[..5], false, DEPTH_FILL_COLOR, HEX_LINE_WIDTH);
        }

        for hex in &cells {
            let corners = layout.corners(hex);
            draw_list.fill_polygon(&corners, hex.style().fill);
        }
        for hex in &cells {
            let corners = layout.corners(hex);
            draw_list.polyline(&corners, true, hex.style().stroke, HEX_LINE_WIDTH);
        }
    }

    fn draw_path(&self, draw_list: &mut DrawList) {
        let preview = self.session.preview();
        if !preview.is_visible() {
            return;
        }
        let mut points = Vec::with_capacity(preview.waypoints().len() + 1);
        points.push(self.session.actor().position());
        points.extend_from_slice(preview.waypoints());
        draw_list.polyline(&points, false, PATH_COLOR, PATH_LINE_WIDTH);

        for waypoint in preview.waypoints() {
            draw_list.fill_rect(
                Vec2::new(
                    waypoint.x - PATH_MARKER_HALF_SIZE_PX,
                    waypoint.y - PATH_MARKER_HALF_SIZE_PX,
                ),
                Vec2::new(PATH_MARKER_HALF_SIZE_PX * 2.0, PATH_MARKER_HALF_SIZE_PX * 2.0),
                PATH_COLOR,
            );
        }
    }

    fn draw_actor(&self, draw_list: &mut DrawList) {
        let actor = self.session.actor();
        let feet = actor.position();
        let bob = actor.gait().bob_offset_px(actor.state());
        let top = feet.y - ACTOR_HEIGHT_PX + bob;
        let body = [
            Vec2::new(feet.x - ACTOR_HALF_WIDTH_PX * 0.6, feet.y),
            Vec2::new(feet.x - ACTOR_HALF_WIDTH_PX, feet.y - ACTOR_HEIGHT_PX * 0.5 + bob),
            Vec2::new(feet.x - ACTOR_HALF_WIDTH_PX * 0.5, top),
            Vec2::new(feet.x + ACTOR_HALF_WIDTH_PX * 0.5, top),
            Vec2::new(feet.x + ACTOR_HALF_WIDTH_PX, feet.y - ACTOR_HEIGHT_PX * 0.5 + bob),
            Vec2::new(feet.x + ACTOR_HALF_WIDTH_PX * 0.6, feet.y),
        ];
        draw_list.fill_polygon(&body, ACTOR_BODY_COLOR);
        draw_list.polyline(&body, true, ACTOR_OUTLINE_COLOR, 2);

        let eye_x = match actor.facing() {
            Facing::Right => feet.x + ACTOR_HALF_WIDTH_PX * 0.2,
            Facing::Left => feet.x - ACTOR_HALF_WIDTH_PX * 0.6,
        };
        draw_list.fill_rect(
            Vec2::new(eye_x, top + 8.0),
            Vec2::new(ACTOR_HALF_WIDTH_PX * 0.4, 4.0),
            ACTOR_EYE_COLOR,
        );
    }

    fn draw_buttons(&self, draw_list: &mut DrawList) {
        for button in self.session.ui().buttons() {
            let fill = if button.is_hovered() {
                BUTTON_HOVER_FILL_COLOR
            } else {
                BUTTON_FILL_COLOR
            };
            draw_list.fill_rect(button.origin(), button.size(), fill);
            draw_list.stroke_rect(button.origin(), button.size(), BUTTON_BORDER_COLOR);

            let label_size = text_size_px(button.label(), BUTTON_LABEL_SCALE);
            let label_origin = Vec2::new(
                button.origin().x + (button.size().x - label_size.x) / 2.0,
                button.origin().y + (button.size().y - label_size.y) / 2.0,
            );
            draw_list.text(
                label_origin,
                button.label(),
                BUTTON_LABEL_COLOR,
                BUTTON_LABEL_SCALE,
            );
        }
    }
}

fn register_handlers(notifier: &mut GameNotifier) -> Vec<(GameEventKind, HandlerId)> {
    let hex_hovered = notifier.on(
        GameEventKind::HexHovered,
        |session: &mut Session, event: &GameEvent| match event {
            GameEvent::HexHovered(hex) => session.show_path_preview(hex),
            _ => Ok(()),
        },
    );
    let hex_clicked = notifier.on(
        GameEventKind::HexClicked,
        |session: &mut Session, event: &GameEvent| match event {
            GameEvent::HexClicked(hex) => session.start_player_action(hex),
            _ => Ok(()),
        },
    );
    let button_hovered = notifier.on(
        GameEventKind::ButtonHovered,
        |session: &mut Session, event: &GameEvent| {
            if let GameEvent::ButtonHovered(id) = event {
                session.hover_button(*id);
            }
            Ok(())
        },
    );
    let button_clicked = notifier.on(
        GameEventKind::ButtonClicked,
        |session: &mut Session, event: &GameEvent| {
            if let GameEvent::ButtonClicked(id) = event {
                session.click_button(*id);
            }
            Ok(())
        },
    );
    let turn_skipped = notifier.on(
        GameEventKind::TurnSkipped,
        |session: &mut Session, _: &GameEvent| {
            session.toggle_turn();
            Ok(())
        },
    );
    vec![
        (GameEventKind::HexHovered, hex_hovered),
        (GameEventKind::HexClicked, hex_clicked),
        (GameEventKind::ButtonHovered, button_hovered),
        (GameEventKind::ButtonClicked, button_clicked),
        (GameEventKind::TurnSkipped, turn_skipped),
    ]
}

impl Scene for HexWalkScene {
    fn load(&mut self, viewport: Viewport) {
        self.session.resize(viewport);
        let start = self.session.actor().hex();
        info!(
            cells = self.session.grid().len(),
            start = %start.key(),
            speed = self.session.actor().speed(),
            "scene_loaded"
        );
    }

    fn update(&mut self, _fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        let events = self.collect_pointer_events(input);
        if let Err(err) = self.dispatch(events) {
            error!(error = %err, "scene_invariant_broken");
            return SceneCommand::Fatal(err.to_string());
        }
        self.session.tick();
        SceneCommand::None
    }

    fn render(&self, draw_list: &mut DrawList) {
        draw_list.clear_screen(BACKGROUND_COLOR);
        self.draw_board(draw_list);
        self.draw_path(draw_list);
        self.draw_actor(draw_list);
        self.draw_buttons(draw_list);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.session.resize(viewport);
    }

    fn unload(&mut self) {
        for (kind, id) in self.subscriptions.drain(..) {
            self.notifier.off(kind, id);
        }
        info!(
            player_turn = self.session.is_player_turn(),
            "scene_unloaded"
        );
    }

    fn debug_title(&self) -> Option<String> {
        let turn = if self.session.is_player_turn() {
            "player turn"
        } else {
            "turn skipped"
        };
        Some(format!("hexwalk | {turn}"))
    }

    fn debug_lines(&self) -> Vec<String> {
        let actor = self.session.actor();
        let hovered = self
            .session
            .hovered_cell()
            .map_or_else(|| "-".to_string(), |key| key.to_string());
        let turn = if self.session.is_player_turn() {
            "PLAYER"
        } else {
            "WAITING"
        };
        vec![
            format!("TURN: {turn}"),
            format!(
                "ACTOR: {} HEX {}",
                actor.state().label(),
                actor.hex().key()
            ),
            format!(
                "ROUTE: {} PREVIEW: {}",
                actor.remaining_waypoints(),
                self.session.preview().waypoints().len()
            ),
            format!("HOVER: {hovered}"),
        ]
    }
}
