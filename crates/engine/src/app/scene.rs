use serde::{Deserialize, Serialize};

use super::rendering::DrawList;

/// Pixel-space point. Screen convention: x grows right, y grows down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.width as f32 / 2.0,
            y: self.height as f32 / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
    /// An internal invariant broke; the loop stops and reports the reason.
    Fatal(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    cursor_position_px: Option<Vec2>,
    cursor_moved: bool,
    left_click_pressed: bool,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        cursor_position_px: Option<Vec2>,
        cursor_moved: bool,
        left_click_pressed: bool,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            cursor_position_px,
            cursor_moved,
            left_click_pressed,
            window_width,
            window_height,
        }
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_cursor_moved(mut self, cursor_moved: bool) -> Self {
        self.cursor_moved = cursor_moved;
        self
    }

    pub fn with_left_click_pressed(mut self, left_click_pressed: bool) -> Self {
        self.left_click_pressed = left_click_pressed;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    /// True when the cursor moved (or left the window) since the previous tick.
    pub fn cursor_moved(&self) -> bool {
        self.cursor_moved
    }

    pub fn left_click_pressed(&self) -> bool {
        self.left_click_pressed
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

pub trait Scene {
    fn load(&mut self, viewport: Viewport);
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&self, draw_list: &mut DrawList);
    fn resize(&mut self, viewport: Viewport);
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
    fn debug_lines(&self) -> Vec<String> {
        Vec::new()
    }
}
