use crate::app::Vec2;

/// One retained drawing instruction, in window pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: [u8; 4],
    },
    FillPolygon {
        points: Vec<Vec2>,
        color: [u8; 4],
    },
    Polyline {
        points: Vec<Vec2>,
        closed: bool,
        color: [u8; 4],
        thickness: u32,
    },
    FillRect {
        origin: Vec2,
        size: Vec2,
        color: [u8; 4],
    },
    StrokeRect {
        origin: Vec2,
        size: Vec2,
        color: [u8; 4],
    },
    Text {
        position: Vec2,
        text: String,
        color: [u8; 4],
        scale: u32,
    },
}

/// Commands are executed in push order; later commands paint over earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear_screen(&mut self, color: [u8; 4]) {
        self.push(DrawCommand::Clear { color });
    }

    pub fn fill_polygon(&mut self, points: &[Vec2], color: [u8; 4]) {
        if points.len() < 3 {
            return;
        }
        self.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    pub fn polyline(&mut self, points: &[Vec2], closed: bool, color: [u8; 4], thickness: u32) {
        if points.len() < 2 {
            return;
        }
        self.push(DrawCommand::Polyline {
            points: points.to_vec(),
            closed,
            color,
            thickness,
        });
    }

    pub fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: [u8; 4]) {
        self.push(DrawCommand::FillRect {
            origin,
            size,
            color,
        });
    }

    pub fn stroke_rect(&mut self, origin: Vec2, size: Vec2, color: [u8; 4]) {
        self.push(DrawCommand::StrokeRect {
            origin,
            size,
            color,
        });
    }

    pub fn text(&mut self, position: Vec2, text: impl Into<String>, color: [u8; 4], scale: u32) {
        self.push(DrawCommand::Text {
            position,
            text: text.into(),
            color,
            scale,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}
