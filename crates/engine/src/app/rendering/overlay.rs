use crate::app::LoopMetricsSnapshot;

use super::font::{draw_text_clipped, glyph_advance, line_advance};
use super::raster::{fill_rect, stroke_rect};

const TEXT_SCALE: i32 = 2;
const OVERLAY_PADDING: i32 = 12;
const OVERLAY_PANEL_INSET: i32 = 8;
const OVERLAY_TEXT_PRIMARY_COLOR: [u8; 4] = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: [u8; 4] = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: [u8; 4] = [10, 12, 16, 210];
const OVERLAY_PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];

#[derive(Debug, Clone, Default)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub scene_lines: Vec<String>,
}

/// Debug panel anchored to the top-right corner, clear of the UI buttons on the left.
pub(crate) fn draw_overlay(frame: &mut [u8], width: u32, height: u32, data: &OverlayData) {
    if width == 0 || height == 0 {
        return;
    }

    let lines = build_overlay_lines(data);
    let longest_line_chars = lines
        .iter()
        .map(|line| line.chars().count() as i32)
        .max()
        .unwrap_or(0);
    let panel_width = longest_line_chars * glyph_advance(TEXT_SCALE) + OVERLAY_PANEL_INSET * 2;
    let panel_height = lines.len() as i32 * line_advance(TEXT_SCALE) + OVERLAY_PANEL_INSET * 2;
    let panel_left = width as i32 - OVERLAY_PADDING - panel_width;
    let panel_top = OVERLAY_PADDING;

    fill_rect(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BG_COLOR,
    );
    stroke_rect(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BORDER_COLOR,
    );

    let mut y = panel_top + OVERLAY_PANEL_INSET;
    for (index, line) in lines.iter().enumerate() {
        let color = if index < 2 {
            OVERLAY_TEXT_DIM_COLOR
        } else {
            OVERLAY_TEXT_PRIMARY_COLOR
        };
        draw_text_clipped(
            frame,
            width,
            height,
            panel_left + OVERLAY_PANEL_INSET,
            y,
            line,
            color,
            TEXT_SCALE,
        );
        y += line_advance(TEXT_SCALE);
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![
        format_fps_line(data.metrics.fps, data.render_fps_cap),
        format!(
            "TPS: {:.1}  {:.2} MS",
            data.metrics.tps, data.metrics.frame_time_ms
        ),
    ];
    lines.extend(data.scene_lines.iter().cloned());
    lines
}

fn format_fps_line(current_fps: f32, cap: Option<u32>) -> String {
    match cap {
        Some(cap) => format!("FPS: {current_fps:.1} (CAP {cap})"),
        None => format!("FPS: {current_fps:.1} (CAP OFF)"),
    }
}
