use crate::app::Vec2;

use super::draw_list::{DrawCommand, DrawList};
use super::font::draw_text_clipped;

/// Executes every command of `list` into an RGBA8 frame of `width * height` pixels.
pub(crate) fn rasterize(frame: &mut [u8], width: u32, height: u32, list: &DrawList) {
    if width == 0 || height == 0 {
        return;
    }

    for command in list.commands() {
        match command {
            DrawCommand::Clear { color } => {
                for chunk in frame.chunks_exact_mut(4) {
                    chunk.copy_from_slice(color);
                }
            }
            DrawCommand::FillPolygon { points, color } => {
                fill_polygon(frame, width, height, points, *color);
            }
            DrawCommand::Polyline {
                points,
                closed,
                color,
                thickness,
            } => {
                for pair in points.windows(2) {
                    draw_line(frame, width, height, pair[0], pair[1], *color, *thickness);
                }
                if *closed && points.len() > 2 {
                    if let (Some(last), Some(first)) = (points.last(), points.first()) {
                        draw_line(frame, width, height, *last, *first, *color, *thickness);
                    }
                }
            }
            DrawCommand::FillRect {
                origin,
                size,
                color,
            } => {
                let (x, y, w, h) = rect_px(*origin, *size);
                fill_rect(frame, width, height, x, y, w, h, *color);
            }
            DrawCommand::StrokeRect {
                origin,
                size,
                color,
            } => {
                let (x, y, w, h) = rect_px(*origin, *size);
                stroke_rect(frame, width, height, x, y, w, h, *color);
            }
            DrawCommand::Text {
                position,
                text,
                color,
                scale,
            } => {
                draw_text_clipped(
                    frame,
                    width,
                    height,
                    position.x.round() as i32,
                    position.y.round() as i32,
                    text,
                    *color,
                    (*scale).max(1) as i32,
                );
            }
        }
    }
}

fn rect_px(origin: Vec2, size: Vec2) -> (i32, i32, i32, i32) {
    (
        origin.x.round() as i32,
        origin.y.round() as i32,
        size.x.round() as i32,
        size.y.round() as i32,
    )
}

/// Writes one pixel, alpha-blending when the source is translucent. Out-of-bounds writes are
/// dropped.
pub(crate) fn write_pixel_rgba_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    color: [u8; 4],
) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    let pixel_offset = y as usize * width as usize + x as usize;
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(dst) = frame.get_mut(byte_offset..byte_offset + 4) else {
        return;
    };

    match color[3] {
        255 => dst.copy_from_slice(&color),
        0 => {}
        alpha => {
            let alpha = alpha as u32;
            for channel in 0..3 {
                let src = color[channel] as u32;
                let old = dst[channel] as u32;
                dst[channel] = ((src * alpha + old * (255 - alpha)) / 255) as u8;
            }
            dst[3] = 255;
        }
    }
}

/// Even-odd scanline fill, sampling pixel centers.
pub(crate) fn fill_polygon(
    frame: &mut [u8],
    width: u32,
    height: u32,
    points: &[Vec2],
    color: [u8; 4],
) {
    if points.len() < 3 {
        return;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    if !min_y.is_finite() || !max_y.is_finite() {
        return;
    }
    let y_start = (min_y.floor() as i32).max(0);
    let y_end = (max_y.ceil() as i32).min(height as i32 - 1);

    let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
    for y in y_start..=y_end {
        let sample_y = y as f32 + 0.5;
        crossings.clear();
        for (index, a) in points.iter().enumerate() {
            let b = points[(index + 1) % points.len()];
            let spans = (a.y <= sample_y && b.y > sample_y) || (b.y <= sample_y && a.y > sample_y);
            if spans {
                let t = (sample_y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let x_start = ((pair[0] - 0.5).ceil() as i32).max(0);
            let x_end = ((pair[1] - 0.5).ceil() as i32 - 1).min(width as i32 - 1);
            for x in x_start..=x_end {
                write_pixel_rgba_clipped(frame, width, height, x, y, color);
            }
        }
    }
}

pub(crate) fn draw_line(
    frame: &mut [u8],
    width: u32,
    height: u32,
    from: Vec2,
    to: Vec2,
    color: [u8; 4],
    thickness: u32,
) {
    let half = (thickness.max(1) as i32 - 1) / 2;
    let reach = half as f32 + 1.0;
    let Some((from, to)) = clip_segment(
        from,
        to,
        Vec2::new(-reach, -reach),
        Vec2::new(width as f32 + reach, height as f32 + reach),
    ) else {
        return;
    };

    let (mut x0, mut y0) = (from.x.round() as i32, from.y.round() as i32);
    let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        for oy in -half..=half {
            for ox in -half..=half {
                write_pixel_rgba_clipped(frame, width, height, x0 + ox, y0 + oy, color);
            }
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x0 += sx;
        }
        if doubled <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Liang-Barsky clip of `from -> to` against the box `min..=max`. `None` when the segment
/// misses the box or any coordinate is not finite.
fn clip_segment(from: Vec2, to: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    if ![from.x, from.y, to.x, to.y].iter().all(|value| value.is_finite()) {
        return None;
    }
    // f64 keeps the entry and exit points accurate for far-away endpoints.
    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let dx = f64::from(to.x) - x0;
    let dy = f64::from(to.y) - y0;
    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;
    let edges = [
        (-dx, x0 - f64::from(min.x)),
        (dx, f64::from(max.x) - x0),
        (-dy, y0 - f64::from(min.y)),
        (dy, f64::from(max.y) - y0),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }
        if t_enter > t_exit {
            return None;
        }
    }

    let point_at = |t: f64| {
        Vec2::new(
            ((x0 + t * dx) as f32).clamp(min.x, max.x),
            ((y0 + t * dy) as f32).clamp(min.y, max.y),
        )
    };
    Some((point_at(t_enter), point_at(t_exit)))
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn fill_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = x.saturating_add(rect_width).min(width as i32);
    let end_y = y.saturating_add(rect_height).min(height as i32);
    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba_clipped(frame, width, height, px, py, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn stroke_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    fill_rect(frame, width, height, x, y, rect_width, 1, color);
    fill_rect(frame, width, height, x, y + rect_height - 1, rect_width, 1, color);
    fill_rect(frame, width, height, x, y, 1, rect_height, color);
    fill_rect(frame, width, height, x + rect_width - 1, y, 1, rect_height, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn blank(width: u32, height: u32) -> Vec<u8> {
        BLACK.repeat((width * height) as usize)
    }

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn polygon_fill_covers_interior_only() {
        let mut frame = blank(10, 10);
        let square = [
            Vec2::new(2.0, 2.0),
            Vec2::new(6.0, 2.0),
            Vec2::new(6.0, 6.0),
            Vec2::new(2.0, 6.0),
        ];
        fill_polygon(&mut frame, 10, 10, &square, RED);

        assert_eq!(pixel(&frame, 10, 2, 2), RED);
        assert_eq!(pixel(&frame, 10, 5, 5), RED);
        assert_eq!(pixel(&frame, 10, 6, 6), BLACK);
        assert_eq!(pixel(&frame, 10, 1, 3), BLACK);
        let filled = frame.chunks_exact(4).filter(|px| *px == RED).count();
        assert_eq!(filled, 16);
    }

    #[test]
    fn offscreen_geometry_never_panics() {
        let mut frame = blank(4, 4);
        let huge = [
            Vec2::new(-100.0, -100.0),
            Vec2::new(100.0, -100.0),
            Vec2::new(0.0, 100.0),
        ];
        fill_polygon(&mut frame, 4, 4, &huge, RED);
        draw_line(
            &mut frame,
            4,
            4,
            Vec2::new(-50.0, 2.0),
            Vec2::new(50.0, 2.0),
            RED,
            3,
        );
        draw_line(
            &mut frame,
            4,
            4,
            Vec2::new(500.0, 500.0),
            Vec2::new(600.0, 600.0),
            RED,
            1,
        );
        fill_rect(&mut frame, 4, 4, -10, -10, 100, 100, RED);
        assert!(frame.chunks_exact(4).all(|px| px == RED));
    }

    #[test]
    fn line_includes_both_endpoints() {
        let mut frame = blank(8, 8);
        draw_line(
            &mut frame,
            8,
            8,
            Vec2::new(1.0, 1.0),
            Vec2::new(6.0, 4.0),
            RED,
            1,
        );
        assert_eq!(pixel(&frame, 8, 1, 1), RED);
        assert_eq!(pixel(&frame, 8, 6, 4), RED);
        assert_eq!(pixel(&frame, 8, 0, 7), BLACK);
    }

    #[test]
    fn huge_lines_are_clipped_to_the_frame() {
        let mut frame = blank(8, 8);
        draw_line(
            &mut frame,
            8,
            8,
            Vec2::new(-1.0e9, 3.0),
            Vec2::new(1.0e9, 3.0),
            RED,
            1,
        );
        for x in 0..8 {
            assert_eq!(pixel(&frame, 8, x, 3), RED);
        }
        assert_eq!(pixel(&frame, 8, 0, 2), BLACK);

        let (from, to) = clip_segment(
            Vec2::new(-1.0e9, 3.0),
            Vec2::new(1.0e9, 3.0),
            Vec2::new(-1.0, -1.0),
            Vec2::new(9.0, 9.0),
        )
        .expect("crosses the frame");
        assert!((from.x + 1.0).abs() < 1.0e-3 && (to.x - 9.0).abs() < 1.0e-3);
    }

    #[test]
    fn non_finite_or_missing_lines_are_skipped() {
        let mut frame = blank(4, 4);
        draw_line(
            &mut frame,
            4,
            4,
            Vec2::new(1.0, f32::NAN),
            Vec2::new(2.0, 2.0),
            RED,
            1,
        );
        draw_line(
            &mut frame,
            4,
            4,
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, f32::INFINITY),
            RED,
            1,
        );
        assert!(frame.chunks_exact(4).all(|px| px == BLACK));

        let min = Vec2::new(0.0, 0.0);
        let max = Vec2::new(4.0, 4.0);
        assert_eq!(
            clip_segment(Vec2::new(-5.0, 10.0), Vec2::new(10.0, 10.0), min, max),
            None
        );
    }

    #[test]
    fn translucent_pixels_blend_over_destination() {
        let mut frame = blank(1, 1);
        write_pixel_rgba_clipped(&mut frame, 1, 1, 0, 0, [255, 255, 255, 51]);
        assert_eq!(pixel(&frame, 1, 0, 0), [51, 51, 51, 255]);
    }

    #[test]
    fn clear_then_rect_follows_command_order() {
        let mut frame = blank(6, 6);
        let mut list = DrawList::new();
        list.clear_screen([9, 9, 9, 255]);
        list.stroke_rect(Vec2::new(1.0, 1.0), Vec2::new(4.0, 4.0), RED);
        rasterize(&mut frame, 6, 6, &list);

        assert_eq!(pixel(&frame, 6, 0, 0), [9, 9, 9, 255]);
        assert_eq!(pixel(&frame, 6, 1, 1), RED);
        assert_eq!(pixel(&frame, 6, 4, 4), RED);
        assert_eq!(pixel(&frame, 6, 2, 2), [9, 9, 9, 255]);
    }
}
