//! Edge-aware popup placement.

use glance_common::{Point, Size};
use glance_config::PopupConfig;

/// Top-left position for a popup of `size` opened at `anchor`.
///
/// The popup goes below-right of the anchor. If it overflows the right
/// edge it flips to the left of the anchor, and if that crosses the left
/// margin it sticks to the right margin instead. The vertical axis works
/// the same way. The result is then clamped into the margins.
pub fn place(anchor: Point, size: Size, viewport: Size, config: &PopupConfig) -> Point {
    let x = place_axis(anchor.x, size.width, viewport.width, config);
    let y = place_axis(anchor.y, size.height, viewport.height, config);
    clamp(Point::new(x, y), size, viewport, config.edge_margin)
}

/// Pull an existing popup back into the viewport after a resize.
///
/// A position that is still fully inside the margins is returned
/// unchanged.
pub fn reclamp(position: Point, size: Size, viewport: Size, config: &PopupConfig) -> Point {
    clamp(position, size, viewport, config.edge_margin)
}

fn place_axis(anchor: f64, extent: f64, viewport: f64, config: &PopupConfig) -> f64 {
    let margin = config.edge_margin;
    let offset = config.anchor_offset;

    let start = anchor + offset;
    if start + extent <= viewport - margin {
        return start;
    }
    let flipped = anchor - extent - offset;
    if flipped < margin {
        viewport - extent - margin
    } else {
        flipped
    }
}

/// Clamp into `[margin, viewport - extent - margin]` per axis. When the
/// viewport is too small for that range the lower bound wins.
fn clamp(position: Point, size: Size, viewport: Size, margin: f64) -> Point {
    let axis = |value: f64, extent: f64, limit: f64| value.min(limit - extent - margin).max(margin);
    Point::new(
        axis(position.x, size.width, viewport.width),
        axis(position.y, size.height, viewport.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PopupConfig {
        PopupConfig::default()
    }

    #[test]
    fn default_is_below_right_of_anchor() {
        let p = place(
            Point::new(100.0, 100.0),
            Size::new(320.0, 200.0),
            Size::new(1280.0, 800.0),
            &config(),
        );
        assert_eq!(p, Point::new(110.0, 110.0));
    }

    #[test]
    fn right_overflow_flips_left_of_anchor() {
        let p = place(
            Point::new(1000.0, 100.0),
            Size::new(320.0, 200.0),
            Size::new(1280.0, 800.0),
            &config(),
        );
        assert_eq!(p.x, 1000.0 - 320.0 - 10.0);
        assert_eq!(p.y, 110.0);
    }

    #[test]
    fn flip_past_left_margin_sticks_to_right_margin() {
        // 300 + 10 + 320 overflows 400 - 20; flipping gives -30 < 20;
        // stick to 400 - 320 - 20 = 60.
        let p = place(
            Point::new(300.0, 50.0),
            Size::new(320.0, 100.0),
            Size::new(400.0, 800.0),
            &config(),
        );
        assert_eq!(p.x, 60.0);
    }

    #[test]
    fn bottom_overflow_flips_above_anchor() {
        let p = place(
            Point::new(100.0, 700.0),
            Size::new(320.0, 400.0),
            Size::new(1280.0, 800.0),
            &config(),
        );
        assert_eq!(p.y, 700.0 - 400.0 - 10.0);
    }

    #[test]
    fn tiny_viewport_lower_bound_wins() {
        let p = place(
            Point::new(10.0, 10.0),
            Size::new(350.0, 400.0),
            Size::new(200.0, 200.0),
            &config(),
        );
        assert_eq!(p, Point::new(20.0, 20.0));
    }

    #[test]
    fn reclamp_keeps_visible_position() {
        let p = Point::new(500.0, 300.0);
        let out = reclamp(p, Size::new(320.0, 200.0), Size::new(1280.0, 800.0), &config());
        assert_eq!(out, p);
    }

    #[test]
    fn reclamp_pulls_back_after_shrink() {
        let out = reclamp(
            Point::new(900.0, 500.0),
            Size::new(320.0, 200.0),
            Size::new(1000.0, 600.0),
            &config(),
        );
        assert_eq!(out, Point::new(1000.0 - 320.0 - 20.0, 600.0 - 200.0 - 20.0));
    }
}
