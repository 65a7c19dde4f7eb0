//! Crop rectangle geometry in displayed coordinates.

/// Selection rectangle in displayed (possibly scaled) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Region of the source image in native pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Width and height of the area the selection lives in.
pub(crate) type Bounds = (f64, f64);

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Centered rectangle covering 80% of the limiting dimension.
pub(crate) fn initial_selection(bounds: Bounds, aspect: f64, min_size: f64) -> Rect {
    let (bw, bh) = bounds;
    let mut width = bw * 0.8;
    let mut height = width / aspect;
    if height > bh * 0.8 {
        height = bh * 0.8;
        width = height * aspect;
    }
    let centered = Rect::new((bw - width) / 2.0, (bh - height) / 2.0, width, height);
    fit(centered, bounds, aspect, min_size)
}

/// Re-normalize `rect` so it keeps `aspect` and lies within `bounds`.
///
/// The height is always derived from the width. The width is shrunk until
/// the rectangle fits, then the origin is clamped; nothing is rejected.
pub(crate) fn fit(rect: Rect, bounds: Bounds, aspect: f64, min_size: f64) -> Rect {
    let (bw, bh) = bounds;
    let max_width = bw.min(bh * aspect);
    // min_size applies to the shorter edge
    let min_width = (min_size * aspect.max(1.0)).min(max_width);

    let mut width = finite_or(rect.width, max_width).clamp(min_width, max_width);
    let mut height = width / aspect;
    if height > bh {
        height = bh;
        width = height * aspect;
    }

    let x = finite_or(rect.x, 0.0).clamp(0.0, (bw - width).max(0.0));
    let y = finite_or(rect.y, 0.0).clamp(0.0, (bh - height).max(0.0));
    Rect::new(x, y, width, height)
}

pub(crate) fn translate(
    rect: Rect,
    dx: f64,
    dy: f64,
    bounds: Bounds,
    aspect: f64,
    min_size: f64,
) -> Rect {
    let moved = Rect::new(
        rect.x + finite_or(dx, 0.0),
        rect.y + finite_or(dy, 0.0),
        rect.width,
        rect.height,
    );
    fit(moved, bounds, aspect, min_size)
}

/// Resize around the current center.
pub(crate) fn resize(rect: Rect, width: f64, bounds: Bounds, aspect: f64, min_size: f64) -> Rect {
    let width = finite_or(width, rect.width);
    let height = width / aspect;
    let cx = rect.x + rect.width / 2.0;
    let cy = rect.y + rect.height / 2.0;
    let resized = Rect::new(cx - width / 2.0, cy - height / 2.0, width, height);
    fit(resized, bounds, aspect, min_size)
}

/// Map a displayed rectangle onto native pixels.
pub(crate) fn to_native(rect: Rect, displayed: Bounds, native: (u32, u32)) -> PixelRegion {
    let (nw, nh) = native;
    let scale_x = nw as f64 / displayed.0;
    let scale_y = nh as f64 / displayed.1;

    let x = ((rect.x * scale_x).round().max(0.0) as u32).min(nw.saturating_sub(1));
    let y = ((rect.y * scale_y).round().max(0.0) as u32).min(nh.saturating_sub(1));
    let width = ((rect.width * scale_x).round() as u32).clamp(1, (nw - x).max(1));
    let height = ((rect.height * scale_y).round() as u32).clamp(1, (nh - y).max(1));
    PixelRegion {
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPECT: f64 = 450.0 / 350.0;

    #[test]
    fn initial_selection_on_landscape_is_height_bound() {
        let rect = initial_selection((1600.0, 900.0), ASPECT, 100.0);
        assert!((rect.height - 720.0).abs() < 1e-9);
        assert!((rect.width - 720.0 * ASPECT).abs() < 1e-9);
        assert!((rect.x - (1600.0 - rect.width) / 2.0).abs() < 1e-9);
        assert!((rect.y - 90.0).abs() < 1e-9);
    }

    #[test]
    fn initial_selection_on_portrait_is_width_bound() {
        let rect = initial_selection((600.0, 1200.0), ASPECT, 100.0);
        assert!((rect.width - 480.0).abs() < 1e-9);
        assert!((rect.height - 480.0 / ASPECT).abs() < 1e-9);
        assert!((rect.x - 60.0).abs() < 1e-9);
    }

    #[test]
    fn drag_past_the_edge_is_clipped() {
        let bounds = (800.0, 600.0);
        let start = initial_selection(bounds, ASPECT, 100.0);
        let moved = translate(start, 10_000.0, -10_000.0, bounds, ASPECT, 100.0);
        assert!((moved.right() - 800.0).abs() < 1e-9);
        assert_eq!(moved.y, 0.0);
        assert_eq!(moved.width, start.width);
    }

    #[test]
    fn oversized_and_tiny_resizes_are_clamped() {
        let bounds = (800.0, 600.0);
        let start = initial_selection(bounds, ASPECT, 100.0);

        let huge = resize(start, 5_000.0, bounds, ASPECT, 100.0);
        assert!((huge.width - (600.0 * ASPECT).min(800.0)).abs() < 1e-9);
        assert!(huge.bottom() <= 600.0 + 1e-9);

        let tiny = resize(start, 3.0, bounds, ASPECT, 100.0);
        assert!(tiny.height >= 100.0 - 1e-9);
    }

    #[test]
    fn minimum_gives_way_on_small_images() {
        let rect = fit(Rect::new(0.0, 0.0, 10.0, 10.0), (60.0, 40.0), ASPECT, 100.0);
        assert!(rect.right() <= 60.0 + 1e-9);
        assert!(rect.bottom() <= 40.0 + 1e-9);
    }

    #[test]
    fn non_finite_input_is_sanitized() {
        let rect = fit(
            Rect::new(f64::NAN, f64::INFINITY, f64::NAN, 1.0),
            (400.0, 400.0),
            ASPECT,
            100.0,
        );
        assert!(rect.x.is_finite() && rect.y.is_finite());
        assert!(rect.width > 0.0 && rect.right() <= 400.0 + 1e-9);
    }

    #[test]
    fn native_mapping_scales_and_clamps() {
        let region = to_native(
            Rect::new(50.0, 25.0, 450.0, 350.0),
            (500.0, 400.0),
            (1000, 800),
        );
        assert_eq!(
            region,
            PixelRegion {
                x: 100,
                y: 50,
                width: 900,
                height: 700
            }
        );

        let edge = to_native(Rect::new(499.9, 399.9, 0.01, 0.01), (500.0, 400.0), (1000, 800));
        assert_eq!((edge.x, edge.y), (999, 799));
        assert_eq!((edge.width, edge.height), (1, 1));
    }
}
