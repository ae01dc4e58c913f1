//! Bar chart sizing heuristic

use crate::types::{AxisLayout, ChartLayout, ChartMargin};

/// Viewport width assumed when the caller does not supply one
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 900;

const BASE_WIDTH: u32 = 800;
const MIN_HEIGHT: u32 = 400;
/// Above this many bars the chart switches to its dense presentation
const DENSE_BARS: usize = 30;

/// Layout for `categories` bars in the default viewport
pub fn chart_layout(categories: usize) -> ChartLayout {
    chart_layout_for_viewport(categories, DEFAULT_VIEWPORT_WIDTH)
}

/// Layout for `categories` bars in a viewport `viewport_width` pixels wide
pub fn chart_layout_for_viewport(categories: usize, viewport_width: u32) -> ChartLayout {
    let n = categories as u32;
    let dense = categories > DENSE_BARS;

    ChartLayout {
        width: BASE_WIDTH.min(viewport_width.saturating_sub(100)),
        height: MIN_HEIGHT.max(n.saturating_mul(20)),
        margin: ChartMargin {
            top: 20,
            right: if dense { 10 } else { 30 },
            bottom: 5,
            left: if dense { 50 } else { 20 },
        },
        x_axis: AxisLayout {
            // Any bar at all tilts the labels to the shallow angle
            angle: if categories > 0 { -20 } else { -90 },
            dx: if categories > 15 { -10 } else { 0 },
            dy: if categories > 35 { 15 } else { 0 },
            height: n.saturating_mul(15).saturating_add(40),
            tick_font_size: if dense { 10 } else { 12 },
        },
        legend_padding_top: if dense { 20 } else { 0 },
        bar_size: (40.0 - categories as f64 * 0.5).max(10.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chart() {
        let layout = chart_layout(0);
        assert_eq!(layout.width, 800);
        assert_eq!(layout.height, 400);
        assert_eq!(layout.x_axis.angle, -90);
        assert_eq!(layout.x_axis.height, 40);
        assert_eq!(layout.bar_size, 40.0);
    }

    #[test]
    fn test_sparse_chart() {
        let layout = chart_layout(5);
        assert_eq!(layout.height, 400);
        assert_eq!(layout.x_axis.angle, -20);
        assert_eq!(layout.x_axis.dx, 0);
        assert_eq!(layout.x_axis.tick_font_size, 12);
        assert_eq!(layout.margin.right, 30);
        assert_eq!(layout.margin.left, 20);
        assert_eq!(layout.bar_size, 37.5);
    }

    #[test]
    fn test_dense_chart() {
        let layout = chart_layout(40);
        assert_eq!(layout.height, 800);
        assert_eq!(layout.x_axis.dx, -10);
        assert_eq!(layout.x_axis.dy, 15);
        assert_eq!(layout.x_axis.height, 640);
        assert_eq!(layout.x_axis.tick_font_size, 10);
        assert_eq!(layout.margin.right, 10);
        assert_eq!(layout.margin.left, 50);
        assert_eq!(layout.legend_padding_top, 20);
        assert_eq!(layout.bar_size, 20.0);
    }

    #[test]
    fn test_bar_size_floor() {
        assert_eq!(chart_layout(60).bar_size, 10.0);
        assert_eq!(chart_layout(200).bar_size, 10.0);
    }

    #[test]
    fn test_density_thresholds_are_exclusive() {
        assert_eq!(chart_layout(30).x_axis.tick_font_size, 12);
        assert_eq!(chart_layout(31).x_axis.tick_font_size, 10);
        assert_eq!(chart_layout(15).x_axis.dx, 0);
        assert_eq!(chart_layout(16).x_axis.dx, -10);
        assert_eq!(chart_layout(35).x_axis.dy, 0);
        assert_eq!(chart_layout(36).x_axis.dy, 15);
    }

    #[test]
    fn test_narrow_viewport() {
        assert_eq!(chart_layout_for_viewport(3, 600).width, 500);
        assert_eq!(chart_layout_for_viewport(3, 50).width, 0);
    }

    #[test]
    fn test_height_monotonic() {
        let heights: Vec<u32> = (0..100).map(|n| chart_layout(n).height).collect();
        assert!(heights.windows(2).all(|w| w[0] <= w[1]));
    }
}
