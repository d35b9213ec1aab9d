//! Win grid layout
//!
//! Balls sorted by value, ten per row, centered horizontally under the header
//! with room left at the bottom for the win message.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Viewport};
use crate::consts::{GRID_CELL_MIN_RADII, GRID_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    pub cols: usize,
    pub rows: usize,
    pub cell_w: f32,
    pub cell_h: f32,
    pub top: f32,
    pub left: f32,
    /// Bottom edge of the last row; the win message goes below it
    pub bottom: f32,
}

/// Grid metrics plus one `(ball index, target center)` per ball, in value order
#[derive(Debug, Clone)]
pub struct Layout {
    pub grid: GridMetrics,
    pub slots: Vec<(usize, Vec2)>,
}

impl Layout {
    pub fn target_for(&self, index: usize) -> Option<Vec2> {
        self.slots.iter().find(|(i, _)| *i == index).map(|(_, t)| *t)
    }
}

/// Compute the sorted grid for `balls` in `viewport`
pub fn compute_layout(balls: &[Ball], viewport: &Viewport) -> Layout {
    let w = viewport.width;
    let h = viewport.height;
    let cols = GRID_COLUMNS;

    let margin_x = (w * 0.02).max(10.0);
    let margin_top = (viewport.header_h + 12.0).max(10.0);
    let reserved_bottom = (h * 0.12).max(80.0);
    let avail_w = w - margin_x * 2.0;
    let avail_h = h - margin_top - reserved_bottom;

    let r = viewport.win_radius();
    let min_cell = r * GRID_CELL_MIN_RADII;

    let rows = balls.len().div_ceil(cols);
    let cell_w = (avail_w / cols as f32).floor().max(min_cell);
    let cell_h = if rows > 0 {
        (avail_h / rows as f32).floor().max(min_cell)
    } else {
        min_cell
    };

    let left = ((w - cell_w * cols as f32) / 2.0).floor();
    let top = margin_top;
    let grid = GridMetrics {
        cols,
        rows,
        cell_w,
        cell_h,
        top,
        left,
        bottom: top + rows as f32 * cell_h,
    };

    let mut order: Vec<usize> = (0..balls.len()).collect();
    order.sort_by_key(|&i| balls[i].value);

    let slots = order
        .into_iter()
        .enumerate()
        .map(|(rank, index)| {
            let c = rank % cols;
            let row = rank / cols;
            let center = Vec2::new(
                left + c as f32 * cell_w + cell_w / 2.0,
                top + row as f32 * cell_h + cell_h / 2.0,
            );
            (index, center)
        })
        .collect();

    Layout { grid, slots }
}

/// Hand out targets by rank. Locked balls get their cell in this grid too, since
/// the grid they were locked into may have had fewer rows.
pub fn assign_targets(balls: &mut [Ball], layout: &Layout, target_radius: f32) {
    for &(index, center) in &layout.slots {
        let Some(ball) = balls.get_mut(index) else {
            continue;
        };
        ball.target = Some(center);
        ball.target_radius = Some(target_radius);
    }
}

/// Move every ball a fraction `step` of the way toward its target
pub fn converge(balls: &mut [Ball], step: f32) {
    for ball in balls.iter_mut() {
        if let Some(target) = ball.target {
            ball.pos += (target - ball.pos) * step;
        }
        if let Some(target_r) = ball.target_radius {
            ball.radius += (target_r - ball.radius) * step;
        }
    }
}
