//! Collision detection and response
//!
//! Two flavours: axis-aligned boxes with reflection for pong, and integer grid
//! tests (walls, body, free-cell sampling) for snake.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::GameRng;

/// Axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict interval intersection on both axes; touching edges don't count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Bounce off a paddle
///
/// Horizontal velocity flips; vertical velocity is rebuilt from where the ball
/// struck the paddle (`-base_speed` at the top edge, `+base_speed` at the
/// bottom). Both components then grow by `growth`. There is no cap.
pub fn paddle_reflect(
    vel: Vec2,
    ball_y: f32,
    paddle_top: f32,
    paddle_height: f32,
    base_speed: f32,
    growth: f32,
) -> Vec2 {
    let ratio = ((ball_y - paddle_top) / paddle_height).clamp(0.0, 1.0);
    let vx = -vel.x;
    let vy = (ratio - 0.5) * base_speed * 2.0;
    Vec2::new(vx, vy) * growth
}

/// Top/bottom wall bounce. Flips `vy` once the ball leaves
/// `[0, bounds_height - ball_size]` while still heading outward.
pub fn wall_bounce(y: f32, vy: f32, bounds_height: f32, ball_size: f32) -> f32 {
    let floor = bounds_height - ball_size;
    if (y <= 0.0 && vy < 0.0) || (y >= floor && vy > 0.0) {
        -vy
    } else {
        vy
    }
}

/// Integer grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    #[inline]
    pub fn step(self, dx: i32, dy: i32) -> Self {
        Self {
            col: self.col + dx,
            row: self.row + dy,
        }
    }
}

/// Head left the `[0, tile_count)` square
#[inline]
pub fn out_of_bounds(cell: Cell, tile_count: i32) -> bool {
    cell.col < 0 || cell.col >= tile_count || cell.row < 0 || cell.row >= tile_count
}

/// Linear scan against every body segment
#[inline]
pub fn hits_body(cell: Cell, body: &VecDeque<Cell>) -> bool {
    body.iter().any(|segment| *segment == cell)
}

/// Uniform free cell by rejection sampling. `None` once the board is full.
pub fn sample_free_cell(rng: &mut GameRng, tile_count: i32, occupied: &VecDeque<Cell>) -> Option<Cell> {
    let total = (tile_count.max(0) as usize).pow(2);
    if occupied.len() >= total {
        // Only a full board can make rejection sampling spin forever
        let mut free = (0..tile_count)
            .flat_map(|row| (0..tile_count).map(move |col| Cell::new(col, row)))
            .filter(|c| !hits_body(*c, occupied));
        return free.next();
    }

    loop {
        let cell = Cell::new(
            rng.below(tile_count as usize) as i32,
            rng.below(tile_count as usize) as i32,
        );
        if !hits_body(cell, occupied) {
            return Some(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges are not an overlap
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(30.0, 30.0, 5.0, 5.0)));
    }

    #[test]
    fn test_paddle_reflect_center_hit() {
        let v = paddle_reflect(Vec2::new(4.0, 4.0), 100.0, 60.0, 80.0, 4.0, 1.05);
        assert!((v.x - (-4.2)).abs() < 1e-5);
        assert!(v.y.abs() < 1e-5);
    }

    #[test]
    fn test_paddle_reflect_edges() {
        let top = paddle_reflect(Vec2::new(-4.0, 0.0), 60.0, 60.0, 80.0, 4.0, 1.0);
        assert!((top.x - 4.0).abs() < 1e-5);
        assert!((top.y - (-4.0)).abs() < 1e-5);

        // Above the paddle top clamps to the edge ratio
        let above = paddle_reflect(Vec2::new(-4.0, 0.0), 50.0, 60.0, 80.0, 4.0, 1.0);
        assert!((above.y - (-4.0)).abs() < 1e-5);

        let bottom = paddle_reflect(Vec2::new(-4.0, 0.0), 140.0, 60.0, 80.0, 4.0, 1.0);
        assert!((bottom.y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_wall_bounce() {
        assert_eq!(wall_bounce(-1.0, -3.0, 400.0, 8.0), 3.0);
        assert_eq!(wall_bounce(392.0, 3.0, 400.0, 8.0), -3.0);
        // Already heading back in
        assert_eq!(wall_bounce(-1.0, 3.0, 400.0, 8.0), 3.0);
        assert_eq!(wall_bounce(200.0, 3.0, 400.0, 8.0), 3.0);
    }

    #[test]
    fn test_grid_collisions() {
        assert!(out_of_bounds(Cell::new(-1, 5), 20));
        assert!(out_of_bounds(Cell::new(5, 20), 20));
        assert!(!out_of_bounds(Cell::new(19, 0), 20));

        let body: VecDeque<Cell> = [Cell::new(3, 3), Cell::new(3, 4)].into_iter().collect();
        assert!(hits_body(Cell::new(3, 4), &body));
        assert!(!hits_body(Cell::new(4, 4), &body));
    }

    #[test]
    fn test_sample_free_cell_avoids_body() {
        let mut rng = GameRng::new(11);
        let body: VecDeque<Cell> = (0..4)
            .flat_map(|r| (0..4).map(move |c| Cell::new(c, r)))
            .take(15)
            .collect();
        for _ in 0..50 {
            let cell = sample_free_cell(&mut rng, 4, &body).expect("one cell is free");
            assert!(!hits_body(cell, &body));
        }
        assert_eq!(sample_free_cell(&mut rng, 4, &body), Some(Cell::new(3, 3)));
    }

    #[test]
    fn test_sample_free_cell_full_board() {
        let mut rng = GameRng::new(11);
        let body: VecDeque<Cell> = (0..2).flat_map(|r| (0..2).map(move |c| Cell::new(c, r))).collect();
        assert_eq!(sample_free_cell(&mut rng, 2, &body), None);
    }
}
