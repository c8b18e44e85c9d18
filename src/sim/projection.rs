//! Depth-to-screen projection for the pseudo-3D road
//!
//! Depth is a row index growing toward the viewer: rows at the horizon are
//! far, the bottom row is nearest. Everything here is pure; callers clamp
//! results to the viewport themselves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::lerp;

/// Size of the screen the road is projected onto (in character cells)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 30,
        }
    }
}

impl Viewport {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Nearest visible row
    #[inline]
    pub fn bottom_row(&self) -> i32 {
        i32::from(self.height) - 1
    }

    /// Entities deeper than this are off screen
    #[inline]
    pub fn depth_bound(&self) -> i32 {
        i32::from(self.height)
    }

    /// Row the player stands on (held constant through a jump)
    pub fn player_row(&self) -> i32 {
        (i32::from(self.height) - PLAYER_HEIGHT - 1).max(HORIZON_ROW + 1)
    }

    /// Clamp an entity depth to a drawable row
    pub fn clamp_row(&self, depth: i32) -> i32 {
        depth.clamp(0, (i32::from(self.height) - 2).max(0))
    }

    /// Depth normalized to [0, 1]: 0 at the horizon, 1 at the bottom row
    pub fn normalized_depth(&self, row: i32) -> f32 {
        let span = (self.bottom_row() - HORIZON_ROW).max(1) as f32;
        ((row - HORIZON_ROW) as f32 / span).clamp(0.0, 1.0)
    }

    /// Sprite scale for a row (0.5 at the horizon, 1.0 at the bottom)
    pub fn depth_scale(&self, row: i32) -> f32 {
        0.5 + 0.5 * self.normalized_depth(row)
    }

    /// Road width at a row, interpolated from far to near width
    pub fn road_width(&self, row: i32) -> i32 {
        lerp(ROAD_FAR_WIDTH, ROAD_NEAR_WIDTH, self.normalized_depth(row)).round() as i32
    }

    /// Left edge of a road of the given width, centered on the viewport
    pub fn road_left_edge(&self, road_width: i32) -> i32 {
        (i32::from(self.width) - road_width) / 2
    }

    /// Center column of a lane at a row (without curvature)
    pub fn lane_center_x(&self, lane: u8, row: i32) -> i32 {
        let width = self.road_width(row);
        let slice = width as f32 / f32::from(LANES);
        self.road_left_edge(width) + (slice * (f32::from(lane) + 0.5)).round() as i32
    }

    /// Horizontal shift caused by curvature at a row
    ///
    /// Falls off quadratically toward the viewer, so the far road swings the
    /// most while the rows around the player barely move. Depth 0 is the
    /// horizon here, so the factor is `(1 - normalized_depth)²` rather than
    /// `normalized_depth²`; renderers sharing this formula must use the same
    /// orientation.
    pub fn curvature_offset(&self, row: i32, curvature: f32) -> i32 {
        let far = 1.0 - self.normalized_depth(row);
        (curvature * far * far * CURVE_SCALE).round() as i32
    }

    /// Left edge of the road at a row including curvature
    pub fn bent_left_edge(&self, row: i32, curvature: f32) -> i32 {
        self.road_left_edge(self.road_width(row)) + self.curvature_offset(row, curvature)
    }

    /// Screen position of a lane at a row on a bent road
    pub fn project(&self, lane: u8, row: i32, curvature: f32) -> Vec2 {
        let x = self.lane_center_x(lane, row) + self.curvature_offset(row, curvature);
        Vec2::new(x as f32, row as f32)
    }
}
