//! Waypoint paths consumed by the motion engine.

use std::collections::VecDeque;

use glam::Vec2;

use crate::env::to_pixel;
use crate::state::Position;

/// Ordered world-space waypoints plus the distance already covered on the
/// current segment.
///
/// While the path is being followed its first point is the segment start,
/// which is where the character stood when the segment began. Building a new
/// path always starts from a fresh segment, so replacing the path resets the
/// moved distance.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    points: VecDeque<Vec2>,
    moved: f32,
}

impl Path {
    pub fn new(points: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            points: points.into_iter().collect(),
            moved: 0.0,
        }
    }

    /// Path starting at the literal `start` and continuing through the centres
    /// of `tiles`, skipping the first tile (the one `start` lies in).
    pub fn from_tiles(start: Vec2, tiles: &[Position]) -> Self {
        let rest = tiles.iter().skip(1).map(|tile| to_pixel(*tile));
        Self::new(std::iter::once(start).chain(rest))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Vec2> {
        self.points.front().copied()
    }

    /// End point of the current segment.
    pub fn next(&self) -> Option<Vec2> {
        self.points.get(1).copied()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.points.back().copied()
    }

    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }

    pub fn moved_distance(&self) -> f32 {
        self.moved
    }

    pub(crate) fn set_moved_distance(&mut self, moved: f32) {
        self.moved = moved;
    }

    /// Drops the consumed segment start and begins the next segment.
    pub(crate) fn advance_segment(&mut self) {
        self.points.pop_front();
        self.moved = 0.0;
    }

    /// Total length of the remaining polyline.
    pub fn length(&self) -> f32 {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .map(|(a, b)| a.distance(*b))
            .sum()
    }
}
