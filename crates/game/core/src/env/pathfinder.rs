//! Pathfinder contract and the reference grid implementation.
//!
//! Paths are tile sequences that start at the requested origin. "No path" is
//! an ordinary outcome, not an error.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use arrayvec::ArrayVec;

use super::grid::{Direction8, line_tiles};
use super::map::MapOracle;
use crate::state::{EntityId, Position};

/// How a character plans its routes.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PathStyle {
    /// Best-first search with a small try budget. Cheap, sometimes gives up.
    #[default]
    Greedy,
    /// A* with a generous try budget.
    Perfect,
    /// A single greedy step; the mover replans at every tile.
    OneStep,
    /// Straight line that ignores obstacles (flyers).
    StraightLine,
}

impl PathStyle {
    /// Decodes the numeric `PathFinder=` value used by character definition files.
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Perfect,
            2 => Self::OneStep,
            3 => Self::StraightLine,
            _ => Self::Greedy,
        }
    }

    /// Whether the mover must replan after every consumed waypoint.
    pub const fn replans_each_step(self) -> bool {
        matches!(self, Self::OneStep)
    }

    /// Node expansions allowed before giving up.
    pub const fn max_try(self) -> usize {
        match self {
            Self::Greedy => 100,
            Self::Perfect => 2_000,
            Self::OneStep | Self::StraightLine => 0,
        }
    }
}

/// Route planner consumed by the motion engine.
///
/// Implementations must be deterministic for identical map state and inputs.
pub trait PathFinder {
    /// Returns the tiles from `from` (inclusive) to `to` (inclusive), or `None`.
    ///
    /// The goal tile is accepted even when it is occupied, so a mover can
    /// approach another character; the motion engine stops in front of it.
    fn find_path(
        &self,
        map: &dyn MapOracle,
        mover: EntityId,
        from: Position,
        to: Position,
        style: PathStyle,
    ) -> Option<Vec<Position>>;
}

/// Eight-way grid pathfinder with octile costs and no corner cutting.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridPathFinder;

const STRAIGHT_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

fn octile(a: Position, b: Position) -> u32 {
    let dx = (a.x - b.x).unsigned_abs();
    let dy = (a.y - b.y).unsigned_abs();
    STRAIGHT_COST * dx.max(dy) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dy)
}

impl GridPathFinder {
    fn walkable(map: &dyn MapOracle, tile: Position, goal: Position) -> bool {
        map.contains(tile) && (tile == goal || !map.has_obstacle(tile))
    }

    /// Neighbours reachable in one step, with their step cost.
    fn neighbors(
        map: &dyn MapOracle,
        tile: Position,
        goal: Position,
    ) -> ArrayVec<(Position, u32), 8> {
        let mut out = ArrayVec::new();
        for direction in Direction8::ALL {
            let (dx, dy) = direction.delta();
            let next = tile.offset(dx, dy);
            if !Self::walkable(map, next, goal) {
                continue;
            }
            let diagonal = dx != 0 && dy != 0;
            if diagonal
                && (!Self::walkable(map, tile.offset(dx, 0), goal)
                    || !Self::walkable(map, tile.offset(0, dy), goal))
            {
                continue;
            }
            let cost = if diagonal { DIAGONAL_COST } else { STRAIGHT_COST };
            out.push((next, cost));
        }
        out
    }

    fn search(
        map: &dyn MapOracle,
        from: Position,
        to: Position,
        max_try: usize,
        greedy: bool,
    ) -> Option<Vec<Position>> {
        let mut open = BinaryHeap::new();
        let mut came_from: BTreeMap<Position, Position> = BTreeMap::new();
        let mut cost_so_far: BTreeMap<Position, u32> = BTreeMap::new();
        let mut order: u32 = 0;

        cost_so_far.insert(from, 0);
        open.push(Reverse((octile(from, to), order, from)));

        let mut tries = 0;
        while let Some(Reverse((_, _, current))) = open.pop() {
            if current == to {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(previous) = came_from.get(&cursor) {
                    path.push(*previous);
                    cursor = *previous;
                }
                path.reverse();
                return Some(path);
            }
            tries += 1;
            if tries > max_try {
                return None;
            }
            let current_cost = cost_so_far.get(&current).copied().unwrap_or(0);
            for (next, step) in Self::neighbors(map, current, to) {
                let new_cost = current_cost + step;
                let better = cost_so_far
                    .get(&next)
                    .is_none_or(|known| new_cost < *known);
                if !better {
                    continue;
                }
                cost_so_far.insert(next, new_cost);
                came_from.insert(next, current);
                order += 1;
                let heuristic = octile(next, to);
                let priority = if greedy {
                    heuristic
                } else {
                    new_cost + heuristic
                };
                open.push(Reverse((priority, order, next)));
            }
        }
        None
    }

    fn one_step(map: &dyn MapOracle, from: Position, to: Position) -> Option<Vec<Position>> {
        let here = octile(from, to);
        Self::neighbors(map, from, to)
            .into_iter()
            .map(|(next, _)| (octile(next, to), next))
            .filter(|(distance, _)| *distance < here)
            .min()
            .map(|(_, next)| vec![from, next])
    }
}

impl PathFinder for GridPathFinder {
    fn find_path(
        &self,
        map: &dyn MapOracle,
        _mover: EntityId,
        from: Position,
        to: Position,
        style: PathStyle,
    ) -> Option<Vec<Position>> {
        if from == to || !map.contains(to) {
            return None;
        }
        match style {
            PathStyle::Greedy => Self::search(map, from, to, style.max_try(), true),
            PathStyle::Perfect => Self::search(map, from, to, style.max_try(), false),
            PathStyle::OneStep => Self::one_step(map, from, to),
            PathStyle::StraightLine => Some(line_tiles(from, to)),
        }
    }
}
