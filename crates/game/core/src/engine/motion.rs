//! Continuous motion along waypoint paths, fixed lines and jumps.
//!
//! Each tick gets a distance budget of `speed × dt`. The budget is spent
//! segment by segment; reaching a waypoint with budget left carries the
//! remainder into the next segment so tick size never changes the outcome.

use crate::action::AimPoint;
use crate::config::SimConfig;
use crate::env::{
    MapOracle, PathStyle, SimContext, neighbor_toward, to_pixel, to_tile, view_distance,
};
use crate::state::{Character, Path, Position, TileTarget};

/// Waypoints handled in a single tick before the rest waits for the next one.
const MAX_SEGMENTS_PER_TICK: usize = 64;

impl Character {
    /// Pixels per second for the current movement state.
    pub(crate) fn move_speed(&self, config: &SimConfig) -> f32 {
        let boost = self.speed_boost.map_or(1.0, |boost| boost.fold);
        if self.state.is_running() {
            config.base_speed * config.run_speed_fold
        } else {
            self.walk_speed as f32 * config.base_speed * boost
        }
    }

    /// Walk and run states.
    pub(crate) fn update_walking(&mut self, dt: f32, ctx: &mut SimContext<'_>) {
        if self.fixed_line.is_some() {
            self.update_fixed_line(dt, ctx);
            return;
        }
        if self.path.is_none() {
            self.settle(ctx);
            return;
        }

        let mut budget = self.move_speed(ctx.env.config()) * dt;
        for _ in 0..MAX_SEGMENTS_PER_TICK {
            if budget <= 0.0 {
                break;
            }
            let Some(path) = self.path.as_ref() else {
                break;
            };
            let (Some(from), Some(to)) = (path.first(), path.next()) else {
                self.settle(ctx);
                break;
            };
            let moved = path.moved_distance();

            if moved == 0.0 && self.path_style != PathStyle::StraightLine {
                let next_tile = to_tile(to);
                if next_tile != self.tile() && ctx.env.map().has_obstacle(next_tile) {
                    self.handle_blocked(next_tile, ctx);
                    break;
                }
            }

            let segment = from.distance(to);
            let remaining = (segment - moved).max(0.0);
            let direction = (to - from).normalize_or_zero();
            self.face(direction);

            if budget + SimConfig::DISTANCE_EPSILON < remaining {
                let moved = moved + budget;
                self.position = from + direction * moved;
                if let Some(path) = self.path.as_mut() {
                    path.set_moved_distance(moved);
                }
                break;
            }

            budget -= remaining;
            self.position = to;
            if let Some(path) = self.path.as_mut() {
                path.advance_segment();
            }
            if !self.on_waypoint(ctx) {
                break;
            }
        }
    }

    /// The next tile is taken at the start of a segment.
    fn handle_blocked(&mut self, blocked: Position, ctx: &mut SimContext<'_>) {
        let Some(destination) = self.destination else {
            self.settle(ctx);
            return;
        };
        if blocked == destination.tile() {
            tracing::trace!("{}: destination {} is occupied", self.id, blocked);
            self.settle(ctx);
            return;
        }
        let centre = to_pixel(self.tile());
        if self.position.distance(centre) <= SimConfig::DISTANCE_EPSILON {
            tracing::trace!("{}: {} blocked, replanning", self.id, blocked);
            self.replan(destination.tile(), ctx);
        } else {
            tracing::trace!("{}: {} blocked, back to tile centre", self.id, blocked);
            self.path = Some(Path::new([self.position, centre]));
        }
    }

    /// Plans a fresh path from the current tile. Returns whether motion goes on.
    fn replan(&mut self, tile: Position, ctx: &mut SimContext<'_>) -> bool {
        if tile == self.tile() {
            self.settle(ctx);
            return false;
        }
        match self.plan_path(tile, ctx) {
            Some(path) => {
                self.begin_path(path, tile);
                true
            }
            None => {
                tracing::trace!("{}: no path to {} on replan", self.id, tile);
                self.settle(ctx);
                false
            }
        }
    }

    /// Decides what happens after reaching a waypoint. Returns whether the
    /// remaining budget should keep moving the character.
    fn on_waypoint(&mut self, ctx: &mut SimContext<'_>) -> bool {
        if self.stand_at_next_step {
            self.settle(ctx);
            return false;
        }
        if self.check_pursuits(ctx) {
            return false;
        }

        let Some(path) = self.path.as_ref() else {
            return false;
        };
        let remaining_points = path.len();
        let last = path.last();

        if let Some(destination) = self.destination {
            let changed = last != Some(destination.pixel());
            let arrived = remaining_points <= 1 && self.tile() == destination.tile();
            if changed || (self.path_style.replans_each_step() && !arrived) {
                return self.replan(destination.tile(), ctx);
            }
        }

        if remaining_points > 1 {
            return true;
        }

        if let Some(step) = self.step_move {
            if step.remaining > 0 {
                return self
                    .step_in_direction(step.direction, step.remaining - 1, ctx)
                    .is_ok();
            }
        }
        self.settle(ctx);
        false
    }

    /// Stops the move when a pursuit can act from here. Also re-aims an
    /// approach at a character target that moved. Returns whether the move
    /// ended.
    fn check_pursuits(&mut self, ctx: &mut SimContext<'_>) -> bool {
        if self.pending_attack.is_some() {
            let Some(aim) = self.attack_aim(ctx.env.directory()) else {
                self.settle(ctx);
                return true;
            };
            if self.attack_in_position(aim, ctx) {
                self.settle(ctx);
                if let Err(error) = self.pursue_attack(ctx) {
                    tracing::warn!("{}: attack from {} failed: {}", self.id, self.tile(), error);
                }
                return true;
            }
            self.follow_aim(aim);
        }
        self.pending_interaction.is_some() && self.pursue_interaction(false, ctx)
    }

    fn follow_aim(&mut self, aim: AimPoint) {
        if aim.character.is_none() {
            return;
        }
        let distance = view_distance(self.tile(), aim.tile);
        let approaching = distance > self.preferred_use_distance(distance);
        let stale = self.destination.map(|target| target.tile()) != Some(aim.tile);
        if approaching && stale {
            self.destination = Some(TileTarget::from_tile(aim.tile));
        }
    }

    /// Straight flight toward a pixel destination, ignoring the tile graph.
    fn update_fixed_line(&mut self, dt: f32, ctx: &mut SimContext<'_>) {
        let Some(mut line) = self.fixed_line else {
            return;
        };
        let config = ctx.env.config();
        line.moved += self.move_speed(config) * config.fixed_line_speed_fold * dt;
        if line.is_finished() {
            self.position = line.destination;
            self.fixed_line = None;
            self.settle(ctx);
            return;
        }
        self.face(line.direction());
        self.position = line.start + line.direction() * line.moved;
        self.fixed_line = Some(line);

        if self.pending_attack.is_some() || self.pending_interaction.is_some() {
            self.check_pursuits(ctx);
        }
    }

    /// Jump flight. Lands early on an obstruction and rests once the jump
    /// animation has played out.
    pub(crate) fn update_jump(&mut self, dt: f32, ctx: &mut SimContext<'_>) {
        if let Some((from, to, moved)) = self
            .path
            .as_ref()
            .and_then(|path| Some((path.first()?, path.next()?, path.moved_distance())))
        {
            if self.jump_obstructed(to_tile(from), to_tile(to), ctx.env.map(), to - self.position) {
                tracing::trace!("{}: jump obstructed at {}", self.id, self.tile());
                self.position = to_pixel(self.tile());
                self.path = None;
                self.destination = None;
            } else {
                let config = ctx.env.config();
                let moved = moved + config.base_speed * config.jump_speed_fold * dt;
                let segment = from.distance(to);
                if moved >= segment {
                    self.position = to;
                    self.path = None;
                    self.destination = None;
                } else {
                    self.position = from + (to - from).normalize_or_zero() * moved;
                    if let Some(path) = self.path.as_mut() {
                        path.set_moved_distance(moved);
                    }
                }
            }
        }

        if self.path.is_none() && self.clock.is_finished() {
            self.settle(ctx);
        }
    }

    fn jump_obstructed(
        &self,
        start: Position,
        landing: Position,
        map: &dyn MapOracle,
        heading: glam::Vec2,
    ) -> bool {
        let here = self.tile();
        if here == landing {
            return false;
        }
        if map.has_obstacle(landing) || map.has_event_actor(landing) {
            return true;
        }
        if here != start && map.has_trap_script(here) {
            return true;
        }
        let ahead = neighbor_toward(here, heading);
        ahead != here && map.is_obstacle_for_jump(ahead)
    }
}
