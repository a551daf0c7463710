//! Movement commands: walk, run, jump, step-moves and sitting.

use glam::Vec2;

use super::CommandError;
use crate::env::{Direction8, MapOracle, SimContext, neighbor_in_direction, to_pixel};
use crate::state::{
    ActionState, Character, DisabledActions, FixedLine, Path, Position, StepMove, TileTarget,
};

impl Character {
    /// Walks to `tile`. Steers instead when already walking.
    pub fn walk_to(&mut self, tile: Position, ctx: &mut SimContext<'_>) -> Result<(), CommandError> {
        self.ensure_can_act()?;
        let result = self.travel_to(tile, false, ctx);
        self.drop_pursuits_after(&result);
        result
    }

    /// Runs to `tile`. Steers instead when already running.
    pub fn run_to(&mut self, tile: Position, ctx: &mut SimContext<'_>) -> Result<(), CommandError> {
        self.ensure_can_act()?;
        if self.disabled.contains(DisabledActions::RUN) {
            return Err(CommandError::Disabled);
        }
        let result = self.travel_to(tile, true, ctx);
        self.drop_pursuits_after(&result);
        result
    }

    /// A walk or run that moved the character, or stood it up for lack of a
    /// path, replaces any pursuit. A refused one keeps it.
    fn drop_pursuits_after(&mut self, result: &Result<(), CommandError>) {
        if matches!(result, Ok(()) | Err(CommandError::NoPath)) {
            self.pending_attack = None;
            self.pending_interaction = None;
        }
    }

    /// Shared by commands and pursuits. Keeps pending attack and interaction.
    pub(crate) fn travel_to(
        &mut self,
        tile: Position,
        run: bool,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        if run && self.disabled.contains(DisabledActions::RUN) {
            return Err(CommandError::Disabled);
        }

        let moving = self.path.is_some() || self.fixed_line.is_some();
        let same_mode = if run {
            self.state.is_running()
        } else {
            self.state.is_walking()
        };
        if moving && same_mode {
            self.steer(tile);
            return Ok(());
        }
        if !moving && tile == self.tile() {
            return Err(CommandError::SameTile);
        }

        let state = self.combat_variant(if run {
            ActionState::Run
        } else {
            ActionState::Walk
        });
        if !self.resources.contains(state) {
            return Err(CommandError::MissingAnimation);
        }

        if self.kind.uses_fixed_line() {
            self.clock.stop();
            self.clear_motion();
            self.fixed_line = Some(FixedLine::new(self.position, to_pixel(tile)));
            self.destination = Some(TileTarget::from_tile(tile));
            self.face(to_pixel(tile) - self.position);
            self.set_state(state, ctx.host);
            return Ok(());
        }

        match self.plan_path(tile, ctx) {
            Some(path) => {
                self.clock.stop();
                self.clear_motion();
                self.begin_path(path, tile);
                self.set_state(state, ctx.host);
                Ok(())
            }
            None => {
                tracing::trace!("{}: no path {} -> {}", self.id, self.tile(), tile);
                self.settle(ctx);
                Err(CommandError::NoPath)
            }
        }
    }

    /// Asks the pathfinder for a route from the current tile.
    pub(crate) fn plan_path(&self, tile: Position, ctx: &SimContext<'_>) -> Option<Path> {
        let tiles = ctx.env.pathfinder().find_path(
            ctx.env.map(),
            self.id,
            self.tile(),
            tile,
            self.path_style,
        )?;
        (tiles.len() >= 2).then(|| Path::from_tiles(self.position, &tiles))
    }

    pub(crate) fn begin_path(&mut self, path: Path, tile: Position) {
        if let Some(next) = path.next() {
            self.face(next - self.position);
        }
        self.path = Some(path);
        self.destination = Some(TileTarget::from_tile(tile));
    }

    /// Redirects a move in progress. The new route is planned at the next
    /// waypoint.
    fn steer(&mut self, tile: Position) {
        self.destination = Some(TileTarget::from_tile(tile));
        if let Some(line) = self.fixed_line {
            self.fixed_line = Some(FixedLine::new(self.position, to_pixel(tile)));
            self.face(to_pixel(tile) - line.start);
        }
    }

    /// Jumps straight to `tile`, ignoring the path graph.
    pub fn jump_to(&mut self, tile: Position, ctx: &mut SimContext<'_>) -> Result<(), CommandError> {
        self.ensure_can_act()?;
        if self.disabled.contains(DisabledActions::JUMP) {
            return Err(CommandError::Disabled);
        }
        let state = self.combat_variant(ActionState::Jump);
        if !self.resources.contains(state) {
            return Err(CommandError::MissingAnimation);
        }
        if tile == self.tile() {
            return Err(CommandError::SameTile);
        }
        let map = ctx.env.map();
        if !map.contains(tile) || map.has_obstacle(tile) {
            return Err(CommandError::Blocked);
        }

        self.state_initialize(true);
        let landing = to_pixel(tile);
        self.face(landing - self.position);
        self.path = Some(Path::new([self.position, landing]));
        self.destination = Some(TileTarget::from_tile(tile));
        self.set_state(state, ctx.host);
        self.play_once();
        Ok(())
    }

    /// Walks `steps` tiles in `direction`, one tile at a time.
    pub fn walk_in_direction(
        &mut self,
        direction: Direction8,
        steps: u32,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        self.ensure_can_act()?;
        if steps == 0 {
            return Err(CommandError::SameTile);
        }
        self.state_initialize(true);
        self.step_in_direction(direction, steps - 1, ctx)
    }

    /// Starts the next tile of a step-move.
    pub(crate) fn step_in_direction(
        &mut self,
        direction: Direction8,
        remaining: u32,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        let next = neighbor_in_direction(self.tile(), direction);
        if !walkable(ctx.env.map(), next) {
            self.settle(ctx);
            return Err(CommandError::Blocked);
        }
        let state = self.combat_variant(ActionState::Walk);
        if !self.resources.contains(state) {
            return Err(CommandError::MissingAnimation);
        }
        self.clear_motion();
        self.begin_path(Path::from_tiles(self.position, &[self.tile(), next]), next);
        self.step_move = Some(StepMove {
            direction,
            remaining,
        });
        self.direction = direction;
        self.set_state(state, ctx.host);
        Ok(())
    }

    /// Stops at the next waypoint instead of the destination.
    pub fn stop_at_next_step(&mut self) {
        if self.path.is_some() {
            self.stand_at_next_step = true;
        }
    }

    pub fn sit_down(&mut self, ctx: &mut SimContext<'_>) -> Result<(), CommandError> {
        self.ensure_can_act()?;
        if !self.resources.contains(ActionState::Sit) {
            return Err(CommandError::MissingAnimation);
        }
        self.state_initialize(true);
        self.set_state(ActionState::Sit, ctx.host);
        self.play_once();
        Ok(())
    }

    /// Faces the world point `target`.
    pub(crate) fn face_point(&mut self, target: Vec2) {
        self.face(target - self.position);
    }
}

pub(crate) fn walkable(map: &dyn MapOracle, tile: Position) -> bool {
    map.contains(tile) && !map.has_obstacle(tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::env::{
        DirectorySnapshot, FixedRng, GridMap, GridPathFinder, MapDimensions, RecordingHost,
        SimEnv, TerrainKind,
    };
    use crate::state::{
        AttackTarget, CharacterConfig, EntityId, PendingAttack, StateAsset, StateResources,
    };

    fn walker() -> Character {
        let mut config = CharacterConfig::new("walker");
        config.tile = Position::new(2, 2);
        config.resources = StateResources::new()
            .with(ActionState::Stand, StateAsset::new(4, 0.1))
            .with(ActionState::Walk, StateAsset::new(4, 0.1).with_sound("step"))
            .with(ActionState::Run, StateAsset::new(4, 0.1))
            .with(ActionState::Jump, StateAsset::new(4, 0.1))
            .with(ActionState::Sit, StateAsset::new(2, 0.1));
        Character::from_config(EntityId(1), &config)
    }

    fn with_ctx<R>(map: &GridMap, host: &mut RecordingHost, f: impl FnOnce(&mut SimContext<'_>) -> R) -> R {
        let directory = DirectorySnapshot::new();
        let config = SimConfig::new();
        let env = SimEnv::new(map, &GridPathFinder, &directory, &FixedRng(0), &config);
        let mut ctx = SimContext::new(env, host);
        f(&mut ctx)
    }

    #[test]
    fn walking_plans_a_path_and_starts_the_loop_sound() {
        let map = GridMap::new(MapDimensions::new(10, 10));
        let mut host = RecordingHost::new();
        let mut character = walker();
        with_ctx(&map, &mut host, |ctx| character.walk_to(Position::new(2, 5), ctx)).unwrap();
        assert_eq!(character.state(), ActionState::Walk);
        assert_eq!(character.path().map(Path::len), Some(4));
        assert_eq!(host.playing_loops().len(), 1);
    }

    #[test]
    fn steering_keeps_the_path_and_moves_the_destination() {
        let map = GridMap::new(MapDimensions::new(10, 10));
        let mut host = RecordingHost::new();
        let mut character = walker();
        with_ctx(&map, &mut host, |ctx| {
            character.walk_to(Position::new(2, 5), ctx).unwrap();
            character.walk_to(Position::new(6, 5), ctx).unwrap();
        });
        assert_eq!(character.path().map(Path::len), Some(4));
        assert_eq!(
            character.destination().map(|target| target.tile()),
            Some(Position::new(6, 5))
        );
    }

    #[test]
    fn unreachable_destinations_fall_back_to_standing() {
        let mut map = GridMap::new(MapDimensions::new(10, 10));
        for (dx, dy) in [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)] {
            map.set_terrain(Position::new(7, 7).offset(dx, dy), TerrainKind::Wall);
        }
        let mut host = RecordingHost::new();
        let mut character = walker();
        let result = with_ctx(&map, &mut host, |ctx| character.walk_to(Position::new(7, 7), ctx));
        assert_eq!(result, Err(CommandError::NoPath));
        assert!(character.state().is_standing());
        assert!(character.path().is_none());
    }

    #[test]
    fn gates_and_missing_animations_reject_commands() {
        let map = GridMap::new(MapDimensions::new(10, 10));
        let mut host = RecordingHost::new();
        let mut character = walker();
        character.set_run_disabled(true);
        character.set_jump_disabled(true);
        with_ctx(&map, &mut host, |ctx| {
            assert_eq!(character.run_to(Position::new(5, 5), ctx), Err(CommandError::Disabled));
            assert_eq!(character.jump_to(Position::new(4, 2), ctx), Err(CommandError::Disabled));
            assert_eq!(character.walk_to(Position::new(2, 2), ctx), Err(CommandError::SameTile));
        });
        assert_eq!(character.state(), ActionState::Stand);
    }

    #[test]
    fn jumping_uses_a_direct_two_point_path() {
        let mut map = GridMap::new(MapDimensions::new(10, 10));
        map.set_terrain(Position::new(3, 2), TerrainKind::Fence);
        let mut host = RecordingHost::new();
        let mut character = walker();
        with_ctx(&map, &mut host, |ctx| character.jump_to(Position::new(4, 2), ctx)).unwrap();
        assert_eq!(character.state(), ActionState::Jump);
        assert_eq!(character.path().map(Path::len), Some(2));
        assert!(!character.perform_action_ok());
    }

    #[test]
    fn sitting_needs_its_animation() {
        let map = GridMap::new(MapDimensions::new(10, 10));
        let mut host = RecordingHost::new();
        let mut character = walker();
        with_ctx(&map, &mut host, |ctx| character.sit_down(ctx)).unwrap();
        assert!(character.is_sitting());
        assert!(character.perform_action_ok());
    }

    #[test]
    fn refused_walks_keep_the_pursuit() {
        let map = GridMap::new(MapDimensions::new(10, 10));
        let mut host = RecordingHost::new();
        let mut character = walker();
        let pursuit = PendingAttack {
            target: AttackTarget::Tile(Position::new(8, 2)),
            run: false,
        };
        character.pending_attack = Some(pursuit);
        character.set_run_disabled(true);
        with_ctx(&map, &mut host, |ctx| {
            assert_eq!(character.walk_to(Position::new(2, 2), ctx), Err(CommandError::SameTile));
            assert_eq!(character.run_to(Position::new(5, 5), ctx), Err(CommandError::Disabled));
        });
        assert_eq!(character.pending_attack(), Some(pursuit));

        with_ctx(&map, &mut host, |ctx| character.walk_to(Position::new(2, 5), ctx)).unwrap();
        assert_eq!(character.pending_attack(), None);
    }
}
