//! Talking to characters and using objects.
//!
//! The initiator walks to a free tile at the target's interaction distance,
//! faces it and asks the host to run the target's entry point. The target side
//! is [`Character::begin_interaction`].

use super::CommandError;
use super::movement::walkable;
use crate::env::{
    Direction8, HostEvent, InteractTarget, MapOracle, ScriptHandle, SimContext, tile_at_distance,
    tile_vector, to_pixel, view_distance,
};
use crate::state::{
    ActionState, Character, DisabledActions, EntityId, PendingInteraction, Position,
};

impl Character {
    /// Walks (or runs) into interaction range of `target`.
    pub fn interact_with(
        &mut self,
        target: InteractTarget,
        run: bool,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        self.ensure_can_act()?;
        if target == InteractTarget::Character(self.id) {
            return Err(CommandError::TargetGone);
        }
        let (target_tile, reach) = ctx
            .env
            .directory()
            .interact_info(target)
            .ok_or(CommandError::TargetGone)?;

        let in_range = view_distance(self.tile(), target_tile) <= reach.max(1);
        let stand_tile = if in_range {
            None
        } else {
            Some(self.plan_approach(target_tile, reach, run, ctx.env.map())?)
        };

        self.state_initialize(true);
        self.pending_interaction = Some(PendingInteraction { target, run });
        match stand_tile {
            None => {
                self.arrive_interaction(target, target_tile, ctx);
                Ok(())
            }
            Some(tile) => self.head_for(tile, run, ctx),
        }
    }

    fn approach_interaction(
        &mut self,
        target_tile: Position,
        reach: u32,
        run: bool,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        match self.plan_approach(target_tile, reach, run, ctx.env.map()) {
            Ok(tile) => self.head_for(tile, run, ctx),
            Err(error) => {
                self.pending_interaction = None;
                Err(error)
            }
        }
    }

    /// Picks the tile to talk from. Leaves the character untouched, so a
    /// refusal here costs nothing.
    fn plan_approach(
        &self,
        target_tile: Position,
        reach: u32,
        run: bool,
        map: &dyn MapOracle,
    ) -> Result<Position, CommandError> {
        if run && self.disabled.contains(DisabledActions::RUN) {
            return Err(CommandError::Disabled);
        }
        let state = self.combat_variant(if run {
            ActionState::Run
        } else {
            ActionState::Walk
        });
        if !self.resources.contains(state) {
            return Err(CommandError::MissingAnimation);
        }
        self.approach_tile(map, target_tile, reach.max(1))
            .ok_or_else(|| {
                tracing::trace!("{}: no free tile around {}", self.id, target_tile);
                CommandError::NoApproach
            })
    }

    fn head_for(
        &mut self,
        stand_tile: Position,
        run: bool,
        ctx: &mut SimContext<'_>,
    ) -> Result<(), CommandError> {
        let result = self.travel_to(stand_tile, run, ctx);
        if result.is_err() {
            self.pending_interaction = None;
        }
        result
    }

    /// Tile `reach` away from the target on the line toward this character,
    /// or failing that the first free one around the compass.
    fn approach_tile(&self, map: &dyn MapOracle, target: Position, reach: u32) -> Option<Position> {
        let me = self.tile();
        let free = |tile: Position| tile == me || walkable(map, tile);

        let preferred = tile_at_distance(target, tile_vector(target, me), reach);
        if free(preferred) {
            return Some(preferred);
        }
        Direction8::ALL
            .iter()
            .map(|direction| {
                let (dx, dy) = direction.delta();
                target.offset(dx * reach as i32, dy * reach as i32)
            })
            .find(|tile| free(*tile))
    }

    /// Checks the pending interaction: fires it when in range, retries the
    /// approach when standing short of it, drops it when the target is gone.
    ///
    /// Returns whether the interaction fired.
    pub(crate) fn pursue_interaction(&mut self, standing: bool, ctx: &mut SimContext<'_>) -> bool {
        let Some(pending) = self.pending_interaction else {
            return false;
        };
        let Some((target_tile, reach)) = ctx.env.directory().interact_info(pending.target) else {
            tracing::debug!("{}: interaction target vanished", self.id);
            self.pending_interaction = None;
            return false;
        };
        if view_distance(self.tile(), target_tile) <= reach.max(1) {
            self.arrive_interaction(pending.target, target_tile, ctx);
            return true;
        }
        if standing {
            if let Err(error) = self.approach_interaction(target_tile, reach, pending.run, ctx) {
                tracing::warn!("{}: gave up on {:?}: {}", self.id, pending.target, error);
            }
        }
        false
    }

    fn arrive_interaction(
        &mut self,
        target: InteractTarget,
        target_tile: Position,
        ctx: &mut SimContext<'_>,
    ) {
        self.face_point(to_pixel(target_tile));
        self.pending_interaction = None;
        self.interacting_with = Some(target);
        tracing::debug!("{}: interacting with {:?}", self.id, target);
        ctx.host.emit(HostEvent::InteractionRequested {
            initiator: self.id,
            target,
        });
        self.settle(ctx);
    }

    /// Target-side entry point: faces the initiator and starts this
    /// character's script. Goal selection pauses until the script ends.
    pub fn begin_interaction(
        &mut self,
        initiator: EntityId,
        ctx: &mut SimContext<'_>,
    ) -> Option<ScriptHandle> {
        if self.death_invoked {
            return None;
        }
        if let Some(actor) = ctx.env.directory().actor(initiator) {
            let position = actor.position;
            self.face_point(position);
        }
        if self.perform_action_ok() && !self.state.is_standing() && !self.is_sitting() {
            self.standing(ctx);
        }
        let script = self.script.clone()?;
        let handle = ctx.host.run_script(&script, self.id);
        self.running_script = Some(handle);
        Some(handle)
    }

    /// Ends the interaction this character started.
    pub fn end_interaction(&mut self) {
        self.interacting_with = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::env::{
        DirectorySnapshot, FixedRng, GridMap, GridPathFinder, MapDimensions, ObjectSnapshot,
        RecordingHost, SimEnv, TerrainKind,
    };
    use crate::state::{ActionState, CharacterConfig, ObjectId, StateAsset, StateResources};

    fn visitor(tile: Position) -> Character {
        let mut config = CharacterConfig::new("visitor");
        config.tile = tile;
        config.resources = StateResources::new()
            .with(ActionState::Stand, StateAsset::new(4, 0.1))
            .with(ActionState::Walk, StateAsset::new(4, 0.1));
        Character::from_config(EntityId(1), &config)
    }

    fn chest_directory() -> DirectorySnapshot {
        chest_at(Position::new(5, 5))
    }

    fn chest_at(tile: Position) -> DirectorySnapshot {
        let mut directory = DirectorySnapshot::new();
        directory.push_object(ObjectSnapshot {
            id: ObjectId(7),
            tile,
            interact_distance: 1,
        });
        directory
    }

    fn wall_in(map: &mut GridMap, centre: Position) {
        for direction in Direction8::ALL {
            let (dx, dy) = direction.delta();
            map.set_terrain(centre.offset(dx, dy), TerrainKind::Wall);
        }
    }

    #[test]
    fn adjacent_targets_are_used_at_once() {
        let map = GridMap::new(MapDimensions::new(10, 10));
        let directory = chest_directory();
        let config = SimConfig::new();
        let env = SimEnv::new(&map, &GridPathFinder, &directory, &FixedRng(0), &config);
        let mut host = RecordingHost::new();
        let mut me = visitor(Position::new(5, 4));
        {
            let mut ctx = SimContext::new(env, &mut host);
            me.interact_with(InteractTarget::Object(ObjectId(7)), false, &mut ctx)
                .unwrap();
        }
        assert_eq!(me.interacting_with(), Some(InteractTarget::Object(ObjectId(7))));
        assert_eq!(
            host.events,
            vec![HostEvent::InteractionRequested {
                initiator: EntityId(1),
                target: InteractTarget::Object(ObjectId(7)),
            }]
        );
    }

    #[test]
    fn distant_targets_are_approached_from_the_near_side() {
        let map = GridMap::new(MapDimensions::new(10, 10));
        let directory = chest_directory();
        let config = SimConfig::new();
        let env = SimEnv::new(&map, &GridPathFinder, &directory, &FixedRng(0), &config);
        let mut host = RecordingHost::new();
        let mut me = visitor(Position::new(5, 1));
        {
            let mut ctx = SimContext::new(env, &mut host);
            me.interact_with(InteractTarget::Object(ObjectId(7)), false, &mut ctx)
                .unwrap();
        }
        assert_eq!(me.state(), ActionState::Walk);
        assert_eq!(
            me.destination().map(|target| target.tile()),
            Some(Position::new(5, 4))
        );
        assert!(me.pending_interaction().is_some());
        assert!(host.events.is_empty());
    }

    #[test]
    fn missing_targets_are_rejected() {
        let map = GridMap::new(MapDimensions::new(10, 10));
        let directory = DirectorySnapshot::new();
        let config = SimConfig::new();
        let env = SimEnv::new(&map, &GridPathFinder, &directory, &FixedRng(0), &config);
        let mut host = RecordingHost::new();
        let mut me = visitor(Position::new(5, 1));
        let mut ctx = SimContext::new(env, &mut host);
        assert_eq!(
            me.interact_with(InteractTarget::Object(ObjectId(7)), false, &mut ctx),
            Err(CommandError::TargetGone)
        );
    }

    #[test]
    fn blocked_near_side_falls_back_around_the_compass() {
        let mut map = GridMap::new(MapDimensions::new(10, 10));
        map.set_terrain(Position::new(5, 4), TerrainKind::Wall);
        let directory = chest_directory();
        let config = SimConfig::new();
        let env = SimEnv::new(&map, &GridPathFinder, &directory, &FixedRng(0), &config);
        let mut host = RecordingHost::new();
        let mut me = visitor(Position::new(5, 1));
        {
            let mut ctx = SimContext::new(env, &mut host);
            me.interact_with(InteractTarget::Object(ObjectId(7)), false, &mut ctx)
                .unwrap();
        }
        // South is the first direction tried.
        assert_eq!(
            me.destination().map(|target| target.tile()),
            Some(Position::new(5, 6))
        );
        assert!(me.pending_interaction().is_some());
    }

    #[test]
    fn walled_in_targets_leave_the_current_walk_alone() {
        let mut map = GridMap::new(MapDimensions::new(10, 10));
        wall_in(&mut map, Position::new(8, 8));
        let directory = chest_at(Position::new(8, 8));
        let config = SimConfig::new();
        let env = SimEnv::new(&map, &GridPathFinder, &directory, &FixedRng(0), &config);
        let mut host = RecordingHost::new();
        let mut me = visitor(Position::new(1, 1));
        let mut ctx = SimContext::new(env, &mut host);
        me.walk_to(Position::new(1, 6), &mut ctx).unwrap();
        let before = (me.state(), me.path().map(|path| path.len()), me.destination());

        assert_eq!(
            me.interact_with(InteractTarget::Object(ObjectId(7)), false, &mut ctx),
            Err(CommandError::NoApproach)
        );
        assert_eq!(
            (me.state(), me.path().map(|path| path.len()), me.destination()),
            before
        );
        assert_eq!(before.0, ActionState::Walk);
        assert!(me.pending_interaction().is_none());
    }
}
