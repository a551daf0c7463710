//! Displacement imposed from outside: knockback and magic carry.

use glam::Vec2;

use crate::env::{SimContext, is_linearly_reachable, to_tile};
use crate::state::{CarrierId, Character, ExternalMotion};

impl Character {
    /// Pushes the character along `direction` at `velocity` pixels per
    /// second. Friction slows it down until it stops.
    pub fn knock_back(&mut self, velocity: f32, direction: Vec2) {
        let direction = direction.normalize_or_zero();
        if self.death_invoked || velocity <= 0.0 || direction == Vec2::ZERO {
            return;
        }
        self.clear_motion();
        self.external = Some(ExternalMotion::Knockback {
            velocity,
            direction,
        });
    }

    /// Glues the character to a magic sprite until it is released or the
    /// sprite disappears.
    pub fn carry_with(&mut self, carrier: CarrierId) {
        if self.death_invoked {
            return;
        }
        self.clear_motion();
        self.external = Some(ExternalMotion::Carried(carrier));
    }

    pub fn release_carry(&mut self) {
        if matches!(self.external, Some(ExternalMotion::Carried(_))) {
            self.external = None;
        }
    }

    /// Applies the active external motion in place of path following.
    pub(crate) fn update_external(&mut self, dt: f32, ctx: &mut SimContext<'_>) {
        match self.external {
            Some(ExternalMotion::Knockback {
                velocity,
                direction,
            }) => {
                let target = self.position + direction * velocity * dt;
                let here = self.tile();
                let target_tile = to_tile(target);
                if target_tile != here && !is_linearly_reachable(ctx.env.map(), here, target_tile) {
                    tracing::trace!("{}: knockback stopped at {}", self.id, here);
                    self.external = None;
                } else {
                    self.position = target;
                    let velocity = velocity - ctx.env.config().knockback_friction * dt;
                    self.external = (velocity > 0.0).then_some(ExternalMotion::Knockback {
                        velocity,
                        direction,
                    });
                }
            }
            Some(ExternalMotion::Carried(carrier)) => {
                match ctx.env.directory().carrier_position(carrier) {
                    Some(position) => self.position = position,
                    None => self.external = None,
                }
            }
            None => {}
        }

        if self.external.is_none() && (self.state.is_walking() || self.state.is_running()) {
            self.settle(ctx);
        }
    }
}
