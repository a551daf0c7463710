//! Distance-based ability selection.
//!
//! All functions take slots sorted by ascending use-distance, as kept by
//! [`AbilityTable`](super::AbilityTable).

use super::abilities::AbilitySlot;

/// Use-distance numerically closest to `distance`.
///
/// Scanning ascending with a strict comparison means the lower distance wins a
/// tie, so a target between two abilities gets the shorter-ranged one.
pub fn closest_use_distance(slots: &[AbilitySlot], distance: u32) -> Option<u32> {
    let mut best: Option<(u32, u32)> = None;
    for slot in slots {
        let gap = slot.use_distance.abs_diff(distance);
        if best.is_none_or(|(_, best_gap)| gap < best_gap) {
            best = Some((slot.use_distance, gap));
        }
    }
    best.map(|(use_distance, _)| use_distance)
}

/// Picks among the abilities sharing `use_distance`.
///
/// `choose(n)` must return a value below `n`; it is only consulted when more
/// than one ability matches. Without a match the lowest-distance ability is
/// returned.
pub fn pick_with_use_distance(
    slots: &[AbilitySlot],
    use_distance: u32,
    choose: impl FnOnce(u32) -> u32,
) -> Option<&AbilitySlot> {
    let matching: Vec<&AbilitySlot> = slots
        .iter()
        .filter(|slot| slot.use_distance == use_distance)
        .collect();
    match matching.len() {
        0 => slots.first(),
        1 => matching.first().copied(),
        n => {
            let index = choose(n as u32) as usize % n;
            matching.get(index).copied()
        }
    }
}

/// Best ability to fire from `distance` when the intended one cannot be used:
/// the longest use-distance not exceeding `distance`, else the lowest.
pub fn nearest_viable(slots: &[AbilitySlot], distance: u32) -> Option<&AbilitySlot> {
    slots
        .iter()
        .rev()
        .find(|slot| slot.use_distance <= distance)
        .or_else(|| slots.first())
}

/// What an attacker should do about its target this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackPlan {
    /// At the use-distance with a clear view.
    Fire,
    /// Too far, or blocked from view: move toward the target.
    Approach,
    /// Too close: back off by `shortfall` tiles.
    Retreat { shortfall: u32 },
}

pub fn plan_attack(distance: u32, use_distance: u32, line_of_sight: bool) -> AttackPlan {
    if distance < use_distance {
        AttackPlan::Retreat {
            shortfall: use_distance - distance,
        }
    } else if distance == use_distance && line_of_sight {
        AttackPlan::Fire
    } else {
        AttackPlan::Approach
    }
}
