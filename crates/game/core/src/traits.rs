//! Identity and allegiance of characters.
//!
//! Kind decides which role strategy drives a character and a few physical
//! properties (flyers do not block tiles, event actors block jumps). Relation
//! decides who is hostile to whom.

/// What sort of actor a character is.
///
/// The numeric codes match the `Kind=` field of character definition files.
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
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CharacterKind {
    /// Townsfolk: talks, walks, never fights.
    #[default]
    Normal,
    /// Attacks hostile characters inside its vision radius.
    Fighter,
    /// Driven by player input.
    Player,
    /// Companion that follows the player and joins fights.
    Follower,
    /// Wildlife; flees when badly hurt.
    Animal,
    /// Scripted event actor. Occupies its tile for jump purposes.
    Eventer,
    /// Flies in straight lines and never blocks a tile.
    Flyer,
}

impl CharacterKind {
    /// Decodes the numeric `Kind=` value used by character definition files.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Normal),
            1 => Some(Self::Fighter),
            2 => Some(Self::Player),
            3 => Some(Self::Follower),
            4 => Some(Self::Animal),
            5 => Some(Self::Eventer),
            6 => Some(Self::Flyer),
            _ => None,
        }
    }

    /// Whether other characters treat this one as an obstacle.
    pub const fn is_obstacle(self) -> bool {
        !matches!(self, Self::Flyer)
    }

    /// Whether movement uses fixed straight lines instead of the tile graph.
    pub const fn uses_fixed_line(self) -> bool {
        matches!(self, Self::Flyer)
    }

    /// Whether the AI picks fights on its own.
    pub const fn is_aggressive(self) -> bool {
        matches!(self, Self::Fighter | Self::Flyer | Self::Follower)
    }
}

/// Allegiance of a character relative to the player.
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
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Relation {
    /// On the player's side.
    #[default]
    Friend,
    /// Hostile to the player and friends.
    Enemy,
    /// Fights nobody and is fought by nobody.
    Neutral,
}

impl Relation {
    /// Decodes the numeric `Relation=` value used by character definition files.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Friend),
            1 => Some(Self::Enemy),
            2 => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Friends and enemies are hostile to each other; neutrals to nobody.
    pub const fn is_hostile_to(self, other: Relation) -> bool {
        matches!(
            (self, other),
            (Relation::Friend, Relation::Enemy) | (Relation::Enemy, Relation::Friend)
        )
    }
}
