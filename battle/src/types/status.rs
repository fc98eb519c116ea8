//! Status conditions (non-volatile and volatile)

/// Non-volatile status conditions (persist through switching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Burn,
    Freeze,
    Paralysis,
    Poison,
    BadPoison,
    Sleep,
}

impl Status {
    /// Parse from a wire token ("brn", "frz", "par", "psn", "tox", "slp")
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "brn" => Some(Status::Burn),
            "frz" => Some(Status::Freeze),
            "par" => Some(Status::Paralysis),
            "psn" => Some(Status::Poison),
            "tox" => Some(Status::BadPoison),
            "slp" => Some(Status::Sleep),
            _ => None,
        }
    }

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Burn => "Burn",
            Status::Freeze => "Freeze",
            Status::Paralysis => "Paralysis",
            Status::Poison => "Poison",
            Status::BadPoison => "Toxic",
            Status::Sleep => "Sleep",
        }
    }

    /// Whether the afflicted Pokemon may lose its turn outright
    pub fn blocks_action(&self) -> bool {
        matches!(self, Status::Freeze | Status::Sleep | Status::Paralysis)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Volatile conditions the decision layer cares about (cleared on switch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Volatile {
    Confusion,
    Taunt,
    Encore,
    Disable,
    LeechSeed,
    Curse,
    PerishSong,
    Yawn,
    Substitute,
    Protect,
    Trapped,
    PartialTrap,
    Charging,
    Recharging,
}

impl Volatile {
    /// Whether this condition drains the holder over time
    pub fn is_draining(&self) -> bool {
        matches!(
            self,
            Volatile::LeechSeed | Volatile::Curse | Volatile::PartialTrap
        )
    }

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Volatile::Confusion => "Confusion",
            Volatile::Taunt => "Taunt",
            Volatile::Encore => "Encore",
            Volatile::Disable => "Disable",
            Volatile::LeechSeed => "Leech Seed",
            Volatile::Curse => "Curse",
            Volatile::PerishSong => "Perish Song",
            Volatile::Yawn => "Yawn",
            Volatile::Substitute => "Substitute",
            Volatile::Protect => "Protect",
            Volatile::Trapped => "Trapped",
            Volatile::PartialTrap => "Partial Trap",
            Volatile::Charging => "Charging",
            Volatile::Recharging => "Recharging",
        }
    }
}

impl std::fmt::Display for Volatile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
