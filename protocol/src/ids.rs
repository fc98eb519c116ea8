//! Shared battle identifiers
//!
//! Small types that appear on both sides of the wire: which player is
//! acting, the battle format, stat names, and the compact condition
//! strings the simulator reports for each Pokemon.

use serde::{Deserialize, Serialize};

/// One side of a two-sided battle ("p1" or "p2")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    /// Parse a side id string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "p1" => Some(Player::P1),
            "p2" => Some(Player::P2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::P1 => "p1",
            Player::P2 => "p2",
        }
    }

    /// The other side of the battle
    pub fn opponent(&self) -> Player {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Battle format: how many active slots each side fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Singles,
    Doubles,
}

impl GameType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "singles" => Some(GameType::Singles),
            "doubles" => Some(GameType::Doubles),
            _ => None,
        }
    }

    /// Number of simultaneously active Pokemon per side
    pub fn active_slots(&self) -> usize {
        match self {
            GameType::Singles => 1,
            GameType::Doubles => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Singles => "singles",
            GameType::Doubles => "doubles",
        }
    }
}

/// Stat abbreviation used in boost messages and stat tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl Stat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "atk" => Some(Stat::Atk),
            "def" => Some(Stat::Def),
            "spa" => Some(Stat::Spa),
            "spd" => Some(Stat::Spd),
            "spe" => Some(Stat::Spe),
            "accuracy" => Some(Stat::Accuracy),
            "evasion" => Some(Stat::Evasion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Atk => "atk",
            Stat::Def => "def",
            Stat::Spa => "spa",
            Stat::Spd => "spd",
            Stat::Spe => "spe",
            Stat::Accuracy => "accuracy",
            Stat::Evasion => "evasion",
        }
    }
}

/// HP and status condition (e.g., "180/180", "94/180 par", "0 fnt")
#[derive(Debug, Clone, PartialEq)]
pub struct HpStatus {
    /// Current HP (raw value or percentage depending on context)
    pub current: u32,
    /// Max HP (if known)
    pub max: Option<u32>,
    /// Status token (slp, par, brn, psn, tox, frz, fnt)
    pub status: Option<String>,
}

impl HpStatus {
    /// Parse a condition string like "180/180", "94/180 par", or "0 fnt"
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split_whitespace();
        let hp_part = parts.next()?;
        let status = parts.next().map(|s| s.to_string());

        if let Some((current, max)) = hp_part.split_once('/') {
            Some(HpStatus {
                current: current.parse().ok()?,
                max: Some(max.parse().ok()?),
                status,
            })
        } else {
            Some(HpStatus {
                current: hp_part.parse().ok()?,
                max: None,
                status,
            })
        }
    }

    /// Whether the condition marks a fainted Pokemon
    pub fn is_fainted(&self) -> bool {
        self.status.as_deref() == Some("fnt")
    }

    /// HP as a percentage (0-100); without a max, current is the percentage
    pub fn percent(&self) -> u32 {
        match self.max {
            Some(0) | None => self.current.min(100),
            Some(max) => self.current * 100 / max,
        }
    }
}

/// Details string (species, level, gender, tera type), e.g. "Garchomp, L50, M"
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PokemonDetails {
    pub species: String,
    pub level: Option<u8>,
    pub gender: Option<char>,
    pub shiny: bool,
    pub tera_type: Option<String>,
}

impl PokemonDetails {
    /// Parse a details string like "Garchomp, L50, M" or "Rotom-Wash"
    pub fn parse(s: &str) -> Self {
        let mut details = PokemonDetails::default();
        let mut parts = s.split(", ");

        if let Some(species) = parts.next() {
            details.species = species.to_string();
        }

        for part in parts {
            if let Some(level) = part.strip_prefix('L') {
                details.level = level.parse().ok();
            } else if part == "M" {
                details.gender = Some('M');
            } else if part == "F" {
                details.gender = Some('F');
            } else if part == "shiny" {
                details.shiny = true;
            } else if let Some(tera) = part.strip_prefix("tera:") {
                details.tera_type = Some(tera.to_string());
            }
        }

        details
    }

    /// Level with the standard fallback of 100 when unspecified
    pub fn level_or_default(&self) -> u8 {
        self.level.unwrap_or(100)
    }
}

/// Normalize a display name to its wire ID: lowercase, alphanumerics only
///
/// "Dragon Claw" becomes "dragonclaw", "Rotom-Wash" becomes "rotomwash".
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_parse_roundtrip() {
        assert_eq!(Player::parse("p1"), Some(Player::P1));
        assert_eq!(Player::parse("p2"), Some(Player::P2));
        assert_eq!(Player::parse("p3"), None);
        assert_eq!(Player::P1.as_str(), "p1");
        assert_eq!(Player::P2.as_str(), "p2");
    }

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::P1.opponent(), Player::P2);
        assert_eq!(Player::P2.opponent(), Player::P1);
    }

    #[test]
    fn test_game_type() {
        assert_eq!(GameType::parse("singles"), Some(GameType::Singles));
        assert_eq!(GameType::parse("doubles"), Some(GameType::Doubles));
        assert_eq!(GameType::parse("triples"), None);
        assert_eq!(GameType::Singles.active_slots(), 1);
        assert_eq!(GameType::Doubles.active_slots(), 2);
    }

    #[test]
    fn test_stat_parse() {
        assert_eq!(Stat::parse("atk"), Some(Stat::Atk));
        assert_eq!(Stat::parse("spe"), Some(Stat::Spe));
        assert_eq!(Stat::parse("evasion"), Some(Stat::Evasion));
        assert_eq!(Stat::parse("hp"), None);
    }

    #[test]
    fn test_hp_status_full() {
        let hp = HpStatus::parse("180/180").unwrap();
        assert_eq!(hp.current, 180);
        assert_eq!(hp.max, Some(180));
        assert!(hp.status.is_none());
        assert!(!hp.is_fainted());
        assert_eq!(hp.percent(), 100);
    }

    #[test]
    fn test_hp_status_with_condition() {
        let hp = HpStatus::parse("94/180 par").unwrap();
        assert_eq!(hp.current, 94);
        assert_eq!(hp.status.as_deref(), Some("par"));
        assert_eq!(hp.percent(), 52);
    }

    #[test]
    fn test_hp_status_fainted() {
        let hp = HpStatus::parse("0 fnt").unwrap();
        assert_eq!(hp.current, 0);
        assert_eq!(hp.max, None);
        assert!(hp.is_fainted());
        assert_eq!(hp.percent(), 0);
    }

    #[test]
    fn test_hp_status_percentage_form() {
        // Opponent HP arrives as a bare percentage
        let hp = HpStatus::parse("73").unwrap();
        assert_eq!(hp.max, None);
        assert_eq!(hp.percent(), 73);
    }

    #[test]
    fn test_hp_status_garbage() {
        assert!(HpStatus::parse("").is_none());
        assert!(HpStatus::parse("abc/def").is_none());
    }

    #[test]
    fn test_details_parse() {
        let details = PokemonDetails::parse("Garchomp, L50, M");
        assert_eq!(details.species, "Garchomp");
        assert_eq!(details.level, Some(50));
        assert_eq!(details.gender, Some('M'));
        assert!(!details.shiny);
    }

    #[test]
    fn test_details_species_only() {
        let details = PokemonDetails::parse("Rotom-Wash");
        assert_eq!(details.species, "Rotom-Wash");
        assert_eq!(details.level, None);
        assert_eq!(details.level_or_default(), 100);
    }

    #[test]
    fn test_details_tera() {
        let details = PokemonDetails::parse("Dragonite, L75, F, tera:Normal");
        assert_eq!(details.tera_type.as_deref(), Some("Normal"));
        assert_eq!(details.level, Some(75));
    }

    #[test]
    fn test_to_id() {
        assert_eq!(to_id("Dragon Claw"), "dragonclaw");
        assert_eq!(to_id("Rotom-Wash"), "rotomwash");
        assert_eq!(to_id("Farfetch'd"), "farfetchd");
        assert_eq!(to_id("earthquake"), "earthquake");
    }
}
