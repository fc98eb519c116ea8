//! Choice actions and the simulator's choice-string grammar
//!
//! A side answers each request with one action per active slot, joined by
//! `", "` in doubles:
//!
//! ```text
//! choice = action (", " action)?
//! action = "default"
//!        | "pass"
//!        | "switch " N
//!        | "move " N (" " signedSlot)? (" terastallize")?
//! ```
//!
//! Move and switch numbers are 1-indexed; a signed target slot is in the
//! acting side's reference frame, negative for opponent slots. Choice
//! strings are only ever produced through [`Action::to_choice_string`] and
//! [`render_choice`] so the grammar lives in exactly one place.

use crate::ParseError;

/// Damage category of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl MoveCategory {
    /// Parse from a wire string (case-insensitive); unknown falls back to Status
    pub fn from_name(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "physical" => MoveCategory::Physical,
            "special" => MoveCategory::Special,
            _ => MoveCategory::Status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveCategory::Physical => "Physical",
            MoveCategory::Special => "Special",
            MoveCategory::Status => "Status",
        }
    }

    /// Whether the move deals direct damage
    pub fn is_damaging(&self) -> bool {
        !matches!(self, MoveCategory::Status)
    }
}

/// Target specification of a move, as reported by the request
///
/// Which slots a move may (or must) be aimed at. Only [`MoveTarget::Any`]
/// requires the chooser to commit to an opposing slot in the choice string;
/// spread targets hit their full pattern with no suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveTarget {
    /// One adjacent slot, ally or foe (the common single-target case)
    Normal,
    /// Any single slot on the field, adjacency ignored
    Any,
    /// One adjacent foe
    AdjacentFoe,
    /// One adjacent ally
    AdjacentAlly,
    /// One adjacent ally or the user
    AdjacentAllyOrSelf,
    /// The user only
    User,
    /// A random adjacent foe (no target choice)
    RandomNormal,
    /// Every adjacent slot, allies included
    AllAdjacent,
    /// Every adjacent foe
    AllAdjacentFoes,
    /// The user's side of the field
    AllySide,
    /// The user's whole team, bench included
    AllyTeam,
    /// The opposing side of the field
    FoeSide,
    /// The entire field
    All,
    /// Target is fixed by the move's own logic (e.g. Counter)
    Scripted,
}

impl MoveTarget {
    /// Parse from a wire string; unknown specs degrade to Normal
    pub fn from_name(s: &str) -> Self {
        match s {
            "normal" => MoveTarget::Normal,
            "any" => MoveTarget::Any,
            "adjacentFoe" => MoveTarget::AdjacentFoe,
            "adjacentAlly" => MoveTarget::AdjacentAlly,
            "adjacentAllyOrSelf" => MoveTarget::AdjacentAllyOrSelf,
            "self" => MoveTarget::User,
            "randomNormal" => MoveTarget::RandomNormal,
            "allAdjacent" => MoveTarget::AllAdjacent,
            "allAdjacentFoes" => MoveTarget::AllAdjacentFoes,
            "allySide" => MoveTarget::AllySide,
            "allyTeam" => MoveTarget::AllyTeam,
            "foeSide" => MoveTarget::FoeSide,
            "all" => MoveTarget::All,
            "scripted" => MoveTarget::Scripted,
            _ => MoveTarget::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveTarget::Normal => "normal",
            MoveTarget::Any => "any",
            MoveTarget::AdjacentFoe => "adjacentFoe",
            MoveTarget::AdjacentAlly => "adjacentAlly",
            MoveTarget::AdjacentAllyOrSelf => "adjacentAllyOrSelf",
            MoveTarget::User => "self",
            MoveTarget::RandomNormal => "randomNormal",
            MoveTarget::AllAdjacent => "allAdjacent",
            MoveTarget::AllAdjacentFoes => "allAdjacentFoes",
            MoveTarget::AllySide => "allySide",
            MoveTarget::AllyTeam => "allyTeam",
            MoveTarget::FoeSide => "foeSide",
            MoveTarget::All => "all",
            MoveTarget::Scripted => "scripted",
        }
    }

    /// Whether the move hits a multi-slot pattern with no per-target choice
    pub fn is_spread(&self) -> bool {
        matches!(
            self,
            MoveTarget::AllAdjacent
                | MoveTarget::AllAdjacentFoes
                | MoveTarget::AllySide
                | MoveTarget::AllyTeam
                | MoveTarget::FoeSide
                | MoveTarget::All
        )
    }

    /// Whether the chooser must pick an opposing slot in the choice string
    pub fn choose_any_foe(&self) -> bool {
        matches!(self, MoveTarget::Any)
    }

    /// Whether at least one opposing Pokemon is hit (for damage scoring)
    pub fn hits_foe(&self) -> bool {
        matches!(
            self,
            MoveTarget::Normal
                | MoveTarget::Any
                | MoveTarget::AdjacentFoe
                | MoveTarget::RandomNormal
                | MoveTarget::AllAdjacent
                | MoveTarget::AllAdjacentFoes
                | MoveTarget::All
                | MoveTarget::Scripted
        )
    }
}

impl Default for MoveTarget {
    fn default() -> Self {
        MoveTarget::Normal
    }
}

/// One slot's chosen action for a turn
///
/// The closed set of things a slot can do. The applicator and every
/// strategy match on this exhaustively; there is no "unknown action".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Use move N (1-indexed), optionally aimed at a slot and/or terastallizing
    Move {
        slot: usize,
        target: Option<i8>,
        tera: bool,
    },
    /// Switch to team member N (1-indexed)
    Switch(usize),
    /// Nothing to do for this slot (doubles slot with no active Pokemon)
    Pass,
    /// No legal option exists; let the simulator pick
    Default,
}

impl Action {
    /// Convenience constructor for an untargeted move
    pub fn plain_move(slot: usize) -> Self {
        Action::Move {
            slot,
            target: None,
            tera: false,
        }
    }

    /// Convenience constructor for a targeted move
    pub fn targeted_move(slot: usize, target: i8) -> Self {
        Action::Move {
            slot,
            target: Some(target),
            tera: false,
        }
    }

    /// Render this action in the choice grammar
    pub fn to_choice_string(&self) -> String {
        match self {
            Action::Move { slot, target, tera } => {
                let mut out = format!("move {}", slot);
                if let Some(target) = target {
                    out.push_str(&format!(" {}", target));
                }
                if *tera {
                    out.push_str(" terastallize");
                }
                out
            }
            Action::Switch(index) => format!("switch {}", index),
            Action::Pass => "pass".to_string(),
            Action::Default => "default".to_string(),
        }
    }

    /// Parse one action from the choice grammar
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let mut parts = s.split_whitespace();

        match parts.next() {
            None => Err(ParseError::EmptyChoice),
            Some("default") => Ok(Action::Default),
            Some("pass") => Ok(Action::Pass),
            Some("switch") => {
                let index = parts
                    .next()
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| ParseError::InvalidChoice(s.to_string()))?;
                Ok(Action::Switch(index))
            }
            Some("move") => {
                let slot = parts
                    .next()
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| ParseError::InvalidChoice(s.to_string()))?;

                let mut target = None;
                let mut tera = false;
                for part in parts {
                    if part == "terastallize" {
                        tera = true;
                    } else if let Ok(t) = part.parse::<i8>() {
                        target = Some(t);
                    } else {
                        return Err(ParseError::InvalidChoice(s.to_string()));
                    }
                }
                Ok(Action::Move { slot, target, tera })
            }
            Some(_) => Err(ParseError::InvalidChoice(s.to_string())),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_choice_string())
    }
}

/// Render one combined choice for a side (one action per active slot)
pub fn render_choice(actions: &[Action]) -> String {
    actions
        .iter()
        .map(Action::to_choice_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a combined choice string back into per-slot actions
pub fn parse_choice(s: &str) -> Result<Vec<Action>, ParseError> {
    if s.trim().is_empty() {
        return Err(ParseError::EmptyChoice);
    }
    s.split(", ").map(Action::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_move() {
        assert_eq!(Action::plain_move(1).to_choice_string(), "move 1");
        assert_eq!(Action::plain_move(4).to_choice_string(), "move 4");
    }

    #[test]
    fn test_render_targeted_move() {
        assert_eq!(Action::targeted_move(1, -1).to_choice_string(), "move 1 -1");
        assert_eq!(Action::targeted_move(2, -2).to_choice_string(), "move 2 -2");
        assert_eq!(Action::targeted_move(3, 1).to_choice_string(), "move 3 1");
    }

    #[test]
    fn test_render_tera_move() {
        let action = Action::Move {
            slot: 2,
            target: None,
            tera: true,
        };
        assert_eq!(action.to_choice_string(), "move 2 terastallize");

        let targeted = Action::Move {
            slot: 1,
            target: Some(-2),
            tera: true,
        };
        assert_eq!(targeted.to_choice_string(), "move 1 -2 terastallize");
    }

    #[test]
    fn test_render_switch_pass_default() {
        assert_eq!(Action::Switch(3).to_choice_string(), "switch 3");
        assert_eq!(Action::Pass.to_choice_string(), "pass");
        assert_eq!(Action::Default.to_choice_string(), "default");
    }

    #[test]
    fn test_render_combined_choice() {
        let combined = render_choice(&[Action::targeted_move(1, -1), Action::Switch(4)]);
        assert_eq!(combined, "move 1 -1, switch 4");

        let passes = render_choice(&[Action::Pass, Action::Pass]);
        assert_eq!(passes, "pass, pass");
    }

    #[test]
    fn test_parse_roundtrip() {
        for raw in [
            "move 1",
            "move 2 -2",
            "move 3 1 terastallize",
            "switch 5",
            "pass",
            "default",
        ] {
            let action = Action::parse(raw).unwrap();
            assert_eq!(action.to_choice_string(), raw);
        }
    }

    #[test]
    fn test_parse_combined() {
        let actions = parse_choice("move 1 -1, pass").unwrap();
        assert_eq!(actions, vec![Action::targeted_move(1, -1), Action::Pass]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Action::parse("attack 1").is_err());
        assert!(Action::parse("move").is_err());
        assert!(Action::parse("switch one").is_err());
        assert!(Action::parse("move 1 sideways").is_err());
        assert!(parse_choice("").is_err());
    }

    #[test]
    fn test_move_target_parse() {
        assert_eq!(MoveTarget::from_name("normal"), MoveTarget::Normal);
        assert_eq!(MoveTarget::from_name("any"), MoveTarget::Any);
        assert_eq!(
            MoveTarget::from_name("allAdjacentFoes"),
            MoveTarget::AllAdjacentFoes
        );
        assert_eq!(MoveTarget::from_name("self"), MoveTarget::User);
        // Unknown specs degrade to the common case
        assert_eq!(MoveTarget::from_name("???"), MoveTarget::Normal);
    }

    #[test]
    fn test_move_target_predicates() {
        assert!(MoveTarget::AllAdjacentFoes.is_spread());
        assert!(MoveTarget::AllAdjacent.is_spread());
        assert!(!MoveTarget::Normal.is_spread());
        assert!(MoveTarget::Any.choose_any_foe());
        assert!(!MoveTarget::Normal.choose_any_foe());
        assert!(MoveTarget::Normal.hits_foe());
        assert!(!MoveTarget::User.hits_foe());
        assert!(!MoveTarget::AllySide.hits_foe());
    }

    #[test]
    fn test_move_category() {
        assert_eq!(MoveCategory::from_name("Physical"), MoveCategory::Physical);
        assert_eq!(MoveCategory::from_name("special"), MoveCategory::Special);
        assert_eq!(MoveCategory::from_name("Status"), MoveCategory::Status);
        assert_eq!(MoveCategory::from_name(""), MoveCategory::Status);
        assert!(MoveCategory::Physical.is_damaging());
        assert!(!MoveCategory::Status.is_damaging());
    }
}
