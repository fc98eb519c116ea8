//! Type matchup helpers for decision scoring

use crate::types::Type;

/// Check if the defender is weak (>1x) to any of the attacking types
pub fn is_weak_to_any(defender_types: &[Type], attacking_types: &[Type]) -> bool {
    attacking_types
        .iter()
        .any(|t| t.effectiveness_against(defender_types) > 1.0)
}

/// Check if the defender resists (<1x) every attacking type
pub fn resists_all(defender_types: &[Type], attacking_types: &[Type]) -> bool {
    if attacking_types.is_empty() {
        return false;
    }
    attacking_types
        .iter()
        .all(|t| t.effectiveness_against(defender_types) < 1.0)
}

/// Check if the defender is immune (0x) to a type
pub fn is_immune_to(defender_types: &[Type], attacking_type: Type) -> bool {
    attacking_type.effectiveness_against(defender_types) == 0.0
}

/// Best effectiveness the attacker's typing can land on the defender
///
/// Neutral when the attacker's typing is unknown.
pub fn best_effectiveness(attacking_types: &[Type], defender_types: &[Type]) -> f32 {
    attacking_types
        .iter()
        .map(|t| t.effectiveness_against(defender_types))
        .reduce(f32::max)
        .unwrap_or(1.0)
}
