//! XP and level arithmetic

/// XP needed to level up at level 1-9
const BASE_LEVEL_UP_XP: u32 = 15;

/// Extra XP needed per ten levels
const XP_PER_BRACKET: u32 = 5;

/// Level-up cost never exceeds this
const MAX_LEVEL_UP_XP: u32 = 75;

/// XP required to go from `level` to `level + 1`
///
/// Starts at 15 and grows by 5 every ten levels, capped at 75.
#[must_use]
pub fn required_xp_for_level_up(level: u32) -> u32 {
    let bracket = level / 10;
    BASE_LEVEL_UP_XP
        .saturating_add(bracket.saturating_mul(XP_PER_BRACKET))
        .min(MAX_LEVEL_UP_XP)
}

/// Fraction of the current level completed, in `0.0..1.0`
#[must_use]
pub fn level_progress(level: u32, xp: u32) -> f64 {
    let needed = required_xp_for_level_up(level);
    (f64::from(xp) / f64::from(needed)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_xp_brackets() {
        assert_eq!(required_xp_for_level_up(1), 15);
        assert_eq!(required_xp_for_level_up(9), 15);
        assert_eq!(required_xp_for_level_up(10), 20);
        assert_eq!(required_xp_for_level_up(25), 25);
        assert_eq!(required_xp_for_level_up(119), 70);
    }

    #[test]
    fn test_required_xp_is_capped() {
        assert_eq!(required_xp_for_level_up(120), 75);
        assert_eq!(required_xp_for_level_up(500), 75);
        assert_eq!(required_xp_for_level_up(u32::MAX), 75);
    }

    #[test]
    fn test_level_progress() {
        assert!((level_progress(1, 0) - 0.0).abs() < f64::EPSILON);
        assert!((level_progress(10, 10) - 0.5).abs() < f64::EPSILON);
        assert!((level_progress(1, 40) - 1.0).abs() < f64::EPSILON);
    }
}
