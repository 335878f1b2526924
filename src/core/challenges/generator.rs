//! Random challenge generation

use crate::core::models::{Challenge, ChallengeCadence, ContributionKind};
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of weekly challenges active at once
pub const WEEKLY_CHALLENGE_COUNT: usize = 3;

/// One in this many challenges accepts any category
const UNTYPED_ODDS: u32 = 5;

/// Weekly challenges only avoid repeating a category when the user
/// selected at least this many
const DISTINCT_WEEKLY_MIN_SELECTED: usize = 3;

/// Create one challenge
///
/// # Arguments
/// * `cadence` - Daily (target 1, 3-6 XP) or weekly (target 2-3, 3 XP per target plus 1-3)
/// * `disallowed` - Categories the challenge must not use
/// * `selected` - Categories the user wants challenges for; empty means all
///
/// Categories are drawn from `selected` minus `Other` minus `disallowed`.
/// When nothing is left, or on a one-in-five roll, the challenge accepts any category.
pub fn create_challenge<R: Rng + ?Sized>(
    rng: &mut R,
    cadence: ChallengeCadence,
    disallowed: &[ContributionKind],
    selected: &[ContributionKind],
) -> Challenge {
    let (target, xp) = match cadence {
        ChallengeCadence::Daily => (1, rng.gen_range(3..=6)),
        ChallengeCadence::Weekly => {
            let target = rng.gen_range(2..=3);
            (target, rng.gen_range(1..=3) + target * 3)
        }
    };

    let untyped = rng.gen_range(1..=UNTYPED_ODDS) == 1;
    let kind = if untyped {
        None
    } else {
        allowed_kinds(disallowed, selected).choose(rng).copied()
    };

    Challenge::new(cadence, kind, target, xp)
}

/// A fresh daily challenge
pub fn daily_challenge<R: Rng + ?Sized>(rng: &mut R, selected: &[ContributionKind]) -> Challenge {
    create_challenge(rng, ChallengeCadence::Daily, &[], selected)
}

/// Fill the weekly slate up to [`WEEKLY_CHALLENGE_COUNT`]
///
/// `kept` challenges stay first in the slate. When enough categories are
/// selected, every new challenge avoids categories already on the slate.
pub fn weekly_challenges<R: Rng + ?Sized>(
    rng: &mut R,
    selected: &[ContributionKind],
    kept: Vec<Challenge>,
) -> Vec<Challenge> {
    let distinct = eligible_count(selected) >= DISTINCT_WEEKLY_MIN_SELECTED;
    let mut slate = kept;
    slate.truncate(WEEKLY_CHALLENGE_COUNT);

    while slate.len() < WEEKLY_CHALLENGE_COUNT {
        let disallowed: Vec<ContributionKind> = if distinct {
            slate.iter().filter_map(|c| c.kind).collect()
        } else {
            Vec::new()
        };
        slate.push(create_challenge(
            rng,
            ChallengeCadence::Weekly,
            &disallowed,
            selected,
        ));
    }
    slate
}

fn allowed_kinds(
    disallowed: &[ContributionKind],
    selected: &[ContributionKind],
) -> Vec<ContributionKind> {
    let base: &[ContributionKind] = if selected.is_empty() {
        &ContributionKind::ALL
    } else {
        selected
    };
    base.iter()
        .copied()
        .filter(|k| k.is_challenge_eligible() && !disallowed.contains(k))
        .collect()
}

fn eligible_count(selected: &[ContributionKind]) -> usize {
    if selected.is_empty() {
        ContributionKind::ALL
            .iter()
            .filter(|k| k.is_challenge_eligible())
            .count()
    } else {
        selected.iter().filter(|k| k.is_challenge_eligible()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SELECTED: [ContributionKind; 4] = [
        ContributionKind::Cleanliness,
        ContributionKind::PlantCare,
        ContributionKind::Kindness,
        ContributionKind::Donation,
    ];

    #[test]
    fn test_daily_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let c = daily_challenge(&mut rng, &SELECTED);
            assert_eq!(c.cadence, ChallengeCadence::Daily);
            assert_eq!(c.target, 1);
            assert!((3..=6).contains(&c.xp), "xp {} out of range", c.xp);
            assert!(c.kind.map_or(true, |k| SELECTED.contains(&k)));
            assert_eq!(c.title, Challenge::title_for(c.kind, 1));
        }
    }

    #[test]
    fn test_weekly_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let c = create_challenge(&mut rng, ChallengeCadence::Weekly, &[], &SELECTED);
            assert!((2..=3).contains(&c.target));
            let bonus = c.xp - c.target * 3;
            assert!((1..=3).contains(&bonus), "bonus {bonus} out of range");
        }
    }

    #[test]
    fn test_some_challenges_are_untyped_and_some_typed() {
        let mut rng = StdRng::seed_from_u64(3);
        let kinds: Vec<_> = (0..200)
            .map(|_| daily_challenge(&mut rng, &SELECTED).kind)
            .collect();
        assert!(kinds.iter().any(Option::is_none));
        assert!(kinds.iter().any(Option::is_some));
    }

    #[test]
    fn test_never_picks_other_or_disallowed() {
        let mut rng = StdRng::seed_from_u64(5);
        let selected = [
            ContributionKind::Other,
            ContributionKind::Kindness,
            ContributionKind::Donation,
        ];
        for _ in 0..200 {
            let c = create_challenge(
                &mut rng,
                ChallengeCadence::Weekly,
                &[ContributionKind::Donation],
                &selected,
            );
            assert!(matches!(c.kind, None | Some(ContributionKind::Kindness)));
        }
    }

    #[test]
    fn test_empty_selection_uses_every_category() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            if let Some(kind) = daily_challenge(&mut rng, &[]).kind {
                seen.insert(kind);
            }
        }
        assert_eq!(seen.len(), 5);
        assert!(!seen.contains(&ContributionKind::Other));
    }

    #[test]
    fn test_falls_back_to_untyped_when_nothing_allowed() {
        let mut rng = StdRng::seed_from_u64(1);
        let selected = [ContributionKind::Other];
        for _ in 0..50 {
            assert!(daily_challenge(&mut rng, &selected).kind.is_none());
        }
    }

    #[test]
    fn test_weekly_slate_has_distinct_categories() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            let slate = weekly_challenges(&mut rng, &SELECTED, Vec::new());
            assert_eq!(slate.len(), WEEKLY_CHALLENGE_COUNT);
            let typed: Vec<_> = slate.iter().filter_map(|c| c.kind).collect();
            let mut unique = typed.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(typed.len(), unique.len(), "repeated category in {slate:?}");
        }
    }

    #[test]
    fn test_weekly_slate_keeps_given_challenges() {
        let mut rng = StdRng::seed_from_u64(33);
        let mut done = Challenge::new(
            ChallengeCadence::Weekly,
            Some(ContributionKind::Kindness),
            2,
            8,
        );
        done.xp_rewarded = true;

        for _ in 0..50 {
            let slate = weekly_challenges(&mut rng, &SELECTED, vec![done.clone()]);
            assert_eq!(slate.len(), WEEKLY_CHALLENGE_COUNT);
            assert_eq!(slate[0], done);
            assert!(slate[1..]
                .iter()
                .all(|c| c.kind != Some(ContributionKind::Kindness)));
        }
    }

    #[test]
    fn test_weekly_repeats_allowed_with_few_selected() {
        let mut rng = StdRng::seed_from_u64(2);
        let selected = [ContributionKind::Donation];
        for _ in 0..20 {
            let slate = weekly_challenges(&mut rng, &selected, Vec::new());
            assert!(slate
                .iter()
                .all(|c| matches!(c.kind, None | Some(ContributionKind::Donation))));
        }
    }
}
