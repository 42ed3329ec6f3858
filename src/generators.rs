use std::collections::BTreeSet;

use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::{debug, trace};

use crate::config::DrawConfig;
use crate::draw::Draw;
use crate::errors::DrawError;

/// Supplier of uniformly distributed 32-bit values.
pub trait RandomSource {
    fn next_u32(&mut self) -> Result<u32, DrawError>;
}

/// The operating system's cryptographically secure generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSource;

impl RandomSource for OsSource {
    fn next_u32(&mut self) -> Result<u32, DrawError> {
        OsRng
            .try_next_u32()
            .map_err(|e| DrawError::RandomSource(e.to_string()))
    }
}

/// Uniform integer in `min..=max`.
///
/// Raw values at or above the largest multiple of the span are rejected so
/// every result is exactly equally likely. Callers must ensure `min <= max`.
pub fn draw_in_range<S>(source: &mut S, min: u32, max: u32) -> Result<u32, DrawError>
where
    S: RandomSource + ?Sized,
{
    let span = u64::from(max - min) + 1;
    let space = 1u64 << 32;
    let zone = space - space % span;

    loop {
        let raw = u64::from(source.next_u32()?);
        if raw < zone {
            return Ok(min + (raw % span) as u32);
        }
        trace!(raw, "rejected biased sample");
    }
}

/// Draws `rules.size` distinct numbers from `rules.min..=rules.max`.
///
/// Duplicate candidates are discarded and redrawn without a cap.
pub fn lucky_dip<S>(source: &mut S, rules: &DrawConfig) -> Result<Draw, DrawError>
where
    S: RandomSource + ?Sized,
{
    rules.validate()?;

    let mut picked = BTreeSet::new();
    let mut attempts = 0usize;

    while picked.len() < rules.size {
        let candidate = draw_in_range(source, rules.min, rules.max)?;
        attempts += 1;

        if !picked.insert(candidate) {
            trace!(candidate, "duplicate rejected");
        }
    }

    debug!(attempts, size = rules.size, "lucky dip complete");
    Ok(Draw::from_sorted(picked.into_iter().collect()))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Replays a fixed list of raw values, then fails like an unavailable source.
    pub(crate) struct ScriptedSource {
        values: VecDeque<u32>,
    }

    impl ScriptedSource {
        pub(crate) fn new(values: &[u32]) -> Self {
            Self {
                values: values.iter().copied().collect(),
            }
        }

        /// Raw values that map onto the given candidates for a range starting at 1.
        pub(crate) fn candidates(candidates: &[u32]) -> Self {
            let raw: Vec<u32> = candidates.iter().map(|c| c - 1).collect();
            Self::new(&raw)
        }

        pub(crate) fn remaining(&self) -> usize {
            self.values.len()
        }
    }

    impl RandomSource for ScriptedSource {
        fn next_u32(&mut self) -> Result<u32, DrawError> {
            self.values
                .pop_front()
                .ok_or_else(|| DrawError::RandomSource(String::from("script exhausted")))
        }
    }

    #[test]
    fn rejects_duplicates_and_sorts() {
        let mut source = ScriptedSource::candidates(&[5, 5, 12, 1, 60, 33, 33, 7, 45]);

        let draw = lucky_dip(&mut source, &DrawConfig::default()).unwrap();

        assert_eq!(draw.numbers(), &[1, 5, 7, 12, 33, 60]);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn range_mapping_hits_both_ends() {
        let mut source = ScriptedSource::new(&[0, 59, 60, 119]);

        assert_eq!(draw_in_range(&mut source, 1, 60).unwrap(), 1);
        assert_eq!(draw_in_range(&mut source, 1, 60).unwrap(), 60);
        assert_eq!(draw_in_range(&mut source, 1, 60).unwrap(), 1);
        assert_eq!(draw_in_range(&mut source, 1, 60).unwrap(), 60);
    }

    #[test]
    fn biased_tail_is_redrawn() {
        // 2^32 % 60 == 16, so the top 16 raw values fall outside the fair zone.
        let mut source = ScriptedSource::new(&[u32::MAX, u32::MAX - 15, 41]);

        assert_eq!(draw_in_range(&mut source, 1, 60).unwrap(), 42);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn last_fair_value_is_accepted() {
        let last_fair = u32::MAX - 16;
        let mut source = ScriptedSource::new(&[last_fair]);

        assert_eq!(draw_in_range(&mut source, 1, 60).unwrap(), 60);
    }

    #[test]
    fn full_width_range_passes_values_through() {
        let mut source = ScriptedSource::new(&[u32::MAX]);

        assert_eq!(draw_in_range(&mut source, 0, u32::MAX).unwrap(), u32::MAX);
    }

    #[test]
    fn source_failure_aborts_the_draw() {
        let mut source = ScriptedSource::candidates(&[3, 9, 27]);

        let result = lucky_dip(&mut source, &DrawConfig::default());

        assert!(matches!(result, Err(DrawError::RandomSource(_))));
    }

    #[test]
    fn invalid_rules_read_no_randomness() {
        let mut source = ScriptedSource::candidates(&[1, 2, 3]);
        let rules = DrawConfig {
            min: 1,
            max: 3,
            size: 4,
            ..DrawConfig::default()
        };

        assert!(matches!(lucky_dip(&mut source, &rules), Err(DrawError::Config(_))));
        assert_eq!(source.remaining(), 3);
    }

    #[test]
    fn whole_range_draw_terminates() {
        let rules = DrawConfig {
            min: 1,
            max: 6,
            size: 6,
            ..DrawConfig::default()
        };

        let draw = lucky_dip(&mut OsSource, &rules).unwrap();

        assert_eq!(draw.numbers(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn os_draws_are_always_well_formed() {
        let rules = DrawConfig::default();

        for _ in 0..2_000 {
            let draw = lucky_dip(&mut OsSource, &rules).unwrap();
            let numbers = draw.numbers();

            assert_eq!(numbers.len(), 6);
            assert!(numbers.windows(2).all(|w| w[0] < w[1]));
            assert!(numbers.iter().all(|n| (1..=60).contains(n)));
        }
    }

    #[test]
    fn os_draws_are_roughly_uniform() {
        let rules = DrawConfig::default();
        let trials = 6_000;
        let mut counts = [0u32; 61];

        for _ in 0..trials {
            for &n in lucky_dip(&mut OsSource, &rules).unwrap().numbers() {
                counts[n as usize] += 1;
            }
        }

        // Each value is expected 600 times; the bounds sit about eight
        // standard deviations out.
        assert_eq!(counts[0], 0);
        for (value, &count) in counts.iter().enumerate().skip(1) {
            assert!(
                (400..=800).contains(&count),
                "value {} appeared {} times",
                value,
                count
            );
        }
        assert!(counts[1] > 0 && counts[60] > 0);
    }

    #[test]
    fn consecutive_draws_differ() {
        let rules = DrawConfig::default();

        let draws: Vec<Draw> = (0..5)
            .map(|_| lucky_dip(&mut OsSource, &rules).unwrap())
            .collect();

        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }
}
