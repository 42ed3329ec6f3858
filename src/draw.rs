use std::collections::BTreeSet;
use std::fmt;
use std::num::{IntErrorKind, ParseIntError};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::DrawConfig;
use crate::errors::{DrawError, FormError, ValidationError};
use crate::form::Page;
use crate::generators::{RandomSource, lucky_dip};

/// A set of distinct numbers, always held in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draw {
    numbers: Vec<u32>,
}

impl Draw {
    pub(crate) fn from_sorted(numbers: Vec<u32>) -> Self {
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        Self { numbers }
    }

    /// Validates numbers typed into the draw form, given as `(field id, raw text)`.
    pub fn from_entries(
        entries: &[(&str, &str)],
        rules: &DrawConfig,
    ) -> Result<Self, ValidationError> {
        if entries.len() != rules.size {
            return Err(ValidationError::WrongCount {
                expected: rules.size,
                found: entries.len(),
            });
        }

        let mut numbers = Vec::with_capacity(entries.len());
        for &(field, raw) in entries {
            numbers.push(parse_entry(field, raw, rules)?);
        }

        let mut seen = BTreeSet::new();
        for &n in &numbers {
            if !seen.insert(n) {
                return Err(ValidationError::Duplicate(n));
            }
        }

        Ok(Self::from_sorted(seen.into_iter().collect()))
    }

    pub fn numbers(&self) -> &[u32] {
        &self.numbers
    }

    pub(crate) fn len(&self) -> usize {
        self.numbers.len()
    }

    /// Space separated form, e.g. `"1 5 7 12 33 60"`.
    pub fn submission(&self) -> String {
        self.numbers
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.submission())
    }
}

fn parse_entry(field: &str, raw: &str, rules: &DrawConfig) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let out_of_range = || ValidationError::OutOfRange {
        field: field.to_string(),
        min: rules.min,
        max: rules.max,
    };

    let value: i64 = raw.parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
        _ => ValidationError::NotANumber {
            field: field.to_string(),
            value: raw.to_string(),
        },
    })?;

    u32::try_from(value)
        .ok()
        .filter(|n| (rules.min..=rules.max).contains(n))
        .ok_or_else(out_of_range)
}

/// The output fields a draw is written into, resolved once at setup.
#[derive(Debug, Clone)]
pub struct DrawSlots {
    ids: Vec<String>,
}

impl DrawSlots {
    /// Fails unless exactly `rules.size` numbered input fields exist.
    pub fn bind(page: &Page, rules: &DrawConfig) -> Result<Self, FormError> {
        let ids = rules.slot_ids();
        for id in &ids {
            page.require_input(id)?;
        }

        let extra = (rules.size + 1..)
            .map(|i| format!("{}{}", rules.slot_prefix, i))
            .take_while(|id| page.require_input(id).is_ok())
            .count();
        if extra > 0 {
            return Err(FormError::SlotCount {
                expected: rules.size,
                found: rules.size + extra,
            });
        }

        debug!(slots = ids.len(), "draw slots bound");
        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Writes one number per slot. Nothing is written unless every slot can
    /// take a value.
    pub fn fill(&self, page: &mut Page, draw: &Draw) -> Result<(), FormError> {
        if draw.len() != self.ids.len() {
            return Err(FormError::SlotCount {
                expected: draw.len(),
                found: self.ids.len(),
            });
        }

        for id in &self.ids {
            page.require_input(id)?;
        }

        for (id, n) in self.ids.iter().zip(draw.numbers()) {
            page.set_value(id, n.to_string())?;
        }

        Ok(())
    }

    /// Generates a fresh draw and writes it into the slots.
    pub fn lucky_dip<S>(
        &self,
        page: &mut Page,
        source: &mut S,
        rules: &DrawConfig,
    ) -> Result<Draw, DrawError>
    where
        S: RandomSource + ?Sized,
    {
        let draw = lucky_dip(source, rules)?;
        self.fill(page, &draw)?;

        info!(draw = %draw, "lucky dip written to form");
        Ok(draw)
    }

    /// Current `(id, text)` contents of every slot.
    pub fn entries<'a>(&'a self, page: &'a Page) -> Result<Vec<(&'a str, &'a str)>, FormError> {
        self.ids
            .iter()
            .map(|id| page.value(id).map(|value| (id.as_str(), value)))
            .collect()
    }
}
