//! Viseme sequencing: walk normalized text, apply letter rules, time events.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LipsyncError, Result};
use crate::language::rules::RuleTable;
use crate::types::{Viseme, VisemeSequence};

/// Upper bound on `ms_per_unit`; one relative unit never lasts longer than a minute.
pub const MAX_MS_PER_UNIT: f64 = 60_000.0;

/// Timing parameters for the sequencer, in relative units unless noted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Base duration of each viseme
    pub viseme_durations: HashMap<Viseme, f64>,
    /// Pause durations for characters without rules
    pub special_durations: HashMap<char, f64>,
    /// Share of the base duration added when a viseme repeats
    pub repeat_factor: f64,
    /// Duration of the silence appended at the end
    pub trailing_silence: f64,
    /// Pause used for a space missing from `special_durations`
    pub default_pause: f64,
    /// Duration used for a viseme missing from `viseme_durations`
    pub fallback_duration: f64,
    /// Milliseconds per relative unit
    pub ms_per_unit: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let viseme_durations = [
            (Viseme::Aa, 1.0),
            (Viseme::E, 0.9),
            (Viseme::I, 0.85),
            (Viseme::O, 1.0),
            (Viseme::U, 0.9),
            (Viseme::Pp, 0.8),
            (Viseme::Ss, 1.2),
            (Viseme::Th, 1.0),
            (Viseme::Dd, 0.9),
            (Viseme::Ff, 0.9),
            (Viseme::Kk, 0.8),
            (Viseme::Nn, 0.8),
            (Viseme::Rr, 0.7),
            (Viseme::Ch, 1.1),
            (Viseme::Sil, 1.0),
        ]
        .into_iter()
        .collect();

        let special_durations = [(' ', 1.0), ('،', 3.0), ('-', 0.5), ('\'', 0.5)]
            .into_iter()
            .collect();

        Self {
            viseme_durations,
            special_durations,
            repeat_factor: 0.7,
            trailing_silence: 0.5,
            default_pause: 0.5,
            fallback_duration: 1.0,
            ms_per_unit: 80.0,
        }
    }
}

impl TimingConfig {
    /// Load a timing config from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let timing: Self = serde_json::from_str(&data)?;
        timing.validate()?;
        Ok(timing)
    }

    /// Reject durations that would move time backwards or overflow the
    /// millisecond scale.
    pub fn validate(&self) -> Result<()> {
        fn non_negative(field: String, value: f64) -> Result<()> {
            if !value.is_finite() {
                return Err(LipsyncError::InvalidTiming {
                    field,
                    value,
                    reason: "must be finite",
                });
            }
            if value < 0.0 {
                return Err(LipsyncError::InvalidTiming {
                    field,
                    value,
                    reason: "must not be negative",
                });
            }
            Ok(())
        }

        for (viseme, &d) in &self.viseme_durations {
            non_negative(format!("viseme_durations.{}", viseme), d)?;
        }
        for (c, &d) in &self.special_durations {
            non_negative(format!("special_durations.{:?}", c), d)?;
        }
        non_negative("repeat_factor".into(), self.repeat_factor)?;
        non_negative("trailing_silence".into(), self.trailing_silence)?;
        non_negative("default_pause".into(), self.default_pause)?;
        non_negative("fallback_duration".into(), self.fallback_duration)?;
        non_negative("ms_per_unit".into(), self.ms_per_unit)?;

        if self.ms_per_unit == 0.0 || self.ms_per_unit > MAX_MS_PER_UNIT {
            return Err(LipsyncError::InvalidTiming {
                field: "ms_per_unit".into(),
                value: self.ms_per_unit,
                reason: "must be positive and at most 60000",
            });
        }
        Ok(())
    }

    pub fn base_duration(&self, viseme: Viseme) -> f64 {
        self.viseme_durations
            .get(&viseme)
            .copied()
            .unwrap_or(self.fallback_duration)
    }

    pub fn pause_duration(&self, c: char) -> f64 {
        self.special_durations
            .get(&c)
            .copied()
            .unwrap_or(self.default_pause)
    }
}

/// Output under construction, still in relative units.
#[derive(Default)]
struct Timeline {
    visemes: Vec<Viseme>,
    times: Vec<f64>,
    durations: Vec<f64>,
    /// Cumulative time
    t: f64,
}

impl Timeline {
    fn push(&mut self, viseme: Viseme, duration: f64) {
        self.visemes.push(viseme);
        self.times.push(self.t);
        self.durations.push(duration);
        self.t += duration;
    }

    /// Emit a viseme, extending the previous event if it is the same one.
    fn emit(&mut self, viseme: Viseme, timing: &TimingConfig) {
        let base = timing.base_duration(viseme);
        if self.visemes.last() == Some(&viseme) {
            let extra = timing.repeat_factor * base;
            if let Some(last) = self.durations.last_mut() {
                *last += extra;
            }
            self.t += extra;
        } else {
            self.push(viseme, base);
        }
    }

    /// Scale to milliseconds. Must run after all accumulation.
    fn into_sequence(self, ms_per_unit: f64) -> VisemeSequence {
        let to_ms = |x: f64| (x * ms_per_unit).round().max(0.0) as u32;
        VisemeSequence {
            visemes: self.visemes,
            times: self.times.into_iter().map(to_ms).collect(),
            durations: self.durations.into_iter().map(to_ms).collect(),
        }
    }
}

/// Convert normalized text to a timed viseme sequence.
///
/// The first rule for the letter under the cursor that matches there wins.
/// Characters without rules are skipped, except spaces which become pauses.
/// A non-empty result always ends in silence.
pub fn words_to_visemes(text: &str, rules: &RuleTable, timing: &TimingConfig) -> VisemeSequence {
    // Byte offset of every char, so rules can match against the remaining text.
    let offsets: Vec<(usize, char)> = text.char_indices().collect();
    let mut timeline = Timeline::default();
    let mut cursor = 0;

    while cursor < offsets.len() {
        let (byte, c) = offsets[cursor];

        if rules.rules_for(c).is_some() {
            match rules.first_match(c, &text[byte..]) {
                Some(rule) => {
                    for &viseme in rule.visemes() {
                        timeline.emit(viseme, timing);
                    }
                    cursor += rule.advance().max(1);
                }
                None => {
                    log::trace!("No rule matched {:?} at {}", c, cursor);
                    cursor += 1;
                }
            }
        } else {
            if c == ' ' {
                timeline.push(Viseme::Sil, timing.pause_duration(c));
            } else {
                log::trace!("Skipping unmapped {:?} at {}", c, cursor);
            }
            cursor += 1;
        }
    }

    if matches!(timeline.visemes.last(), Some(v) if !v.is_silence()) {
        let t = timeline.t;
        timeline.visemes.push(Viseme::Sil);
        timeline.times.push(t);
        timeline.durations.push(timing.trailing_silence);
    }

    timeline.into_sequence(timing.ms_per_unit)
}
