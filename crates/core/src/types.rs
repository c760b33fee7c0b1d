use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LipsyncError;

/// Oculus-compatible viseme identifiers.
///
/// The string forms are the compatibility contract with the avatar rig and
/// must not change without coordinating with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Viseme {
    /// Silence / mouth at rest
    #[serde(rename = "sil")]
    Sil,
    /// Bilabials: lips pressed together
    #[serde(rename = "PP")]
    Pp,
    /// Labiodentals
    #[serde(rename = "FF")]
    Ff,
    /// Interdentals
    #[serde(rename = "TH")]
    Th,
    /// Dental and alveolar stops
    #[serde(rename = "DD")]
    Dd,
    /// Velar and uvular stops
    #[serde(rename = "kk")]
    Kk,
    /// Postalveolars
    #[serde(rename = "CH")]
    Ch,
    /// Sibilants
    #[serde(rename = "SS")]
    Ss,
    /// Nasals
    #[serde(rename = "nn")]
    Nn,
    /// Trill
    #[serde(rename = "RR")]
    Rr,
    #[serde(rename = "aa")]
    Aa,
    E,
    I,
    O,
    U,
}

impl Viseme {
    /// Every viseme, in the order the rig enumerates them.
    pub const ALL: [Viseme; 15] = [
        Viseme::Sil,
        Viseme::Pp,
        Viseme::Ff,
        Viseme::Th,
        Viseme::Dd,
        Viseme::Kk,
        Viseme::Ch,
        Viseme::Ss,
        Viseme::Nn,
        Viseme::Rr,
        Viseme::Aa,
        Viseme::E,
        Viseme::I,
        Viseme::O,
        Viseme::U,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sil => "sil",
            Self::Pp => "PP",
            Self::Ff => "FF",
            Self::Th => "TH",
            Self::Dd => "DD",
            Self::Kk => "kk",
            Self::Ch => "CH",
            Self::Ss => "SS",
            Self::Nn => "nn",
            Self::Rr => "RR",
            Self::Aa => "aa",
            Self::E => "E",
            Self::I => "I",
            Self::O => "O",
            Self::U => "U",
        }
    }

    pub fn is_silence(&self) -> bool {
        matches!(self, Self::Sil)
    }
}

impl fmt::Display for Viseme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Viseme {
    type Err = LipsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Viseme::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| LipsyncError::UnknownViseme(s.to_string()))
    }
}

/// The names of all supported visemes, for validation by the renderer.
pub fn viseme_names() -> [&'static str; 15] {
    Viseme::ALL.map(|v| v.as_str())
}

/// A single emitted viseme with absolute timing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisemeEvent {
    pub viseme: Viseme,
    /// Start time in milliseconds
    pub start_ms: u32,
    /// Duration in milliseconds
    pub duration_ms: u32,
}

/// Output of the lip-sync pipeline: three parallel sequences.
///
/// `times` is non-decreasing and, when non-empty, the last viseme is always
/// [`Viseme::Sil`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisemeSequence {
    pub visemes: Vec<Viseme>,
    /// Start times in milliseconds
    pub times: Vec<u32>,
    /// Durations in milliseconds
    pub durations: Vec<u32>,
}

impl VisemeSequence {
    pub fn len(&self) -> usize {
        self.visemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visemes.is_empty()
    }

    /// Iterate the sequence as individual events.
    pub fn events(&self) -> impl Iterator<Item = VisemeEvent> + '_ {
        self.visemes
            .iter()
            .zip(&self.times)
            .zip(&self.durations)
            .map(|((&viseme, &start_ms), &duration_ms)| VisemeEvent {
                viseme,
                start_ms,
                duration_ms,
            })
    }

    /// End of the last event in milliseconds, 0 when empty. Saturates at `u32::MAX`.
    pub fn total_duration_ms(&self) -> u32 {
        self.events()
            .last()
            .map(|e| e.start_ms.saturating_add(e.duration_ms))
            .unwrap_or(0)
    }
}
