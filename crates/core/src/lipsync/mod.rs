//! Arabic lip-sync processor: normalization followed by viseme sequencing.

pub mod sequencer;

use crate::error::Result;
use crate::language::normalize;
use crate::language::numbers;
use crate::language::rules::{arabic_rules, RuleTable};
use crate::types::{self, VisemeSequence};

use sequencer::TimingConfig;

/// Holds the rule and timing tables; both are read-only after construction,
/// so one processor can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct LipsyncAr {
    rules: RuleTable,
    timing: TimingConfig,
}

impl Default for LipsyncAr {
    fn default() -> Self {
        Self::with_rules(arabic_rules().clone(), TimingConfig::default())
    }
}

impl LipsyncAr {
    /// Processor using the built-in Arabic rules and timings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in rules with custom timing.
    pub fn with_timing(timing: TimingConfig) -> Self {
        Self::with_rules(arabic_rules().clone(), timing)
    }

    pub fn with_rules(rules: RuleTable, timing: TimingConfig) -> Self {
        Self { rules, timing }
    }

    /// Convert raw Arabic text to a timed viseme sequence.
    pub fn process(&self, text: &str) -> VisemeSequence {
        let normalized = self.pre_process_text(text);
        let sequence = self.words_to_visemes(&normalized);
        log::debug!(
            "Processed {} chars into {} visemes ({} ms)",
            normalized.chars().count(),
            sequence.len(),
            sequence.total_duration_ms()
        );
        sequence
    }

    pub fn pre_process_text(&self, text: &str) -> String {
        normalize::pre_process_text(text)
    }

    pub fn words_to_visemes(&self, text: &str) -> VisemeSequence {
        sequencer::words_to_visemes(text, &self.rules, &self.timing)
    }

    pub fn convert_number_to_words(&self, num: &str) -> Result<String> {
        numbers::convert_number_to_words(num)
    }

    /// The 15 viseme names the output may contain.
    pub fn viseme_names(&self) -> [&'static str; 15] {
        types::viseme_names()
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Viseme;

    const SAMPLES: &[&str] = &[
        "",
        " ",
        "مرحبا",
        "السلام عليكم ورحمة الله",
        "لدي 3 كتب و 1500 قلم",
        "الرقم 0501234567",
        "خصم 50% على كل شيء!!!",
        "ههههههه",
        "hello world",
        "كتـــاب",
        "٣.٥ مليون",
        "مم  بب",
    ];

    #[test]
    fn test_empty_input() {
        let lipsync = LipsyncAr::new();
        assert_eq!(lipsync.process(""), VisemeSequence::default());
        assert!(lipsync.process("   ").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let lipsync = LipsyncAr::new();
        for s in SAMPLES {
            assert_eq!(lipsync.process(s), lipsync.process(s));
        }
    }

    #[test]
    fn test_parallel_lengths() {
        let lipsync = LipsyncAr::new();
        for s in SAMPLES {
            let seq = lipsync.process(s);
            assert_eq!(seq.visemes.len(), seq.times.len(), "{}", s);
            assert_eq!(seq.visemes.len(), seq.durations.len(), "{}", s);
        }
    }

    #[test]
    fn test_monotonic_times() {
        let lipsync = LipsyncAr::new();
        for s in SAMPLES {
            let seq = lipsync.process(s);
            for pair in seq.times.windows(2) {
                assert!(pair[0] <= pair[1], "times not monotonic for {:?}", s);
            }
        }
    }

    #[test]
    fn test_trailing_silence() {
        let lipsync = LipsyncAr::new();
        for s in SAMPLES {
            let seq = lipsync.process(s);
            if let Some(last) = seq.visemes.last() {
                assert_eq!(*last, Viseme::Sil, "missing trailing silence for {:?}", s);
            }
        }
    }

    #[test]
    fn test_only_known_visemes() {
        let lipsync = LipsyncAr::new();
        let names = lipsync.viseme_names();
        for s in SAMPLES {
            for v in lipsync.process(s).visemes {
                assert!(names.contains(&v.as_str()));
            }
        }
    }

    #[test]
    fn test_process_normalizes_first() {
        let lipsync = LipsyncAr::new();
        // Tatweel is dropped, so this is the same as the plain word.
        assert_eq!(lipsync.process("بـاب"), lipsync.process("باب"));
        // Digits are read as words rather than skipped.
        assert!(!lipsync.process("5").is_empty());
    }

    #[test]
    fn test_process_word() {
        let lipsync = LipsyncAr::new();
        // س ل ا م -> SS I O PP
        let seq = lipsync.process("سلام");
        assert_eq!(
            seq.visemes,
            vec![Viseme::Ss, Viseme::I, Viseme::O, Viseme::Pp, Viseme::Sil]
        );
        assert_eq!(seq.times, vec![0, 96, 164, 244, 308]);
        assert_eq!(seq.durations, vec![96, 68, 80, 64, 40]);
    }

    #[test]
    fn test_custom_timing() {
        let timing = TimingConfig {
            ms_per_unit: 160.0,
            ..TimingConfig::default()
        };
        let fast = LipsyncAr::new().process("باب");
        let slow = LipsyncAr::with_timing(timing).process("باب");
        assert_eq!(fast.visemes, slow.visemes);
        assert_eq!(slow.total_duration_ms(), 2 * fast.total_duration_ms());
    }

    #[test]
    fn test_accessors_expose_tables() {
        let lipsync = LipsyncAr::with_timing(TimingConfig {
            ms_per_unit: 120.0,
            ..TimingConfig::default()
        });
        assert_eq!(lipsync.timing().ms_per_unit, 120.0);
        assert_eq!(lipsync.rules().len(), arabic_rules().len());

        let bare = LipsyncAr::with_rules(RuleTable::default(), lipsync.timing().clone());
        assert!(bare.rules().is_empty());
        assert!(bare.process("باب").visemes.iter().all(|v| v.is_silence()));
    }

    #[test]
    fn test_number_words() {
        let lipsync = LipsyncAr::new();
        assert_eq!(lipsync.convert_number_to_words("2").unwrap(), "اثنان");
        assert!(lipsync.convert_number_to_words("").is_err());
    }

    #[test]
    fn test_shared_between_threads() {
        let lipsync = std::sync::Arc::new(LipsyncAr::new());
        let expected = lipsync.process("مرحبا بكم");
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lipsync = lipsync.clone();
                std::thread::spawn(move || lipsync.process("مرحبا بكم"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
