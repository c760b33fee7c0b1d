//! Context-sensitive letter rules mapping Arabic script to visemes.
//!
//! Rules are declared per trigger letter as `<left>[<core>]<right>=<visemes>`.
//! The left context, core letters and right context are concatenated into one
//! pattern that must match starting exactly at the cursor. When a rule fires
//! the cursor moves past the core letters only, never past the contexts.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{LipsyncError, Result};
use crate::types::Viseme;

/// Built-in Modern Standard Arabic rules, in first-match-wins order per letter.
///
/// Some entries (`[آ]`, ` [ال]` under `ا`) start with a character other than
/// their key and so never fire from this table.
pub const ARABIC_RULES: &[(char, &[&str])] = &[
    ('ا', &["[ا]=O", "[آ]=O", " [ال]=aa nn"]),
    ('ب', &["[ب]=PP"]),
    ('ت', &["[ت]=DD", "[ة]=DD"]),
    ('ث', &["[ث]=TH"]),
    ('ج', &["[ج]=CH"]),
    ('ح', &["[ح]=aa"]),
    ('خ', &["[خ]=kk"]),
    ('د', &["[د]=DD"]),
    ('ذ', &["[ذ]=TH"]),
    ('ر', &["[ر]=RR"]),
    ('ز', &["[ز]=SS"]),
    ('س', &["[س]=SS"]),
    ('ش', &["[ش]=CH"]),
    ('ص', &["[ص]=SS"]),
    ('ض', &["[ض]=DD"]),
    ('ط', &["[ط]=DD"]),
    ('ظ', &["[ظ]=TH"]),
    ('ع', &["[ع]=aa"]),
    ('غ', &["[غ]=U"]),
    ('ف', &["[ف]=FF"]),
    ('ق', &["[ق]=kk"]),
    ('ك', &["[ك]=kk"]),
    ('ل', &["[ل]=I"]),
    ('م', &["[م]=PP"]),
    ('ن', &["[ن]=nn"]),
    ('ه', &["[ه]=aa"]),
    ('و', &["[و]=U"]),
    ('ي', &["[ي]=E", "[ى]=E", "[ئ]=E"]),
    ('ء', &["[ء]=aa"]),
];

lazy_static::lazy_static! {
    static ref ARABIC_RULE_TABLE: RuleTable =
        RuleTable::compile(ARABIC_RULES).expect("built-in Arabic rules are well-formed");
}

/// The compiled built-in Arabic rule table, shared process-wide.
pub fn arabic_rules() -> &'static RuleTable {
    &ARABIC_RULE_TABLE
}

/// A single compiled rule.
#[derive(Debug, Clone)]
pub struct ContextRule {
    matcher: Regex,
    advance: usize,
    visemes: Vec<Viseme>,
}

impl ContextRule {
    /// Compile one `<left>[<core>]<right>=<visemes>` declaration.
    ///
    /// An empty viseme list is allowed: the rule consumes its core letters and
    /// emits nothing.
    pub fn parse(rule: &str) -> Result<Self> {
        let malformed = |reason: String| LipsyncError::MalformedRule {
            rule: rule.to_string(),
            reason,
        };

        let pos_l = rule.find('[').ok_or_else(|| malformed("missing '['".into()))?;
        let pos_r = rule.find(']').ok_or_else(|| malformed("missing ']'".into()))?;
        let pos_e = rule.find('=').ok_or_else(|| malformed("missing '='".into()))?;
        if !(pos_l < pos_r && pos_r < pos_e) {
            return Err(malformed(
                "expected <left>[<core>]<right>=<visemes>".into(),
            ));
        }

        let left = &rule[..pos_l];
        let core = &rule[pos_l + 1..pos_r];
        let right = &rule[pos_r + 1..pos_e];

        let matcher = Regex::new(&format!("^(?:{}{}{})", left, core, right))
            .map_err(|e| malformed(e.to_string()))?;

        let visemes = rule[pos_e + 1..]
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Viseme>>>()?;

        Ok(Self {
            matcher,
            advance: core.chars().count(),
            visemes,
        })
    }

    /// Whether the rule matches at the very start of `remaining`.
    pub fn matches_at(&self, remaining: &str) -> bool {
        self.matcher.is_match(remaining)
    }

    /// Number of characters the cursor moves when this rule fires.
    pub fn advance(&self) -> usize {
        self.advance
    }

    pub fn visemes(&self) -> &[Viseme] {
        &self.visemes
    }
}

/// Ordered rules keyed by trigger letter. Immutable once compiled.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<char, Vec<ContextRule>>,
}

impl RuleTable {
    /// Compile a declarative rule list, failing on the first malformed rule.
    ///
    /// Repeated keys append to the rules already declared for that letter.
    pub fn compile(declarations: &[(char, &[&str])]) -> Result<Self> {
        let mut rules: HashMap<char, Vec<ContextRule>> = HashMap::new();
        for (letter, decls) in declarations {
            let compiled = decls
                .iter()
                .map(|d| ContextRule::parse(d))
                .collect::<Result<Vec<_>>>()?;
            rules.entry(*letter).or_default().extend(compiled);
        }
        log::debug!("Compiled rules for {} letters", rules.len());
        Ok(Self { rules })
    }

    /// Rules declared for `letter`, or `None` if the letter has no entry.
    pub fn rules_for(&self, letter: char) -> Option<&[ContextRule]> {
        self.rules.get(&letter).map(Vec::as_slice)
    }

    /// First rule for `letter` matching at the start of `remaining`.
    pub fn first_match(&self, letter: char, remaining: &str) -> Option<&ContextRule> {
        self.rules_for(letter)?
            .iter()
            .find(|rule| rule.matches_at(remaining))
    }

    /// Number of trigger letters.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_rule() {
        let rule = ContextRule::parse("[ب]=PP").unwrap();
        assert_eq!(rule.advance(), 1);
        assert_eq!(rule.visemes(), &[Viseme::Pp]);
        assert!(rule.matches_at("باب"));
        assert!(!rule.matches_at("اب"));
    }

    #[test]
    fn test_parse_multi_viseme_rule() {
        let rule = ContextRule::parse("[ال]=aa nn").unwrap();
        assert_eq!(rule.advance(), 2);
        assert_eq!(rule.visemes(), &[Viseme::Aa, Viseme::Nn]);
    }

    #[test]
    fn test_advance_counts_core_letters_only() {
        let rule = ContextRule::parse(" [ال]قمر=aa nn").unwrap();
        assert_eq!(rule.advance(), 2);
        assert!(rule.matches_at(" القمر"));
        assert!(!rule.matches_at("القمر"));
    }

    #[test]
    fn test_empty_viseme_list() {
        let rule = ContextRule::parse("[ـ]=").unwrap();
        assert_eq!(rule.advance(), 1);
        assert!(rule.visemes().is_empty());
    }

    #[test]
    fn test_match_is_anchored() {
        let rule = ContextRule::parse("[ت]=DD").unwrap();
        // The letter appears later in the text but not at the cursor.
        assert!(!rule.matches_at("بت"));
    }

    #[test]
    fn test_malformed_rules() {
        assert!(matches!(
            ContextRule::parse("ب]=PP"),
            Err(LipsyncError::MalformedRule { .. })
        ));
        assert!(matches!(
            ContextRule::parse("[ب=PP"),
            Err(LipsyncError::MalformedRule { .. })
        ));
        assert!(matches!(
            ContextRule::parse("[ب]PP"),
            Err(LipsyncError::MalformedRule { .. })
        ));
        assert!(matches!(
            ContextRule::parse("]ب[=PP"),
            Err(LipsyncError::MalformedRule { .. })
        ));
        assert!(matches!(
            ContextRule::parse("[(]=PP"),
            Err(LipsyncError::MalformedRule { .. })
        ));
    }

    #[test]
    fn test_unknown_viseme() {
        let err = ContextRule::parse("[ب]=XX").unwrap_err();
        assert!(matches!(err, LipsyncError::UnknownViseme(ref v) if v == "XX"));
    }

    #[test]
    fn test_compile_fails_fast() {
        let decls: &[(char, &[&str])] = &[('ب', &["[ب]=PP"]), ('ت', &["[ت]=ZZ"])];
        assert!(RuleTable::compile(decls).is_err());
    }

    #[test]
    fn test_builtin_table() {
        let table = arabic_rules();
        assert_eq!(table.len(), ARABIC_RULES.len());
        assert_eq!(table.rules_for('ا').unwrap().len(), 3);
        assert_eq!(table.rules_for('ي').unwrap().len(), 3);
        assert!(table.rules_for('ة').is_none());
        assert!(table.rules_for(' ').is_none());
        assert!(!table.is_empty());
        assert!(RuleTable::default().is_empty());
    }

    #[test]
    fn test_first_match_wins_in_declared_order() {
        let decls: &[(char, &[&str])] = &[('ب', &["[ب]ا=PP", "[ب]=FF"])];
        let table = RuleTable::compile(decls).unwrap();
        assert_eq!(table.first_match('ب', "با").unwrap().visemes(), &[Viseme::Pp]);
        assert_eq!(table.first_match('ب', "بت").unwrap().visemes(), &[Viseme::Ff]);
        assert!(table.first_match('ت', "ت").is_none());
    }

    #[test]
    fn test_repeated_keys_append() {
        let decls: &[(char, &[&str])] = &[('ب', &["[ب]ا=PP"]), ('ب', &["[ب]=FF"])];
        let table = RuleTable::compile(decls).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rules_for('ب').unwrap().len(), 2);
    }
}
