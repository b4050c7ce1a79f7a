// src/classify/rules.rs
//! Keyword rule tables: TOML schema, regex compilation and ordered rule lists.
//!
//! Every classifier in `classify` reads from one compiled [`Rulebook`]. The built-in
//! book is embedded from `config/rules.toml`; a replacement can be supplied through
//! `SIGNAL_RULES_PATH`. Rule order inside each table is significant: the category and
//! region classifiers return the label of the first matching rule.

use anyhow::{anyhow, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::model::Category;

pub const ENV_RULES_PATH: &str = "SIGNAL_RULES_PATH";

const BUILTIN_RULES: &str = include_str!("../../config/rules.toml");

static BUILTIN: Lazy<Rulebook> =
    Lazy::new(|| Rulebook::from_toml_str(BUILTIN_RULES).expect("valid built-in rules.toml"));

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct RulesRoot {
    #[serde(default = "default_category")]
    pub default_category: Category,
    #[serde(default = "default_fallback_region")]
    pub fallback_region: String,
    #[serde(default)]
    pub noise: Vec<PatternCfg>,
    #[serde(default)]
    pub domain: Vec<PatternCfg>,
    #[serde(default)]
    pub categories: Vec<CategoryRuleCfg>,
    #[serde(default)]
    pub regions: Vec<LabelRuleCfg>,
    #[serde(default)]
    pub tags: Vec<LabelRuleCfg>,
    #[serde(default)]
    pub critical: Vec<PatternCfg>,
    #[serde(default)]
    pub entities: Vec<EntityCfg>,
    #[serde(default)]
    pub sentiment: SentimentCfg,
}

fn default_category() -> Category {
    Category::News
}

fn default_fallback_region() -> String {
    "Global".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatternCfg {
    pub id: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRuleCfg {
    pub id: String,
    pub category: Category,
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelRuleCfg {
    pub id: String,
    pub label: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityCfg {
    pub name: String,
    /// Optional explicit regex; defaults to a case-insensitive word match on `name`.
    #[serde(default)]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentimentCfg {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
}

/* ----------------------------
Compiled structures
---------------------------- */

/// One `(pattern, label)` pair.
#[derive(Debug, Clone)]
pub struct LabeledRule<L> {
    pub id: String,
    pub label: L,
    re: Regex,
}

impl<L> LabeledRule<L> {
    pub fn matches(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    pub fn count(&self, text: &str) -> usize {
        self.re.find_iter(text).count()
    }
}

/// Ordered list of labeled rules, evaluated front to back.
#[derive(Debug, Clone)]
pub struct RuleList<L> {
    rules: Vec<LabeledRule<L>>,
}

impl<L> Default for RuleList<L> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<L> RuleList<L> {
    /// The first rule whose pattern matches wins.
    pub fn first_match(&self, text: &str) -> Option<&LabeledRule<L>> {
        self.rules.iter().find(|r| r.matches(text))
    }

    /// Every matching rule, in table order.
    pub fn all_matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a LabeledRule<L>> + 'a {
        self.rules.iter().filter(move |r| r.matches(text))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabeledRule<L>> {
        self.rules.iter()
    }
}

/// All keyword tables used by the classifiers, compiled once.
#[derive(Debug, Clone)]
pub struct Rulebook {
    pub default_category: Category,
    pub fallback_region: String,
    pub noise: RuleList<()>,
    pub domain: RuleList<()>,
    pub categories: RuleList<Category>,
    pub regions: RuleList<String>,
    pub tags: RuleList<String>,
    pub critical: RuleList<()>,
    pub entities: RuleList<String>,
    pub positive: HashSet<String>,
    pub negative: HashSet<String>,
}

fn compile(kind: &str, id: &str, pattern: &str) -> anyhow::Result<Regex> {
    Regex::new(pattern).map_err(|e| anyhow!("{kind} `{id}` regex error: {e}"))
}

fn compile_plain(kind: &str, cfgs: &[PatternCfg]) -> anyhow::Result<RuleList<()>> {
    let rules = cfgs
        .iter()
        .map(|c| {
            Ok(LabeledRule {
                id: c.id.clone(),
                label: (),
                re: compile(kind, &c.id, &c.pattern)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(RuleList { rules })
}

fn compile_labeled(kind: &str, cfgs: &[LabelRuleCfg]) -> anyhow::Result<RuleList<String>> {
    let rules = cfgs
        .iter()
        .map(|c| {
            Ok(LabeledRule {
                id: c.id.clone(),
                label: c.label.clone(),
                re: compile(kind, &c.id, &c.pattern)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(RuleList { rules })
}

fn word_set(words: &[String]) -> HashSet<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

impl Rulebook {
    /// Shared built-in rulebook (embedded `config/rules.toml`).
    pub fn builtin() -> &'static Rulebook {
        &BUILTIN
    }

    /// Load from `$SIGNAL_RULES_PATH` if set, otherwise clone the built-in book.
    pub fn load_default() -> anyhow::Result<Self> {
        match std::env::var(ENV_RULES_PATH) {
            Ok(p) => Self::from_path(&PathBuf::from(p)),
            Err(_) => Ok(Self::builtin().clone()),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading rules from {}", path.display()))?;
        let book = Self::from_toml_str(&content)
            .with_context(|| format!("compiling rules from {}", path.display()))?;
        info!(
            target: "pipeline",
            path = %path.display(),
            categories = book.categories.len(),
            regions = book.regions.len(),
            "loaded rulebook"
        );
        Ok(book)
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: RulesRoot = toml::from_str(toml_str)?;

        let categories = cfg
            .categories
            .iter()
            .map(|c| {
                Ok(LabeledRule {
                    id: c.id.clone(),
                    label: c.category,
                    re: compile("category", &c.id, &c.pattern)?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let entities = cfg
            .entities
            .iter()
            .map(|e| {
                let pattern = e
                    .pattern
                    .clone()
                    .unwrap_or_else(|| format!(r"(?i)\b{}\b", regex::escape(&e.name)));
                Ok(LabeledRule {
                    id: e.name.clone(),
                    label: e.name.clone(),
                    re: compile("entity", &e.name, &pattern)?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            default_category: cfg.default_category,
            fallback_region: cfg.fallback_region,
            noise: compile_plain("noise", &cfg.noise)?,
            domain: compile_plain("domain", &cfg.domain)?,
            categories: RuleList { rules: categories },
            regions: compile_labeled("region", &cfg.regions)?,
            tags: compile_labeled("tag", &cfg.tags)?,
            critical: compile_plain("critical", &cfg.critical)?,
            entities: RuleList { rules: entities },
            positive: word_set(&cfg.sentiment.positive),
            negative: word_set(&cfg.sentiment.negative),
        })
    }
}

/// Text every classifier looks at: title and body joined by a space.
pub fn joined(title: &str, body: &str) -> String {
    let mut s = String::with_capacity(title.len() + body.len() + 1);
    s.push_str(title);
    s.push(' ');
    s.push_str(body);
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOML: &str = r#"
default_category = "industry"
fallback_region = "National"

[[noise]]
id = "crypto"
pattern = '(?i)\bbitcoin\b'

[[categories]]
id = "first"
category = "policy"
pattern = '(?i)\brule\b'

[[categories]]
id = "second"
category = "research"
pattern = '(?i)\brule\b|(?i)\bpaper\b'

[[entities]]
name = "Acme Labs"
"#;

    #[test]
    fn builtin_compiles_and_is_populated() {
        let b = Rulebook::builtin();
        assert_eq!(b.default_category, Category::News);
        assert!(!b.noise.is_empty());
        assert!(!b.domain.is_empty());
        assert!(!b.categories.is_empty());
        assert!(!b.regions.is_empty());
        assert!(!b.positive.is_empty() && !b.negative.is_empty());
    }

    #[test]
    fn first_rule_wins_in_table_order() {
        let b = Rulebook::from_toml_str(TEST_TOML).unwrap();
        assert_eq!(b.default_category, Category::Industry);
        assert_eq!(b.fallback_region, "National");
        let hit = b.categories.first_match("a new rule and a paper").unwrap();
        assert_eq!(hit.id, "first");
        let hit = b.categories.first_match("just a paper").unwrap();
        assert_eq!(hit.label, Category::Research);
    }

    #[test]
    fn entity_default_pattern_is_word_bounded() {
        let b = Rulebook::from_toml_str(TEST_TOML).unwrap();
        assert!(b.entities.first_match("ACME LABS ships").is_some());
        assert!(b.entities.first_match("acme labsx ships").is_none());
    }

    #[test]
    fn bad_regex_names_the_rule() {
        let bad = r#"
[[noise]]
id = "broken"
pattern = "(unclosed"
"#;
        let err = Rulebook::from_toml_str(bad).unwrap_err().to_string();
        assert!(err.contains("broken"), "error should name the rule: {err}");
    }
}
