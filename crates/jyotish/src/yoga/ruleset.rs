//! Ruleset documents and the on-disk store they are loaded from.
//!
//! A ruleset is either weighted (signals + weights + `strong_if` /
//! `active_if` expressions) or conjunctive (a `conditions` list). Everything
//! is validated on load so evaluation cannot fail later.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{JyotishError, Result};
use crate::yoga::conditions::Condition;
use crate::yoga::expr::Expr;
use crate::yoga::predicates::Predicate;

#[derive(Debug, Deserialize)]
struct RulesetJson {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    signals: Vec<SignalJson>,
    #[serde(default)]
    weights: BTreeMap<String, f64>,
    #[serde(default)]
    strong_if: Option<String>,
    #[serde(default)]
    active_if: Option<String>,
    #[serde(default)]
    conditions: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SignalJson {
    id: String,
    predicate: String,
    #[serde(default)]
    params: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub id: String,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRules {
    pub signals: Vec<Signal>,
    /// Weights for ids that match no signal still count toward the total.
    pub weights: BTreeMap<String, f64>,
    pub strong_if: Option<Expr>,
    pub active_if: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dialect {
    Weighted(WeightedRules),
    Conditions(Vec<Condition>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ruleset {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub dialect: Dialect,
}

fn malformed(id: &str, message: impl Into<String>) -> JyotishError {
    JyotishError::MalformedRuleset {
        id: id.to_string(),
        message: message.into(),
    }
}

fn parse_expression(id: &str, field: &str, source: Option<String>) -> Result<Option<Expr>> {
    match source {
        Some(text) if !text.trim().is_empty() => Expr::parse(&text)
            .map(Some)
            .map_err(|e| malformed(id, format!("{field}: {e}"))),
        _ => Ok(None),
    }
}

impl Ruleset {
    /// Parses a ruleset document. `fallback_id` names it when the document
    /// carries no `id` of its own.
    pub fn from_json(json: &str, fallback_id: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| malformed(fallback_id, e.to_string()))?;
        Self::from_value(value, fallback_id)
    }

    pub fn from_value(value: serde_json::Value, fallback_id: &str) -> Result<Self> {
        if !value.is_object() {
            return Err(malformed(fallback_id, "ruleset must be an object"));
        }
        let raw: RulesetJson =
            serde_json::from_value(value).map_err(|e| malformed(fallback_id, e.to_string()))?;
        let id = raw
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| fallback_id.to_string());

        let dialect = if raw.signals.is_empty() && !raw.conditions.is_empty() {
            let conditions = raw
                .conditions
                .into_iter()
                .enumerate()
                .map(|(i, c)| {
                    Condition::from_value(c)
                        .map_err(|e| malformed(&id, format!("conditions[{i}]: {e}")))
                })
                .collect::<Result<Vec<_>>>()?;
            Dialect::Conditions(conditions)
        } else {
            let mut signals = Vec::with_capacity(raw.signals.len());
            for signal in raw.signals {
                if signals.iter().any(|s: &Signal| s.id == signal.id) {
                    return Err(malformed(&id, format!("duplicate signal id '{}'", signal.id)));
                }
                let predicate = Predicate::from_parts(&signal.predicate, signal.params)
                    .map_err(|e| malformed(&id, format!("signal '{}': {e}", signal.id)))?;
                signals.push(Signal {
                    id: signal.id,
                    predicate,
                });
            }
            let strong_if = parse_expression(&id, "strong_if", raw.strong_if)?;
            let active_if = parse_expression(&id, "active_if", raw.active_if)?;
            for expr in strong_if.iter().chain(active_if.iter()) {
                if let Some(unknown) = expr
                    .signals()
                    .into_iter()
                    .find(|name| !signals.iter().any(|s| s.id == *name))
                {
                    return Err(malformed(
                        &id,
                        format!("expression references unknown signal '{unknown}'"),
                    ));
                }
            }
            if let Some((key, weight)) =
                raw.weights.iter().find(|(_, w)| !w.is_finite() || **w < 0.0)
            {
                return Err(malformed(
                    &id,
                    format!("weight for '{key}' must be a non-negative number, got {weight}"),
                ));
            }
            Dialect::Weighted(WeightedRules {
                signals,
                weights: raw.weights,
                strong_if,
                active_if,
            })
        };

        Ok(Ruleset {
            name: raw.name.unwrap_or_else(|| id.clone()),
            id,
            description: raw.description,
            dialect,
        })
    }
}

/// Rulesets loaded from a directory of `*.json` files, in file-name order.
#[derive(Debug, Clone, Default)]
pub struct RulesetStore {
    rulesets: Vec<Ruleset>,
}

impl RulesetStore {
    pub fn new(rulesets: Vec<Ruleset>) -> Self {
        Self { rulesets }
    }

    /// Loads every `*.json` file under `dir`. Files that fail to parse are
    /// logged and skipped; a missing directory yields an empty store.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            log::warn!("Ruleset directory {} not found; no yogas loaded", dir.display());
            return Ok(Self::default());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut rulesets = Vec::with_capacity(paths.len());
        let mut skipped = 0usize;
        for path in paths {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            let loaded = fs::read_to_string(&path)
                .map_err(JyotishError::from)
                .and_then(|json| Ruleset::from_json(&json, &stem));
            match loaded {
                Ok(ruleset) => rulesets.push(ruleset),
                Err(e) => {
                    skipped += 1;
                    log::warn!("Skipping ruleset {}: {}", path.display(), e);
                }
            }
        }

        log::info!(
            "Loaded {} yoga rulesets from {} ({} skipped)",
            rulesets.len(),
            dir.display(),
            skipped
        );
        Ok(Self { rulesets })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ruleset> {
        self.rulesets.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Ruleset> {
        self.rulesets.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rulesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rulesets.is_empty()
    }

    pub fn as_slice(&self) -> &[Ruleset] {
        &self.rulesets
    }
}

impl<'a> IntoIterator for &'a RulesetStore {
    type Item = &'a Ruleset;
    type IntoIter = std::slice::Iter<'a, Ruleset>;

    fn into_iter(self) -> Self::IntoIter {
        self.rulesets.iter()
    }
}
