use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::yoga::conditions::Condition;
use crate::yoga::context::YogaContext;
use crate::yoga::expr::Expr;
use crate::yoga::ruleset::{Dialect, Ruleset, WeightedRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum YogaStatus {
    Inactive,
    Active,
    Strong,
}

/// One evaluated check, kept for explaining a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub key: String,
    pub check: serde_json::Value,
    pub result: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YogaResult {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 0-100, one decimal
    pub score: f64,
    pub status: YogaStatus,
    pub is_strong: bool,
    pub is_active: bool,
    /// Weighted dialect only
    pub signal_results: BTreeMap<String, bool>,
    pub trace: Vec<TraceEntry>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}

fn describe<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

pub fn evaluate(ruleset: &Ruleset, ctx: &YogaContext<'_>) -> YogaResult {
    let (score, status, signal_results, trace) = match &ruleset.dialect {
        Dialect::Weighted(rules) => evaluate_weighted(rules, ctx),
        Dialect::Conditions(conditions) => evaluate_conditions(conditions, ctx),
    };
    log::debug!("Yoga {} scored {} ({:?})", ruleset.id, score, status);
    YogaResult {
        id: ruleset.id.clone(),
        name: ruleset.name.clone(),
        description: ruleset.description.clone(),
        score,
        status,
        is_strong: status == YogaStatus::Strong,
        is_active: status >= YogaStatus::Active,
        signal_results,
        trace,
    }
}

type Outcome = (f64, YogaStatus, BTreeMap<String, bool>, Vec<TraceEntry>);

fn evaluate_weighted(rules: &WeightedRules, ctx: &YogaContext<'_>) -> Outcome {
    let mut signal_results = BTreeMap::new();
    let mut trace = Vec::with_capacity(rules.signals.len());
    for signal in &rules.signals {
        let result = signal.predicate.evaluate(ctx);
        signal_results.insert(signal.id.clone(), result);
        trace.push(TraceEntry {
            key: signal.id.clone(),
            check: describe(&signal.predicate),
            result,
        });
    }

    // Folded from +0.0: an empty f64 sum is -0.0
    let total = rules.weights.values().fold(0.0, |acc, w| acc + w);
    let earned = rules
        .weights
        .iter()
        .filter(|(id, _)| signal_results.get(id.as_str()).copied().unwrap_or(false))
        .fold(0.0, |acc, (_, weight)| acc + weight);
    let score = if total > 0.0 {
        round1(earned / total * 100.0)
    } else {
        0.0
    };

    let lookup = |id: &str| signal_results.get(id).copied();
    let holds = |expr: &Option<Expr>| {
        expr.as_ref().is_some_and(|e| e.eval(&lookup))
    };
    let status = if holds(&rules.strong_if) {
        YogaStatus::Strong
    } else if holds(&rules.active_if) {
        YogaStatus::Active
    } else {
        YogaStatus::Inactive
    };
    (score, status, signal_results, trace)
}

fn evaluate_conditions(conditions: &[Condition], ctx: &YogaContext<'_>) -> Outcome {
    let mut trace = Vec::with_capacity(conditions.len());
    let mut all = true;
    for (i, condition) in conditions.iter().enumerate() {
        let result = condition.evaluate(ctx);
        all &= result;
        trace.push(TraceEntry {
            key: format!("conditions[{i}]"),
            check: describe(condition),
            result,
        });
    }
    let (score, status) = if all {
        (100.0, YogaStatus::Active)
    } else {
        (0.0, YogaStatus::Inactive)
    };
    (score, status, BTreeMap::new(), trace)
}

/// Evaluates each ruleset and orders the results by descending score.
/// Ties keep the input order.
pub fn evaluate_all<'r, I>(rulesets: I, ctx: &YogaContext<'_>) -> Vec<YogaResult>
where
    I: IntoIterator<Item = &'r Ruleset>,
{
    let mut results: Vec<YogaResult> = rulesets.into_iter().map(|r| evaluate(r, ctx)).collect();
    sort_by_score(&mut results);
    results
}

pub fn sort_by_score(results: &mut [YogaResult]) {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
