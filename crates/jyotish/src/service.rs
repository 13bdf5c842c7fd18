//! Async front for callers that run on tokio.
//!
//! Chart construction is CPU-bound and may block inside the oracle, so every
//! computation is moved onto the blocking pool.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::compute::{self, BirthParams, ChartOptions, ChartResult};
use crate::ephemeris::Ephemeris;
use crate::error::{JyotishError, Result};
use crate::vedic::koota::{self, CompatibilityResult};
use crate::yoga::{self, engine::sort_by_score, RulesetStore, YogaResult};

#[derive(Clone)]
pub struct AstroService {
    ephemeris: Arc<dyn Ephemeris>,
    rulesets: Arc<RulesetStore>,
    options: Arc<ChartOptions>,
}

fn join_failed(e: tokio::task::JoinError) -> JyotishError {
    JyotishError::Task(e.to_string())
}

impl AstroService {
    pub fn new(
        ephemeris: Arc<dyn Ephemeris>,
        rulesets: RulesetStore,
        options: ChartOptions,
    ) -> Self {
        Self {
            ephemeris,
            rulesets: Arc::new(rulesets),
            options: Arc::new(options),
        }
    }

    pub fn rulesets(&self) -> &RulesetStore {
        &self.rulesets
    }

    pub async fn chart(&self, params: BirthParams) -> Result<ChartResult> {
        let ephemeris = Arc::clone(&self.ephemeris);
        let options = Arc::clone(&self.options);
        tokio::task::spawn_blocking(move || {
            compute::compute_chart(ephemeris.as_ref(), &params, &options)
        })
        .await
        .map_err(join_failed)?
    }

    /// Both Moon charts are computed concurrently.
    pub async fn compatibility(
        &self,
        a: BirthParams,
        b: BirthParams,
    ) -> Result<CompatibilityResult> {
        let eph_a = Arc::clone(&self.ephemeris);
        let eph_b = Arc::clone(&self.ephemeris);
        let task_a = tokio::task::spawn_blocking(move || compute::moon_chart(eph_a.as_ref(), &a));
        let task_b = tokio::task::spawn_blocking(move || compute::moon_chart(eph_b.as_ref(), &b));
        let (chart_a, chart_b) = tokio::try_join!(task_a, task_b).map_err(join_failed)?;
        koota::score(&chart_a?, &chart_b?)
    }

    /// Evaluates every loaded ruleset in parallel. A ruleset whose task fails
    /// is logged and left out; the rest are sorted by descending score, ties
    /// in store order.
    pub async fn yogas(&self, chart: Arc<ChartResult>) -> Vec<YogaResult> {
        let mut tasks = JoinSet::new();
        for index in 0..self.rulesets.len() {
            let rulesets = Arc::clone(&self.rulesets);
            let chart = Arc::clone(&chart);
            tasks.spawn_blocking(move || {
                let ruleset = &rulesets.as_slice()[index];
                (index, yoga::evaluate(ruleset, &chart.yoga_context()))
            });
        }

        let mut collected = Vec::with_capacity(self.rulesets.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => collected.push(result),
                Err(e) => log::warn!("Yoga evaluation task failed: {e}"),
            }
        }
        collected.sort_by_key(|(index, _)| *index);
        let mut results: Vec<YogaResult> = collected.into_iter().map(|(_, r)| r).collect();
        sort_by_score(&mut results);
        results
    }
}
