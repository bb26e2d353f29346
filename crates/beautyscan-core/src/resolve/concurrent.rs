use super::{IngredientRiskResolver, SourceAttempt, SourceOutcome};
use crate::config::ResolverConfig;
use crate::model::DataSource;
use crate::score::{
    IngredientHazardAssessment, ProductScoreAggregator, ProductScoreResult, ResolutionWarning,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Shared cancellation signal for one scoring run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Resolves a product's ingredients through a bounded pool of tasks.
///
/// Collaborator calls run on tokio's blocking pool under a per-call timeout.
/// A call that times out keeps its blocking thread until it returns, but its
/// result is discarded and the ingredient moves on to the next source.
#[derive(Clone)]
pub struct ConcurrentScorer {
    resolver: Arc<IngredientRiskResolver>,
    aggregator: ProductScoreAggregator,
    max_concurrency: usize,
    primary_timeout: Duration,
    fallback_timeout: Duration,
}

enum Pending {
    Skipped(String),
    Running(String, JoinHandle<IngredientHazardAssessment>),
}

impl ConcurrentScorer {
    pub fn new(
        resolver: Arc<IngredientRiskResolver>,
        aggregator: ProductScoreAggregator,
        config: &ResolverConfig,
    ) -> Self {
        Self {
            resolver,
            aggregator,
            max_concurrency: config.max_concurrency.max(1),
            primary_timeout: config.primary_timeout(),
            fallback_timeout: config.fallback_timeout(),
        }
    }

    /// Resolve and score a product. Ingredients not reached before
    /// cancellation count as unresolved.
    pub async fn score_product<S: AsRef<str>>(
        &self,
        ingredient_names: &[S],
        cancel: &CancelToken,
    ) -> ProductScoreResult {
        let assessments = self.resolve_all(ingredient_names, cancel).await;
        self.aggregator.aggregate(assessments)
    }

    /// Resolve every ingredient, at most `max_concurrency` at a time.
    /// The result is in input order.
    pub async fn resolve_all<S: AsRef<str>>(
        &self,
        ingredient_names: &[S],
        cancel: &CancelToken,
    ) -> Vec<IngredientHazardAssessment> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut pending = Vec::with_capacity(ingredient_names.len());

        for name in ingredient_names {
            let name = name.as_ref().to_string();
            if cancel.is_cancelled() {
                pending.push(Pending::Skipped(name));
                continue;
            }

            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                pending.push(Pending::Skipped(name));
                continue;
            };
            // Cancellation may have arrived while waiting for a slot.
            if cancel.is_cancelled() {
                pending.push(Pending::Skipped(name));
                continue;
            }

            let resolver = self.resolver.clone();
            let cancel = cancel.clone();
            let (primary, fallback) = (self.primary_timeout, self.fallback_timeout);
            let task_name = name.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                resolve_one(resolver, &task_name, primary, fallback, &cancel).await
            });
            pending.push(Pending::Running(name, handle));
        }

        let mut assessments = Vec::with_capacity(pending.len());
        for p in pending {
            let assessment = match p {
                Pending::Skipped(name) => {
                    tracing::debug!(ingredient = %name, "skipped after cancellation");
                    IngredientHazardAssessment::unresolved(&name, vec![ResolutionWarning::Cancelled])
                }
                Pending::Running(name, handle) => match handle.await {
                    Ok(assessment) => assessment,
                    Err(e) => {
                        tracing::warn!(ingredient = %name, error = %e, "resolution task failed");
                        IngredientHazardAssessment::unresolved(
                            &name,
                            vec![ResolutionWarning::SourceFailed {
                                source: DataSource::NoData,
                                reason: e.to_string(),
                            }],
                        )
                    }
                },
            };
            assessments.push(assessment);
        }

        assessments
    }
}

async fn resolve_one(
    resolver: Arc<IngredientRiskResolver>,
    ingredient_name: &str,
    primary_timeout: Duration,
    fallback_timeout: Duration,
    cancel: &CancelToken,
) -> IngredientHazardAssessment {
    let mut chain = match resolver.begin(ingredient_name) {
        Ok(chain) => chain,
        Err(unresolved) => return unresolved,
    };

    while let Some(source) = chain.next_source() {
        // Cancellation is checked between sources, never mid-query.
        if source != DataSource::ChemicalDatabase && cancel.is_cancelled() {
            return chain.cancelled();
        }

        let limit = match source {
            DataSource::ChemicalDatabase => primary_timeout,
            _ => fallback_timeout,
        };
        let outcome = {
            let resolver = resolver.clone();
            let query = chain.query().to_string();
            run_blocking(limit, move || resolver.query_source(source, &query)).await
        };
        if let Some(assessment) = chain.record(source, outcome) {
            return assessment;
        }
    }

    chain.finish()
}

/// Run a blocking source query under a time limit. Timeouts and panics
/// become `Failed`.
async fn run_blocking<F>(limit: Duration, query: F) -> SourceOutcome<SourceAttempt>
where
    F: FnOnce() -> SourceOutcome<SourceAttempt> + Send + 'static,
{
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(query)).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) if e.is_panic() => SourceOutcome::Failed {
            reason: "source panicked".into(),
        },
        Ok(Err(e)) => SourceOutcome::Failed {
            reason: e.to_string(),
        },
        Err(_) => SourceOutcome::Failed {
            reason: format!("timed out after {} ms", limit.as_millis()),
        },
    }
}
