//! First-success evaluation of candidate queries.
//!
//! Bot deployments keep the same logical data under different table and
//! column names. Each read is described as an ordered list of
//! [`CandidateQuery`] shapes; the router runs them in order and stops at the
//! first one the database accepts. A shape that errors (unknown relation,
//! unknown column, type mismatch) is abandoned immediately for the next.

use std::future::Future;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::value_objects::candidate_query::CandidateQuery;

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateHit<T> {
    pub label: &'static str,
    /// 1-based position of the winning candidate.
    pub attempt: usize,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
    pub label: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("all {} candidate queries failed for `{operation}`", failures.len())]
pub struct AllCandidatesFailed {
    pub operation: &'static str,
    pub failures: Vec<CandidateFailure>,
}

pub async fn first_success<'a, T, F, Fut>(
    operation: &'static str,
    candidates: &'a [CandidateQuery],
    mut run: F,
) -> Result<CandidateHit<T>, AllCandidatesFailed>
where
    F: FnMut(&'a CandidateQuery) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut failures = Vec::with_capacity(candidates.len());

    for (index, candidate) in candidates.iter().enumerate() {
        match run(candidate).await {
            Ok(value) => {
                debug!(
                    operation,
                    candidate = candidate.label,
                    attempt = index + 1,
                    "query_router: candidate succeeded"
                );
                return Ok(CandidateHit {
                    label: candidate.label,
                    attempt: index + 1,
                    value,
                });
            }
            Err(err) => {
                debug!(
                    operation,
                    candidate = candidate.label,
                    attempt = index + 1,
                    error = %err,
                    "query_router: candidate failed, trying next"
                );
                failures.push(CandidateFailure {
                    label: candidate.label,
                    error: err.to_string(),
                });
            }
        }
    }

    warn!(
        operation,
        attempted = failures.len(),
        "query_router: every candidate failed"
    );

    Err(AllCandidatesFailed {
        operation,
        failures,
    })
}

/// Collapses exhaustion into the empty value for lookups whose absence is
/// not meaningful (device lists, histories, totals).
pub fn or_default<T: Default>(result: Result<CandidateHit<T>, AllCandidatesFailed>) -> T {
    match result {
        Ok(hit) => hit.value,
        Err(_) => T::default(),
    }
}
