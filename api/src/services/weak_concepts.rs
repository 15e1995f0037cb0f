//! Weak-concept aggregation over a student's grading history.
//!
//! The summary counts how often each improvement suggestion recurs across
//! graded submissions, keeps the most frequent few, and caches the result
//! until the next grading result invalidates it.

use chrono::{DateTime, Utc};
use db::models::{grading_result, weak_concept_cache};
use sea_orm::{DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of concepts kept in a summary.
pub const WEAK_CONCEPT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeakConcept {
    pub concept: String,
    pub occurrences: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeakConceptReport {
    pub student_id: i64,
    pub concepts: Vec<WeakConcept>,
    pub computed_at: DateTime<Utc>,
    /// Whether this report came from the cache rather than a fresh pass.
    pub cached: bool,
}

/// Returns the cached summary, or recomputes and caches it on a miss.
///
/// An empty grading history yields an empty (but still cached) summary.
pub async fn get_or_compute(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<WeakConceptReport, DbErr> {
    if let Some(row) = weak_concept_cache::Model::get(db, student_id).await? {
        let concepts: Vec<WeakConcept> = serde_json::from_str(&row.concepts).unwrap_or_default();
        return Ok(WeakConceptReport {
            student_id,
            concepts,
            computed_at: row.computed_at,
            cached: true,
        });
    }

    let history = grading_result::Model::history_for_student(db, student_id).await?;
    let history_latest = history.last().map(|r| r.graded_at);
    let concepts = aggregate(&history);
    let computed_at = Utc::now();
    store_summary(db, student_id, &concepts, computed_at, history_latest).await?;

    tracing::debug!(student_id, count = concepts.len(), "weak concepts recomputed");
    Ok(WeakConceptReport {
        student_id,
        concepts,
        computed_at,
        cached: false,
    })
}

/// Persists a computed summary, unless the grading history moved while it
/// was being computed.
///
/// A dispatch can commit a new result (and delete the cache row) between
/// the history read and the write here; the written entry would then be
/// stale and its invalidation lost. `history_latest` is the newest
/// `graded_at` the computation saw: if the history has a newer one by the
/// time the entry is written, the entry is dropped again so the next read
/// recomputes. A dispatch landing after the re-check deletes the row
/// itself. Returns whether the entry was kept.
pub async fn store_summary(
    db: &DatabaseConnection,
    student_id: i64,
    concepts: &[WeakConcept],
    computed_at: DateTime<Utc>,
    history_latest: Option<DateTime<Utc>>,
) -> Result<bool, DbErr> {
    let json = serde_json::to_string(concepts).map_err(|e| DbErr::Custom(e.to_string()))?;
    weak_concept_cache::Model::put(db, student_id, json, computed_at).await?;

    let newest = grading_result::Model::latest_graded_at(db, student_id).await?;
    if newest != history_latest {
        weak_concept_cache::Model::invalidate(db, student_id).await?;
        tracing::debug!(student_id, "grading history moved during recompute; summary dropped");
        return Ok(false);
    }
    Ok(true)
}

pub async fn invalidate(db: &DatabaseConnection, student_id: i64) -> Result<(), DbErr> {
    weak_concept_cache::Model::invalidate(db, student_id).await
}

/// Counts suggestion terms across the history. Deterministic: ordered by
/// occurrence count descending, ties broken alphabetically.
fn aggregate(history: &[grading_result::Model]) -> Vec<WeakConcept> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for result in history {
        for term in result.suggestions_list() {
            let term = term.trim().to_string();
            if term.is_empty() {
                continue;
            }
            *counts.entry(term).or_insert(0) += 1;
        }
    }

    let mut concepts: Vec<WeakConcept> = counts
        .into_iter()
        .map(|(concept, occurrences)| WeakConcept {
            concept,
            occurrences,
        })
        .collect();
    concepts.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| a.concept.cmp(&b.concept))
    });
    concepts.truncate(WEAK_CONCEPT_LIMIT);
    concepts
}
