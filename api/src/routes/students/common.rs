use serde::Serialize;

use crate::services::weak_concepts::{WeakConcept, WeakConceptReport};

#[derive(Serialize, Default)]
pub struct WeakConceptsResponse {
    pub student_id: i64,
    pub concepts: Vec<WeakConcept>,
    pub computed_at: String,
    pub cached: bool,
}

impl From<WeakConceptReport> for WeakConceptsResponse {
    fn from(report: WeakConceptReport) -> Self {
        Self {
            student_id: report.student_id,
            concepts: report.concepts,
            computed_at: report.computed_at.to_rfc3339(),
            cached: report.cached,
        }
    }
}
