pub mod gemini;
pub mod grading;
pub mod sweep;
pub mod weak_concepts;
