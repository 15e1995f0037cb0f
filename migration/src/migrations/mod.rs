pub mod m202608200001_create_users;
pub mod m202608200002_create_classes;
pub mod m202608200003_create_attendance_codes;
pub mod m202608200004_create_attendance_events;
pub mod m202608200005_create_homework_submissions;
pub mod m202608200006_create_grading_results;
pub mod m202608200007_create_weak_concept_cache;
