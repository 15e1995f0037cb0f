pub mod attendance_code;
pub mod attendance_event;
pub mod class;
pub mod grading_result;
pub mod homework_image;
pub mod homework_submission;
pub mod user;
pub mod weak_concept_cache;

pub use attendance_code::Entity as AttendanceCode;
pub use attendance_event::Entity as AttendanceEvent;
pub use class::Entity as Class;
pub use grading_result::Entity as GradingResult;
pub use homework_image::Entity as HomeworkImage;
pub use homework_submission::Entity as HomeworkSubmission;
pub use user::Entity as User;
pub use weak_concept_cache::Entity as WeakConceptCache;
