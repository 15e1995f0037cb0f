pub mod attendance;
pub mod homework;
