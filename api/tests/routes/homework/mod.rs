pub mod get_test;
pub mod post_test;
