pub mod post_test;
pub mod put_test;
