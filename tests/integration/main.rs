mod common;
mod http_tests;
mod login_tests;
