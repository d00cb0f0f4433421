mod common;
mod generate_tests;
