#![allow(dead_code, unused_imports)]

pub mod app;

pub use app::{body_json, get_request, json_request, make_test_app};
