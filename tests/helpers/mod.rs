#![allow(unused_imports, dead_code)]
pub mod test_db;
pub mod user_helpers;

pub use test_db::*;
pub use user_helpers::*;
