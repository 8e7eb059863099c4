#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod selection;
pub mod traits;
pub mod types;
