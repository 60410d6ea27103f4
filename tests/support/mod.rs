#![allow(dead_code)]

pub mod dirpane_env;
pub mod view_log;
