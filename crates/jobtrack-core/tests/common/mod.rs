#![allow(dead_code)]

pub mod fakes;
pub mod status_server;
