#![allow(dead_code)]

pub mod factories;
pub mod fake_client;
pub mod helpers;
