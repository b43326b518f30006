#![forbid(unsafe_code)]

pub mod portal_cli;
