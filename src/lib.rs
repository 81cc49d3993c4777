pub mod banner;
pub mod commands;
pub mod config;
pub mod consts;
pub mod controller;
pub mod interpreter;
pub mod spinner;
pub mod ui;
