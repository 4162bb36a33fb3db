pub mod app;
pub mod catalog;
pub mod config;
pub mod coord;
pub mod fs_utils;
pub mod geotag;
pub mod picker;
pub mod presenter;
pub mod selection;
pub mod session;
pub mod ui;
