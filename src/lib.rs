pub mod anilist;
pub mod app;
pub mod catalog;
pub mod config;
pub mod display;
pub mod i18n;
pub mod models;
pub mod snapshot;
