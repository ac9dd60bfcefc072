pub mod algorithms;
pub mod api;
pub mod audit;
pub mod autosave;
pub mod browser;
pub mod config;
pub mod forms;
pub mod i18n;
pub mod models;
pub mod pagination;
pub mod pool;
pub mod server;
pub mod themes;
