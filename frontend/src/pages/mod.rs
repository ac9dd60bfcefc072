pub mod algorithms;
pub mod audit_logs;
pub mod home;
pub mod lean_pool;
pub mod live_trade;
pub mod themes;
