pub mod app_settings;
pub mod app_state;
pub mod auth;
pub mod detail;
pub mod favorites;
pub mod messages;
pub mod network;
pub mod persistence;
pub mod sports;
pub mod storage;
pub mod theme;
