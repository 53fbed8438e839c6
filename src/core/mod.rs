pub mod app;
pub mod config;
pub mod conversation;
pub mod gateway;
pub mod keyring;
pub mod message;
pub mod session;
