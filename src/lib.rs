pub mod components;
pub mod config;
pub mod error;
pub mod session;
pub mod web;
