//! Desktop client for a personalized workout and nutrition recommendation service.
//!
//! The window collects a fitness profile, posts it to the service and shows the
//! returned workout and nutrition cards.

pub mod app;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod models;
pub mod report;
pub mod session;
