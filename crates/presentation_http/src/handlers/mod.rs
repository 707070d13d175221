//! HTTP request handlers

pub mod health;
pub mod readings;
pub mod webhook;
