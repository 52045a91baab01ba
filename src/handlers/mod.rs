// src/handlers/mod.rs

pub mod article;
pub mod auth;
pub mod interaction;
pub mod profile;
