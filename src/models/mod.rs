// src/models/mod.rs

pub mod article;
pub mod profile;
pub mod user;
