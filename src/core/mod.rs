// src/core/mod.rs
pub mod html;
