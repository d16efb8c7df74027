//! Fable generator service - turns a story premise into an illustrated fable
//!
//! A text model writes the fable, its moral and one illustration prompt per
//! scene; an image model then draws the scenes in order, each one using the
//! previous illustration as a style reference.

pub mod ai;
pub mod app;
pub mod config;
pub mod error;
pub mod fable;
pub mod illustrate;
pub mod image;
pub mod models;
pub mod prompts;
pub mod server;

pub use error::{Error, Result};
