//! Core types for texsvg
//!
//! This crate holds what the cache and the patcher both need:
//! - [`RenderConfig`], the configuration bundle handed to the backend
//! - [`Renderer`], the seam to the external LaTeX-to-SVG backend
//! - [`Rendering`], a depth plus raw SVG pair
//! - [`Error`] and [`Result`]

pub mod config;
mod error;
pub mod render;

pub use config::RenderConfig;
pub use error::{Error, Result};
pub use render::{Renderer, Rendering};
