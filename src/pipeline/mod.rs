//! Pipeline stages for HTML-to-PDF conversion.
//!
//! ```text
//! input ──▶ render ──▶ publish
//! (check)   (external   (verify + rename,
//!            program)    see crate::convert)
//! ```
//!
//! 1. [`input`]  — confirm the HTML file exists and is readable
//! 2. [`render`] — pick a renderer and run it against a staging file

pub mod input;
pub mod render;
