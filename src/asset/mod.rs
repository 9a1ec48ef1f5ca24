//! Post-processing of generated assets.

pub mod minify;
