//! Text transforms applied around the model call.
//!
//! - [`normalize`]: abbreviation expansion on user input
//! - [`sanitize`]: cleanup of raw model output

pub mod normalize;
pub mod sanitize;
