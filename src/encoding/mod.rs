//! Letter string generation.
//!
//! Turns a [`PixelBuffer`](crate::imaging::PixelBuffer) into a
//! [`LetterString`] using the day's bin mapping.

mod generator;
mod letters;

pub use generator::LetterStringGenerator;
pub use letters::LetterString;
