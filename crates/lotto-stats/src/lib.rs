//! Ball-level lottery statistics.
//!
//! Pure computations over draw results: ball validation, colour bands,
//! and frequency aggregation. No I/O happens in this crate.

pub mod ball;
pub mod frequency;

pub use ball::{BALL_MAX, BALL_MIN, BallColour, BallError, DrawBalls, MAIN_BALL_COUNT};
pub use frequency::{BallFrequency, FREQUENCY_SLOTS, FrequencyTable};
