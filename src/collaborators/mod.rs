//! # Collaborator interfaces
//!
//! Raster export, the parameter loader, console log format, vector/colour
//! arithmetic, and the PRNG choice are carved out of the core engine as
//! external collaborators, consumed through narrow interfaces. The
//! parameter loader lives in [`crate::config`] and the vector/colour
//! arithmetic in [`crate::vector`]; this module holds the remaining three:
//! a seeded random source, a PPM frame sink, and a monotonic clock.

pub mod clock;
pub mod frame_sink;
pub mod random;

pub use clock::{Clock, SystemClock};
pub use frame_sink::{Colour, FrameSink, PpmFrameSink};
pub use random::{RandomSource, SeededRandom};
