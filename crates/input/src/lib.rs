//! Input: raw device events queued between frames and folded into a stable
//! per-frame snapshot.
//!
//! # Invariants
//! - Event callbacks only enqueue; state changes happen in `InputTracker::drain`.
//! - Events are applied in arrival order, so a release always wins over
//!   pointer motion queued before it in the same tick.
//! - Missing coordinates never fault; they read as the origin.
//! - The crate is windowing-agnostic: applications map platform key codes
//!   onto `Key`.

pub mod event;
pub mod tracker;

pub use event::{InputEvent, Key, TOUCH_KEY};
pub use tracker::{InputSnapshot, InputTracker};
