//! Selection capture
//!
//! Turns the platform's raw, device-pixel selection geometry into
//! normalized page-relative selections, and manages the transient
//! selection lifecycle against pointer and keyboard events.

mod capture;
mod source;
mod tracker;

pub use capture::{capture, TextSelection, TooltipAnchor};
pub use source::{RawSelection, SelectionSource};
pub use tracker::{PointerTarget, SelectionTracker};
