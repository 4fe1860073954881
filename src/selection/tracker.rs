//! Selection lifecycle state machine
//!
//! Holds the one transient [`TextSelection`] between a pointer release
//! and whatever clears it. Clearing triggers: Escape with no input
//! focused, a pointer press starting a new drag on a page surface, a
//! pointer press outside the viewing region, or a pointer press anywhere
//! but the tooltip. Pressing the tooltip preserves the selection so the
//! attach action can consume it first.

use crate::annotations::Highlight;

use super::capture::{capture, TextSelection};
use super::source::SelectionSource;

/// What a pointer press landed on, as classified by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Inside a page surface; the press may start a new drag.
    PageSurface,
    /// On the selection tooltip itself.
    Tooltip,
    /// Outside the document-viewing region entirely.
    Outside,
}

/// Tracks the live selection across input events.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    current: Option<TextSelection>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live selection, if any.
    pub fn selection(&self) -> Option<&TextSelection> {
        self.current.as_ref()
    }

    /// Pointer released over the surface: read the platform selection and
    /// either capture it or clear.
    ///
    /// On a successful capture the platform's native highlight is dropped
    /// immediately, so the computed overlay is the only visible one.
    pub fn pointer_released<S: SelectionSource>(&mut self, source: &mut S) -> Option<&TextSelection> {
        self.current = source.current_selection().as_ref().and_then(capture);
        if self.current.is_some() {
            source.clear_native_selection();
        }
        self.current.as_ref()
    }

    /// Pointer pressed somewhere. Clears the selection unless the press
    /// landed on the tooltip; the tooltip's action handler must be able
    /// to consume the selection before any clearing would apply.
    pub fn pointer_pressed(&mut self, target: PointerTarget) {
        if target != PointerTarget::Tooltip {
            self.current = None;
        }
    }

    /// Escape clears the selection, unless an input field has focus (the
    /// key then belongs to the field).
    pub fn escape_pressed(&mut self, input_focused: bool) {
        if !input_focused {
            self.current = None;
        }
    }

    /// Consume the live selection as a durable highlight anchor. Clears
    /// the transient state in the same step.
    pub fn take_for_annotation(&mut self) -> Option<Highlight> {
        self.current.take().map(|selection| Highlight {
            page: selection.page,
            text: selection.text,
            rects: selection.rects,
        })
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
