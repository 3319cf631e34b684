//! Stateless Classifiers
//!
//! Pure predicates over one snapshot, a pair of counts, or a raw string.
//! None of them fail; they return a classification the audit turns into a
//! verdict.

pub mod focus_visible;
pub mod focusability;
pub mod input_semantics;
pub mod layout;
pub mod menu;
pub mod readability;
pub mod skip_links;
pub mod touch_target;
pub mod viewport;

pub use focus_visible::{focus_signals, has_visible_focus, FocusSignals};
pub use focusability::{FocusabilityTally, TabIndex, Unreachable};
pub use input_semantics::{InputDefect, InputSemantics};
pub use layout::{gesture_support, horizontal_overflow, orientation_passes, GestureSupport};
pub use menu::{MenuCompleteness, MenuDefect};
pub use readability::{ratio_passes, ReadabilityTally, TextSize};
pub use skip_links::{SkipLinkScan, SkipTarget};
pub use touch_target::{meets_minimum, TouchTarget, TouchTargetTally};
pub use viewport::{ViewportPolicy, ZoomRestriction};
