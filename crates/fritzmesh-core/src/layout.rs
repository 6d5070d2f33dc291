// ── Responsive layout ──
//
// Container width maps onto three discrete size classes. Only boundary
// crossings are reported; the presentation layer never sees raw widths.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantNames};
use tracing::debug;

/// Widths below this are `compact`.
pub const COMPACT_BELOW: f64 = 520.0;
/// Widths below this (and not compact) are `medium`.
pub const MEDIUM_BELOW: f64 = 760.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SizeClass {
    Compact,
    Medium,
    Full,
}

impl SizeClass {
    /// Classify a container width. Non-finite or negative widths count as
    /// zero.
    pub fn for_width(width: f64) -> Self {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        if width < COMPACT_BELOW {
            Self::Compact
        } else if width < MEDIUM_BELOW {
            Self::Medium
        } else {
            Self::Full
        }
    }
}

/// Tracks the current size class of one card instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponsiveLayout {
    current: Option<SizeClass>,
}

impl ResponsiveLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial classification on first attachment. Always reports the class.
    pub fn attach(&mut self, width: f64) -> SizeClass {
        let class = SizeClass::for_width(width);
        debug!(width, size_class = %class, "layout attached");
        self.current = Some(class);
        class
    }

    /// Feed a width observation; `Some` only when the class changed.
    ///
    /// The first observation on an unattached layout behaves like `attach`.
    pub fn observe(&mut self, width: f64) -> Option<SizeClass> {
        let Some(current) = self.current else {
            return Some(self.attach(width));
        };
        let next = SizeClass::for_width(width);
        if next == current {
            return None;
        }
        debug!(width, from = %current, to = %next, "size class changed");
        self.current = Some(next);
        Some(next)
    }

    pub fn current(&self) -> Option<SizeClass> {
        self.current
    }
}
