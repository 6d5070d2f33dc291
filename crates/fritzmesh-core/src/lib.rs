//! Transformation core of the Fritz!Box mesh topology card.
//!
//! Turns the flat, loosely-shaped payload published by the router
//! integration into a deterministic, ordered render model:
//!
//! - **[`CardConfig`]**: validated, immutable card configuration built from
//!   the raw dashboard map by [`CardConfig::from_raw`].
//! - **[`ChangeDetector`]**: memoization gate keyed on a canonical
//!   serialization of the decoded payload.
//! - **[`TopologyBuilder`]**: master selection, offline filtering, ordering
//!   via [`Sorter`], throughput labels via [`RateAggregator`] and action
//!   targets via [`ActionResolver`].
//! - **[`ResponsiveLayout`]**: container width to [`SizeClass`].
//! - **[`MeshCard`]**: one card instance wiring the above together and
//!   exposing the committed [`CardView`].
//!
//! Everything here is synchronous and single-threaded; each trigger runs to
//! completion before the next one is processed.

pub mod action;
pub mod card;
pub mod change;
pub mod config;
pub mod error;
pub mod format;
pub mod layout;
pub mod model;
pub mod rate;
pub mod sort;
pub mod topology;

// ── Primary re-exports ──────────────────────────────────────────────
pub use action::ActionResolver;
pub use card::{CardEvent, CardView, MeshCard};
pub use change::ChangeDetector;
pub use config::{
    CardConfig, ConfigError, HexColor, NameInfoDisplay, NodeSort, RawConfig, TransferMetricMode,
};
pub use error::CardError;
pub use layout::{ResponsiveLayout, SizeClass};
pub use model::{
    ClientStats, ClientView, EntityState, MacAddress, MasterPanelView, NodeRole, RawClient,
    RawNode, RawPayload, RenderTree, Section, SectionKind,
};
pub use rate::{RateAggregator, Throughput};
pub use sort::Sorter;
pub use topology::TopologyBuilder;
