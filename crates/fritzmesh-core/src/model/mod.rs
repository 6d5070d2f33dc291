// ── Domain model ──
//
// Raw payload types (untrusted input) and the render tree (derived output).

pub mod identity;
mod lenient;
pub mod payload;
pub mod render;

pub use identity::{InvalidMac, MacAddress};
pub use payload::{EntityState, NodeRole, RawClient, RawNode, RawPayload};
pub use render::{ClientStats, ClientView, MasterPanelView, RenderTree, Section, SectionKind};
