//! HTML Document Tree
//!
//! Arena-backed, read-only node tree with parent/child/sibling links.
//!
//! ## Philosophy (Linus Torvalds Style)
//!
//! - **Good taste**: Data structures first, algorithms follow naturally
//! - **No special cases**: every node has the same five links
//! - **Build once, share freely**: a built `Document` is never mutated
//!
//! ## Core Design
//!
//! ```text
//! HTML text (scraper) ─┐
//! CDP JSON ────────────┼→ DocumentBuilder → Document (arena) → NodeRef
//! Builder calls ───────┘                         ↓
//!                                          NodeId (u32)
//! ```

pub mod arena;
pub mod attr;
pub mod cdp;
pub mod error;
pub mod html;
pub mod serializer;
pub mod types;
pub mod utils;

pub use arena::{Document, DocumentBuilder, NodeRef};
pub use attr::AttrList;
pub use error::{DomError, Result};
pub use serializer::{render_html, PrinterConfig, TreePrinter};
pub use types::*;
