//! # kilo-editor — Viewer core for kilo
//!
//! - **[`document`]** — `Document` of raw-byte lines, loaded from a file
//! - **[`viewport`]** — vertical scroll offset that keeps the cursor on screen
//! - **[`render`]** — builds one complete frame into an output buffer
//! - **[`editor`]** — the state object and key dispatch, driven by kilo-term's event loop
//!
//! Read-only: no insertion, deletion, saving, or search.

pub mod document;
pub mod editor;
pub mod render;
pub mod viewport;
