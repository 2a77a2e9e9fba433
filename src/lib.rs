//! # knitgrid - Pixel and Knitting Pattern Grid Editor
//!
//! knitgrid is the engine behind a browser grid editor: users paint colored
//! cells on an infinite sparse canvas (or a fixed `cols × rows` grid), pan
//! and zoom the view, and keep named projects in a small file-backed store.
//! It provides:
//!
//! - **Geometry**: pixel ↔ cell mapping under pan and zoom
//! - **Cell stores**: sparse and fixed grids with square brush stamping
//! - **Rendering**: viewport rasterization to PNG
//! - **Export**: numbered A4 PDF charts
//! - **Projects**: JSON documents on disk behind an HTTP API
//!
//! ## Quick Start
//!
//! ```
//! use knitgrid::{
//!     editor::{EditorState, Event, PointerButton},
//!     export::pdf,
//!     viewport::ViewportSize,
//! };
//!
//! let mut editor = EditorState::new();
//! editor.handle(Event::Resize(ViewportSize::new(400.0, 300.0)));
//! editor.handle(Event::SetColor("#aa3355".into()));
//! editor.handle(Event::SetBrush(2));
//!
//! // Paint a short stroke
//! editor.handle(Event::PointerDown { button: PointerButton::Primary, x: 10.0, y: 10.0 });
//! editor.handle(Event::PointerMove { x: 50.0, y: 10.0 });
//! editor.handle(Event::PointerUp);
//!
//! // Show everything and rasterize the view
//! editor.handle(Event::FitToContent);
//! let view = editor.render();
//! assert_eq!(view.dimensions(), (400, 300));
//!
//! // Printable chart
//! let chart = pdf::export_pdf(editor.grid(), editor.project_name())?;
//! assert!(chart.bytes.starts_with(b"%PDF"));
//! # Ok::<(), knitgrid::KnitError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`geometry`] | Coordinate mapping |
//! | [`grid`] | Sparse and fixed cell stores, legacy upgrade |
//! | [`viewport`] | Pan, zoom, fit to content |
//! | [`editor`] | Event-driven editor state |
//! | [`render`] | Canvas rasterization |
//! | [`export`] | PDF charts |
//! | [`project`] | Persisted document shape |
//! | [`store`] | File-backed project CRUD |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod color;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod project;
pub mod render;
pub mod server;
pub mod store;
pub mod viewport;

// Re-exports for convenience
pub use error::KnitError;
pub use grid::{CellStore, FixedGrid, Grid, SparseGrid};
pub use project::ProjectDocument;
pub use store::ProjectStore;
