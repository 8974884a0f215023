//! InkGraph Core Library
//!
//! Platform-agnostic geometric and relational engine for the InkGraph
//! diagram editor: elements, bindings, containers, transforms, hit-testing
//! and undo history. Rendering, text metrics and input handling belong to
//! the host.

pub mod binding;
pub mod clipboard;
pub mod config;
pub mod container;
pub mod document;
pub mod elements;
pub mod geometry;
pub mod hit_test;
pub mod history;
pub mod measure;
pub mod scene;
pub mod selection;
pub mod session;
pub mod transform;
pub mod viewport;

pub use config::{ConfigError, EngineConfig};
pub use document::{DocumentError, DocumentFile, ViewState, load_document, save_document};
pub use elements::{
    Arrow, ArrowBinding, Element, ElementBase, ElementId, ElementOptions, ElementType, ElementUpdate,
    Shape, ShapeKind, Text, TextBinding, TextPosition, create_element,
};
pub use hit_test::{HitOptions, hit_test, topmost_element_at};
pub use history::History;
pub use measure::{FallbackMeasurer, TextMeasurer};
pub use scene::Scene;
pub use selection::SelectionMode;
pub use session::Session;
pub use transform::{Handle, HandleKind, ResizeHandle};
pub use viewport::{RenderSurface, Viewport};
