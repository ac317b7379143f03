//! Selection-lookup overlay for the Glance page script.
//!
//! Watches selection gestures, validates them, looks the text up through
//! the host bridge and manages the single draggable result popup.
//!
//! - [`selection`]: word counting and qualification rules
//! - [`placement`]: edge-aware popup positioning
//! - [`context`]: structural and sentence context around a selection
//! - [`theme`]: light/dark palette from the page background
//! - [`surface`]: the [`PageSurface`] trait the page implements
//! - [`headless`]: an in-memory surface that records what it is told
//! - [`controller`]: the [`PopupController`] state machine

pub mod context;
pub mod controller;
pub mod headless;
pub mod placement;
pub mod popup;
pub mod selection;
pub mod surface;
pub mod theme;

pub use context::{extract_context, AncestorNode, ContextCache, SelectionContext};
pub use controller::{full_definition_url, Completion, PageEvent, PointerTarget, PopupController};
pub use headless::{HeadlessState, HeadlessSurface};
pub use placement::{place, reclamp};
pub use popup::{PopupPhase, PopupSession};
pub use selection::{validate_selection, word_count, Gesture, SelectionError};
pub use surface::{
    LanguageOption, LanguageSelector, ListenerHandle, PageSurface, PopupContent, PopupListener,
    PopupMount, PopupView,
};
pub use theme::{ColorScheme, Palette};
