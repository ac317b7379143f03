//! The page the overlay draws on.
//!
//! [`PageSurface`] is everything the controller needs from the page
//! environment: reading the selection, measuring, mounting and updating the
//! popup, banners and a few side effects. Rendering technology stays behind
//! this trait.

use std::any::Any;

use glance_common::{Banner, Point, RenderError, SessionToken, Size};
use glance_config::{LangCode, LanguageCatalog};

use crate::context::AncestorNode;
use crate::theme::Palette;

pub type Result<T> = std::result::Result<T, RenderError>;

// ---------------------------------------------------------------------------
// Popup view model
// ---------------------------------------------------------------------------

/// Main content area of the popup.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupContent {
    /// Placeholder while a request is in flight.
    Pending(String),
    Definition {
        definition: String,
        synonyms: Vec<String>,
        examples: Vec<String>,
    },
    /// Inline failure message.
    Error(String),
}

impl PopupContent {
    pub fn analyzing() -> Self {
        Self::Pending("Analyzing text...".into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOption {
    pub code: LangCode,
    pub label: String,
}

/// Options and current value of the popup's language selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSelector {
    pub options: Vec<LanguageOption>,
    pub selected: LangCode,
}

impl LanguageSelector {
    /// One option per catalog entry. The `original` language is labelled
    /// "Original (<name>)", every other one "Translate to <name>".
    pub fn build(catalog: &LanguageCatalog, original: Option<&str>, selected: &str) -> Self {
        let options = catalog
            .iter()
            .map(|entry| {
                let label = if original == Some(entry.code.as_str()) {
                    format!("Original ({})", entry.name)
                } else {
                    format!("Translate to {}", entry.name)
                };
                LanguageOption {
                    code: entry.code.clone(),
                    label,
                }
            })
            .collect();
        Self {
            options,
            selected: selected.to_string(),
        }
    }
}

/// Everything needed to mount a fresh popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub token: SessionToken,
    pub selected_text: String,
    pub content: PopupContent,
    pub palette: Palette,
    pub languages: LanguageSelector,
}

/// What the surface reports back after mounting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PopupMount {
    /// Measured size, if the surface could lay the popup out.
    pub size: Option<Size>,
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// Page-level listeners a popup needs while it is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupListener {
    PointerMove,
    PointerUp,
    OutsideClick,
    Resize,
}

impl PopupListener {
    pub const ALL: [PopupListener; 4] = [
        Self::PointerMove,
        Self::PointerUp,
        Self::OutsideClick,
        Self::Resize,
    ];
}

/// Keeps a set of page listeners registered. Dropping the handle
/// unregisters them.
pub struct ListenerHandle {
    _inner: Box<dyn Any + Send>,
}

impl ListenerHandle {
    pub fn new(inner: impl Any + Send + 'static) -> Self {
        Self {
            _inner: Box::new(inner),
        }
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

pub trait PageSurface: Send {
    /// Current selection text, untrimmed.
    fn selection_text(&self) -> String;
    /// Ancestors of the selection range, innermost first; `None` when
    /// there is no range.
    fn selection_ancestry(&self) -> Option<Vec<AncestorNode>>;
    fn clear_selection(&mut self);

    fn viewport(&self) -> Size;
    /// Computed `background-color` of the page body.
    fn background_color(&self) -> Option<String>;
    fn page_url(&self) -> String;
    fn page_title(&self) -> String;

    /// Insert the popup, still invisible.
    fn mount_popup(&mut self, view: &PopupView) -> Result<PopupMount>;
    fn set_position(&mut self, position: Point);
    /// Drag translation relative to the placed position.
    fn set_translation(&mut self, offset: Point);
    fn fade_in(&mut self);
    fn set_content(&mut self, content: &PopupContent);
    fn set_languages(&mut self, selector: &LanguageSelector);
    fn set_language(&mut self, code: &str);
    fn set_detected_language(&mut self, code: Option<&str>);
    fn remove_popup(&mut self);
    fn listen(&mut self, listeners: &[PopupListener]) -> Result<ListenerHandle>;

    fn show_banner(&mut self, banner: &Banner);
    fn open_url(&mut self, url: &str);
    fn speak(&mut self, text: &str);
}
