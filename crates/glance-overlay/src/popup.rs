//! State of the one popup that may be open.

use glance_common::{Point, SessionToken, Size};
use glance_config::{LangCode, DEFAULT_LANGUAGE};

use crate::surface::ListenerHandle;

/// Lifecycle of an open popup. No session at all is the idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupPhase {
    /// Mounted but not yet placed.
    Creating,
    Positioned,
    /// Following the pointer after a press on the header.
    Dragging,
    /// Being torn down; never observed outside the close path.
    Closing,
}

#[derive(Debug)]
pub struct PopupSession {
    pub token: SessionToken,
    pub phase: PopupPhase,
    pub anchor: Point,
    pub selected_text: String,
    /// Context string sent with the lookup; reused for translations.
    pub context: String,

    /// Placed top-left position.
    pub position: Point,
    pub size: Size,
    /// Accumulated drag translation.
    pub drag_offset: Point,
    /// Pointer position minus `drag_offset` at drag start.
    drag_origin: Option<Point>,

    /// Language of the text currently shown, once a translation succeeded.
    pub current_language: Option<LangCode>,
    pub detected_language: Option<LangCode>,
    pub source_language: Option<LangCode>,
    /// Value shown in the language selector.
    pub selected_language: LangCode,
    /// Definition from the lookup; `None` until the lookup reply is applied.
    pub original_definition: Option<String>,
    pub synonyms: Vec<String>,
    pub examples: Vec<String>,
    /// Sequence number of the latest translation request.
    pub translation_seq: u64,

    listeners: Option<ListenerHandle>,
}

impl PopupSession {
    pub fn new(token: SessionToken, anchor: Point, selected_text: impl Into<String>) -> Self {
        Self {
            token,
            phase: PopupPhase::Creating,
            anchor,
            selected_text: selected_text.into(),
            context: String::new(),
            position: anchor,
            size: Size::default(),
            drag_offset: Point::default(),
            drag_origin: None,
            current_language: None,
            detected_language: None,
            source_language: None,
            selected_language: DEFAULT_LANGUAGE.to_string(),
            original_definition: None,
            synonyms: Vec::new(),
            examples: Vec::new(),
            translation_seq: 0,
            listeners: None,
        }
    }

    /// Finish creation: record placement and the listener scope.
    pub fn positioned(&mut self, position: Point, size: Size, listeners: ListenerHandle) {
        self.position = position;
        self.size = size;
        self.listeners = Some(listeners);
        self.phase = PopupPhase::Positioned;
    }

    /// Top-left corner as the user sees it, including drag translation.
    pub fn visual_position(&self) -> Point {
        self.position + self.drag_offset
    }

    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        if self.phase != PopupPhase::Positioned {
            return false;
        }
        self.drag_origin = Some(pointer - self.drag_offset);
        self.phase = PopupPhase::Dragging;
        true
    }

    /// New translation for `pointer`, if a drag is in progress.
    pub fn drag_to(&mut self, pointer: Point) -> Option<Point> {
        if self.phase != PopupPhase::Dragging {
            return None;
        }
        let origin = self.drag_origin?;
        self.drag_offset = pointer - origin;
        Some(self.drag_offset)
    }

    /// Move the popup by `delta` without the pointer, e.g. to keep it on
    /// screen. A drag in progress continues from the moved position.
    pub fn shift(&mut self, delta: Point) {
        self.drag_offset = self.drag_offset + delta;
        if let Some(origin) = self.drag_origin.as_mut() {
            *origin = *origin - delta;
        }
    }

    pub fn end_drag(&mut self) -> bool {
        if self.phase != PopupPhase::Dragging {
            return false;
        }
        self.drag_origin = None;
        self.phase = PopupPhase::Positioned;
        true
    }

    /// Selector value to fall back to after a failed translation: the
    /// language on screen, else the one the selector started with.
    pub fn revert_language(&self) -> LangCode {
        self.current_language
            .as_deref()
            .or(self.original_language())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string()
    }

    /// Language the looked-up text was written in, if known.
    pub fn original_language(&self) -> Option<&str> {
        self.source_language
            .as_deref()
            .or(self.detected_language.as_deref())
    }

    pub fn next_translation(&mut self) -> u64 {
        self.translation_seq += 1;
        self.translation_seq
    }

    /// Enter `Closing` and unregister the popup's listeners.
    pub fn begin_close(&mut self) {
        self.phase = PopupPhase::Closing;
        self.listeners = None;
    }

    pub fn has_listeners(&self) -> bool {
        self.listeners.is_some()
    }
}
