//! Inputs to the popup controller.

use glance_bridge::DefinitionData;
use glance_common::{Point, SessionToken, Size};
use glance_config::LangCode;

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Popup header, outside its controls.
    Header,
    /// A button or selector inside the popup.
    Control,
    /// Anywhere else inside the popup.
    Popup,
    /// Outside the popup.
    Page,
}

impl PointerTarget {
    pub fn is_inside_popup(self) -> bool {
        !matches!(self, Self::Page)
    }
}

/// Page input, already translated from the DOM by the embedder.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    DoubleClick {
        point: Point,
    },
    MouseUp {
        point: Point,
        button: u16,
        alt: bool,
        /// Click count of the gesture; 2 for the second half of a double
        /// click.
        detail: u32,
    },
    PointerDown {
        point: Point,
        target: PointerTarget,
    },
    PointerMove {
        point: Point,
    },
    Click {
        target: PointerTarget,
    },
    Resize {
        viewport: Size,
    },
    LanguageSelected {
        code: LangCode,
    },
    CloseClicked,
    MoreClicked,
    SpeakClicked,
}

/// Results of work the controller started earlier, posted back into the
/// event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The extended-gesture debounce elapsed.
    SelectionSettled { text: String, anchor: Point },
    Lookup {
        token: SessionToken,
        result: Result<DefinitionData, String>,
    },
    Translation {
        token: SessionToken,
        seq: u64,
        language: LangCode,
        result: Result<DefinitionData, String>,
    },
}
