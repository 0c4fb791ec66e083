//! Intent and output event types.
//!
//! `Intent` is everything the input layer can ask for; `Output` is
//! everything the dispatcher can tell the renderer/notification layer.
//! Both are plain data so the transport between them stays a thin
//! external concern.

use serde::{Deserialize, Serialize};

use quotegrid_engine::item::Column;
use quotegrid_engine::quote::QuoteData;

use crate::focus::Direction;
use crate::ui_state::UiState;

/// A key on the numeric entry pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumKey {
    Digit(u8),
    /// Backspace over the input buffer.
    Delete,
    /// Jump to the first empty width cell.
    Width,
    /// Jump to the first empty height cell.
    Height,
    /// Commit the input buffer to the active cell.
    Enter,
}

/// A named user intent, fully processed before the next one is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    NumericKeyPressed(NumKey),
    TableCellClicked { row: usize, column: Column },
    SequenceCellClicked { row: usize },
    InsertRowRequested,
    DeleteRowRequested,
    ClearRowRequested,
    MoveActiveCell(Direction),
    CycleTypeRequested,
    CalculateRequested,
    MultiDeleteModeToggled,
    SaveRequested,
    ExportCsvRequested,
    LoadRequested,
    SaveThenLoadChosen,
    LoadDirectlyChosen,
    FileLoaded { name: String, content: String },
    ResetRequested,
    NavigateToDetailView,
    FocusModeRequested { column: Column },
    BatchUpdateRequested { column: Column, value: String },
    DetailCellEdited { row: usize, column: Column, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Info,
    Error,
}

/// One combined view of both stores, published at most once per intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ui: UiState,
    pub quote: QuoteData,
}

/// Events published to the renderer/notification layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    StateChanged(Snapshot),
    Notification {
        message: String,
        kind: NotificationKind,
    },
    /// Unsaved work exists; ask before loading over it.
    ShowLoadConfirmationDialog,
    /// Ask the host to open a file picker and feed back `FileLoaded`.
    TriggerFileLoad,
    /// A grid operation succeeded; the host may retract its action panel.
    OperationSuccessfulAutoHidePanel,
}

impl Output {
    pub fn info(message: impl Into<String>) -> Self {
        Output::Notification {
            message: message.into(),
            kind: NotificationKind::Info,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Output::Notification {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }
}
