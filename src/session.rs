//! Single-owner analysis session
//!
//! Holds the selected file, mode, filters and derived records. Every user
//! action is an [`Event`]; [`Session::apply`] returns the next state.

use crate::core::{normalize, Analysis};
use crate::remote::{SubmitOutcome, UploadRequest};
use crate::types::{DecodedSheet, FilterCriteria, Mode, NormalizedSheet, SheetPreview};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Rows shown in the sheet preview
pub const PREVIEW_ROWS: usize = 5;

/// The workbook the user picked
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// State of the remote processing call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    InFlight,
    Saved(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A workbook was selected and decoded
    FileLoaded { file: SelectedFile, sheet: DecodedSheet },
    ModeChanged(Mode),
    NodeFilterChanged(String),
    OrderFilterChanged(String),
    MaterialsSelected(BTreeSet<String>),
    SubmitStarted,
    SubmitFinished(SubmitOutcome),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    mode: Mode,
    file: Option<SelectedFile>,
    sheet: Option<DecodedSheet>,
    normalized: NormalizedSheet,
    criteria: FilterCriteria,
    submit: SubmitStatus,
}

impl Session {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn apply(mut self, event: Event) -> Self {
        match event {
            Event::FileLoaded { file, sheet } => {
                self.file = Some(file);
                self.sheet = Some(sheet);
                self.submit = SubmitStatus::Idle;
                self.renormalize();
            }
            Event::ModeChanged(mode) => {
                self.mode = mode;
                self.renormalize();
            }
            Event::NodeFilterChanged(substring) => self.criteria.node_substring = substring,
            Event::OrderFilterChanged(substring) => self.criteria.order_substring = substring,
            Event::MaterialsSelected(names) => self.criteria.selected_materials = names,
            Event::SubmitStarted => {
                if self.can_submit() {
                    self.submit = SubmitStatus::InFlight;
                }
            }
            Event::SubmitFinished(outcome) => {
                self.submit = match outcome {
                    SubmitOutcome::Saved(path) => SubmitStatus::Saved(path),
                    SubmitOutcome::Failed(message) => SubmitStatus::Failed(message),
                };
            }
        }
        self
    }

    fn renormalize(&mut self) {
        let Some(sheet) = &self.sheet else {
            return;
        };
        self.normalized = normalize(&sheet.rows, self.mode);

        let catalog = &self.normalized.catalog;
        self.criteria
            .selected_materials
            .retain(|name| catalog.contains(name));
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn normalized(&self) -> &NormalizedSheet {
        &self.normalized
    }

    pub fn submit_status(&self) -> &SubmitStatus {
        &self.submit
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.name.as_str())
    }

    /// A file is loaded and no submit is outstanding
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && self.submit != SubmitStatus::InFlight
    }

    /// Payload for the processing endpoint, if a file is loaded
    pub fn upload_request(&self) -> Option<UploadRequest> {
        self.file.as_ref().map(|file| UploadRequest {
            file_name: file.name.clone(),
            bytes: file.bytes.clone(),
            mode: self.mode,
        })
    }

    pub fn preview(&self) -> Option<SheetPreview> {
        self.sheet.as_ref().map(|s| s.preview(PREVIEW_ROWS))
    }

    /// Filtered records, chart data and layout for the current state
    pub fn view(&self) -> Analysis {
        Analysis::from_normalized(self.mode, self.normalized.clone(), &self.criteria)
    }
}
