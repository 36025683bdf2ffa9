//! Report status model and tab-delimited report parsing.
//!
//! Report generation is asynchronous on the service side: a request is
//! created, polled for status, and fetched once done. Polling cadence and
//! give-up timeouts are caller policy; this module only models the states
//! and parses the fetched content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MwsError;

/// A single parsed report row, keyed by the header-row column names.
pub type ReportRow = BTreeMap<String, String>;

/// Processing state of a report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStatus {
    /// Accepted, not yet started.
    Submitted,
    /// Generation in progress.
    InProgress,
    /// Finished; a report is available for fetch.
    Done,
    /// Finished; the report matched no data.
    DoneNoData,
    /// Cancelled before completion.
    Cancelled,
    /// A status value this client does not know about.
    Other(String),
}

impl ProcessingStatus {
    /// Parse the service's underscore-delimited wire form.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "_SUBMITTED_" => ProcessingStatus::Submitted,
            "_IN_PROGRESS_" => ProcessingStatus::InProgress,
            "_DONE_" => ProcessingStatus::Done,
            "_DONE_NO_DATA_" => ProcessingStatus::DoneNoData,
            "_CANCELLED_" => ProcessingStatus::Cancelled,
            other => ProcessingStatus::Other(other.to_string()),
        }
    }

    /// Wire form of the status.
    pub fn as_wire(&self) -> &str {
        match self {
            ProcessingStatus::Submitted => "_SUBMITTED_",
            ProcessingStatus::InProgress => "_IN_PROGRESS_",
            ProcessingStatus::Done => "_DONE_",
            ProcessingStatus::DoneNoData => "_DONE_NO_DATA_",
            ProcessingStatus::Cancelled => "_CANCELLED_",
            ProcessingStatus::Other(value) => value,
        }
    }

    /// Whether the state can no longer change. Only [`Done`](Self::Done)
    /// permits a follow-up fetch.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProcessingStatus::Done | ProcessingStatus::DoneNoData | ProcessingStatus::Cancelled
        )
    }
}

/// Status record for a report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequestStatus {
    /// Identifier of the report request being polled.
    pub report_request_id: String,
    /// Current processing state.
    pub processing_status: ProcessingStatus,
    /// Identifier of the generated report, present once generation finished
    /// with data.
    pub generated_report_id: Option<String>,
}

/// Outcome of a report retrieval.
///
/// An empty-but-successful report (`Ready` with no rows, the
/// [`ProcessingStatus::DoneNoData`] case) is deliberately a different value
/// from [`NotReady`](Self::NotReady); the two never compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// The request has not reached a fetchable state; poll again later.
    NotReady,
    /// The report finished; rows may be empty when it matched no data.
    Ready(Vec<ReportRow>),
}

impl Report {
    /// Whether the report reached a fetchable state.
    pub fn is_ready(&self) -> bool {
        matches!(self, Report::Ready(_))
    }

    /// The parsed rows, when ready.
    pub fn rows(&self) -> Option<&[ReportRow]> {
        match self {
            Report::Ready(rows) => Some(rows),
            Report::NotReady => None,
        }
    }
}

/// Parse tab-delimited report content.
///
/// The first row is the canonical column-name sequence; every following row
/// is zipped against it positionally. A row whose field count differs from
/// the header is a hard error, never silently truncated or padded.
pub fn parse_tab_delimited(content: &str) -> Result<Vec<ReportRow>, MwsError> {
    let mut lines = content.lines();

    let Some(header_line) = lines.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<&str> = header_line.trim_end_matches('\r').split('\t').collect();

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != headers.len() {
            return Err(MwsError::MalformedReport {
                message: format!(
                    "row {} has {} fields, header has {}",
                    index + 2,
                    fields.len(),
                    headers.len()
                ),
            });
        }

        rows.push(
            headers
                .iter()
                .zip(fields)
                .map(|(header, field)| ((*header).to_string(), field.to_string()))
                .collect(),
        );
    }

    Ok(rows)
}
