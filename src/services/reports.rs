//! Asynchronous report pipeline.
//!
//! Three independently retriable phases: request a report, poll its status,
//! fetch the finished content. There is no built-in poll loop; intervals and
//! give-up timeouts are caller policy.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::dispatch::Dispatcher;
use crate::error::MwsError;
use crate::reports::{
    parse_tab_delimited, ProcessingStatus, Report, ReportRequestStatus, ReportRow,
};
use crate::signing::format_timestamp;
use crate::types::ParameterList;
use crate::xml::XmlNode;

/// Service for the report pipeline.
pub struct ReportsService {
    dispatcher: Arc<Dispatcher>,
}

impl ReportsService {
    /// Create a new reports service.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Request generation of a report, returning the report request id used
    /// for polling.
    pub async fn request_report(
        &self,
        report_type: &str,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<String, MwsError> {
        let mut params = ParameterList::new();
        params.insert("ReportType", report_type);
        if let Some(start) = start_date {
            params.insert("StartDate", format_timestamp(&start));
        }
        if let Some(end) = end_date {
            params.insert("EndDate", format_timestamp(&end));
        }

        let doc = self
            .dispatcher
            .dispatch("RequestReport", params)
            .await?
            .into_document()?;

        doc.at(&[
            "RequestReportResponse",
            "RequestReportResult",
            "ReportRequestInfo",
        ])
        .and_then(|info| info.as_items().first())
        .and_then(|info| info.text_of("ReportRequestId"))
        .map(str::to_string)
        .ok_or_else(|| MwsError::ReportRequestRejected {
            message: "response did not contain a ReportRequestId".to_string(),
        })
    }

    /// Poll the processing status of a report request.
    ///
    /// Returns `None` when the service has no record of the request yet;
    /// absence is a valid transient state, not an error.
    pub async fn get_report_status(
        &self,
        report_request_id: &str,
    ) -> Result<Option<ReportRequestStatus>, MwsError> {
        let params = ParameterList::new().with("ReportRequestIdList.Id.1", report_request_id);
        let doc = self
            .dispatcher
            .dispatch("GetReportRequestList", params)
            .await?
            .into_document()?;

        doc.at(&[
            "GetReportRequestListResponse",
            "GetReportRequestListResult",
            "ReportRequestInfo",
        ])
        .and_then(|info| info.as_items().first())
        .map(|info| parse_status(info, report_request_id))
        .transpose()
    }

    /// Fetch and parse a finished report by its generated report id.
    ///
    /// Only valid once the request status is done; the content is fetched
    /// raw and parsed as tab-delimited rows.
    pub async fn fetch_report(&self, report_id: &str) -> Result<Vec<ReportRow>, MwsError> {
        let params = ParameterList::new().with("ReportId", report_id);
        let bytes = self.dispatcher.dispatch_raw("GetReport", params).await?;

        let content = std::str::from_utf8(&bytes).map_err(|e| MwsError::MalformedReport {
            message: format!("report content is not valid UTF-8: {e}"),
        })?;
        parse_tab_delimited(content)
    }

    /// Convenience composition of status check and fetch.
    ///
    /// A request that finished with no data yields `Report::Ready` with zero
    /// rows; a request in any non-done state (including one the service has
    /// no record of) yields `Report::NotReady`. The two never compare equal.
    pub async fn get_report(&self, report_request_id: &str) -> Result<Report, MwsError> {
        let Some(status) = self.get_report_status(report_request_id).await? else {
            return Ok(Report::NotReady);
        };

        match status.processing_status {
            ProcessingStatus::DoneNoData => Ok(Report::Ready(Vec::new())),
            ProcessingStatus::Done => {
                let report_id =
                    status
                        .generated_report_id
                        .ok_or_else(|| MwsError::MalformedResponse {
                            message: "status is done but GeneratedReportId is missing".to_string(),
                        })?;
                Ok(Report::Ready(self.fetch_report(&report_id).await?))
            }
            _ => Ok(Report::NotReady),
        }
    }

    /// List reports generated in the recent retention window, optionally
    /// filtered by report type.
    pub async fn get_report_list(
        &self,
        report_types: &[&str],
    ) -> Result<Vec<XmlNode>, MwsError> {
        let mut params = ParameterList::new();
        params.insert_indexed("ReportTypeList.Type", report_types.iter().copied());

        let doc = self
            .dispatcher
            .dispatch("GetReportList", params)
            .await?
            .into_document()?;

        Ok(doc
            .at(&["GetReportListResponse", "GetReportListResult", "ReportInfo"])
            .map(|node| node.as_items().to_vec())
            .unwrap_or_default())
    }
}

fn parse_status(info: &XmlNode, requested_id: &str) -> Result<ReportRequestStatus, MwsError> {
    let processing_status = info
        .text_of("ReportProcessingStatus")
        .map(ProcessingStatus::from_wire)
        .ok_or_else(|| MwsError::MalformedResponse {
            message: "ReportRequestInfo is missing ReportProcessingStatus".to_string(),
        })?;

    Ok(ReportRequestStatus {
        report_request_id: info
            .text_of("ReportRequestId")
            .unwrap_or(requested_id)
            .to_string(),
        processing_status,
        generated_report_id: info.text_of("GeneratedReportId").map(str::to_string),
    })
}
