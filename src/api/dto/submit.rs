//! DTO for the combined root endpoint.

use serde::Deserialize;

use super::links::CreateLinksRequest;
use super::report::ReportRequest;

/// Body of `POST /`: a link batch or a report request, told apart by field name.
///
/// A body carrying both `links` and `links_list` is treated as a link batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SubmitRequest {
    Links(CreateLinksRequest),
    Report(ReportRequest),
}
