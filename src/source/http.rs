use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::SourceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(super) fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(REQUEST_TIMEOUT))
        .build()
        .into()
}

/// Decode a JSON response body, naming the service on failure
pub(super) fn read_json<T: DeserializeOwned>(
    response: ureq::http::Response<ureq::Body>,
    service: &'static str,
) -> Result<T, SourceError> {
    let mut body = response.into_body();
    serde_json::from_reader(body.as_reader()).map_err(|e| SourceError::Decode {
        service,
        reason: e.to_string(),
    })
}
