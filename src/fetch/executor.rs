//! Transport execution and status policy.

use std::time::Duration;

use super::race::{race_response, RaceOutcome};
use super::state::RequestState;
use crate::config::NON_ERROR_STATUS_CODES;
use crate::error_handling::{classify_reqwest_error, ErrorKind, RequestError};
use crate::initialization::build_client;
use crate::request::{RequestConfig, WireRequest};
use crate::response::{decode_response, ResponseRecord};

/// Whether `code` is on the allow-list that never raises a status error.
pub fn is_non_error_status(code: u16) -> bool {
    NON_ERROR_STATUS_CODES.contains(&code)
}

/// Sends `wire` and turns whatever happens into a response or a classified error.
///
/// - executor timer fires first: `TimedOut` sentinel, never an error
/// - cancellation while waiting: `UserCancelled`
/// - transport timeout: `HttpRequestTimeout`, or a `TimedOut` sentinel when
///   `throw_on_timeout` is off
/// - status outside the allow-list with `throw_on_error_status`: `HttpStatusCodeError`
///
/// # Errors
///
/// Any of the classified errors above, plus client construction and body
/// read failures.
pub async fn execute(
    wire: WireRequest,
    config: &RequestConfig,
    verify_tls_certificate: bool,
) -> Result<ResponseRecord, RequestError> {
    let client = build_client(config, verify_tls_certificate)?;
    let timeout = Duration::from_millis(config.timeout_millis);
    let target = wire.url.clone();

    log::debug!(
        "{} {} -> {} (timeout {} ms)",
        RequestState::Sending,
        wire.method,
        target,
        config.timeout_millis
    );

    let pending = wire.into_request_builder(&client).send();
    let response = match race_response(pending, timeout, config.cancel_token.as_ref()).await {
        RaceOutcome::Completed(Ok(response)) => response,
        RaceOutcome::Completed(Err(e)) => {
            let error = classify_reqwest_error(e, "sending request to");
            if error.kind() == ErrorKind::HttpRequestTimeout && !config.throw_on_timeout {
                log::warn!("Transport timeout suppressed for {target}: {}", error.message());
                return Ok(ResponseRecord::sentinel(
                    config.cookie_jar.clone(),
                    RequestState::TimedOut,
                ));
            }
            return Err(error);
        }
        RaceOutcome::TimedOut => {
            log::warn!(
                "No response from {target} within {} ms",
                config.timeout_millis
            );
            return Ok(ResponseRecord::sentinel(
                config.cookie_jar.clone(),
                RequestState::TimedOut,
            ));
        }
        RaceOutcome::Cancelled => {
            return Err(RequestError::new(
                ErrorKind::UserCancelled,
                format!("Request to {target} was cancelled while awaiting the response"),
            ));
        }
    };

    let status = response.status().as_u16();
    log::debug!("Received status {status} from {}", response.url());
    if config.throw_on_error_status && !is_non_error_status(status) {
        return Err(RequestError::status(status));
    }

    decode_response(response, config).await
}
