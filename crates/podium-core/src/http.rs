//! Shared HTTP agent and retry policy for the classifier and market
//! providers. The receive-response window is generous because a cold
//! inference model can hold the request open while it loads.

use std::time::Duration;
use ureq::{Agent, Error as UreqError};

const TIMEOUT_GLOBAL: Duration = Duration::from_secs(120);
const TIMEOUT_PER_CALL: Duration = Duration::from_secs(90);
const TIMEOUT_RESOLVE: Duration = Duration::from_secs(5);
const TIMEOUT_CONNECT: Duration = Duration::from_secs(5);
const TIMEOUT_SEND_REQUEST: Duration = Duration::from_secs(5);
const TIMEOUT_SEND_BODY: Duration = Duration::from_secs(10);
const TIMEOUT_RECV_RESPONSE: Duration = Duration::from_secs(60);
const TIMEOUT_RECV_BODY: Duration = Duration::from_secs(30);

const RETRY_BASE_MS: u64 = 200;

/// Attempts made per remote call before giving up.
pub const MAX_ATTEMPTS: usize = 3;

pub fn default_agent() -> Agent {
    let config = Agent::config_builder()
        .timeout_global(Some(TIMEOUT_GLOBAL))
        .timeout_per_call(Some(TIMEOUT_PER_CALL))
        .timeout_resolve(Some(TIMEOUT_RESOLVE))
        .timeout_connect(Some(TIMEOUT_CONNECT))
        .timeout_send_request(Some(TIMEOUT_SEND_REQUEST))
        .timeout_send_body(Some(TIMEOUT_SEND_BODY))
        .timeout_recv_response(Some(TIMEOUT_RECV_RESPONSE))
        .timeout_recv_body(Some(TIMEOUT_RECV_BODY))
        .build();
    config.into()
}

/// Retry throttling, server errors, and transport failures; everything
/// else is permanent.
pub fn should_retry(err: &UreqError) -> bool {
    match err {
        UreqError::StatusCode(code) => *code == 429 || (500..=599).contains(code),
        UreqError::Timeout(_)
        | UreqError::Io(_)
        | UreqError::HostNotFound
        | UreqError::ConnectionFailed
        | UreqError::TooManyRedirects
        | UreqError::RedirectFailed => true,
        _ => false,
    }
}

pub fn retry_delay(attempt: usize) -> Duration {
    let shift = attempt.min(6) as u32;
    let delay = RETRY_BASE_MS.saturating_mul(1_u64 << shift);
    Duration::from_millis(delay)
}

/// Run `call` up to `max_attempts` times, backing off between retryable
/// failures. The last error is returned unchanged.
pub fn with_retry<T>(
    max_attempts: usize,
    mut call: impl FnMut() -> Result<T, UreqError>,
) -> Result<T, UreqError> {
    let mut attempt = 0;
    loop {
        match call() {
            Ok(value) => return Ok(value),
            Err(err) if attempt + 1 < max_attempts && should_retry(&err) => {
                std::thread::sleep(retry_delay(attempt));
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_and_caps() {
        assert_eq!(retry_delay(0), Duration::from_millis(200));
        assert_eq!(retry_delay(1), Duration::from_millis(400));
        assert_eq!(retry_delay(6), Duration::from_millis(12_800));
        assert_eq!(retry_delay(50), retry_delay(6));
    }

    #[test]
    fn status_classification() {
        assert!(should_retry(&UreqError::StatusCode(429)));
        assert!(should_retry(&UreqError::StatusCode(503)));
        assert!(!should_retry(&UreqError::StatusCode(400)));
        assert!(!should_retry(&UreqError::StatusCode(401)));
        assert!(should_retry(&UreqError::HostNotFound));
    }

    #[test]
    fn retry_stops_on_permanent_errors() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(3, || {
            calls += 1;
            Err(UreqError::StatusCode(404))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn retry_exhausts_attempts_on_server_errors() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(3, || {
            calls += 1;
            Err(UreqError::StatusCode(500))
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn retry_returns_the_first_success() {
        let mut calls = 0;
        let result = with_retry(3, || {
            calls += 1;
            if calls < 2 {
                Err(UreqError::StatusCode(500))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.ok(), Some(2));
    }
}
