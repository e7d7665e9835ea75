use crate::errors::ExchangeError;

const LOGGED_BODY_CHARS: usize = 500;

/// Hook for watching every outbound exchange call. Handed to the fetcher
/// so tests can swap in a silent or recording implementation.
pub trait HttpObserver: Send + Sync {
    fn on_request(&self, exchange: &str, method: &str, url: &str, body: Option<&str>);

    fn on_response(&self, exchange: &str, status: u16, body: &str);

    fn on_error(&self, exchange: &str, error: &ExchangeError);
}

/// Logs through `tracing`: request/response lines at debug, failures at warn.
/// With `log_bodies` off only the failures are logged.
pub struct TracingObserver {
    log_bodies: bool,
}

impl TracingObserver {
    pub fn new(log_bodies: bool) -> Self {
        Self { log_bodies }
    }
}

impl HttpObserver for TracingObserver {
    fn on_request(&self, exchange: &str, method: &str, url: &str, body: Option<&str>) {
        if !self.log_bodies {
            return;
        }
        tracing::debug!("[{exchange}] {method} {url} body={}", body.unwrap_or("-"));
    }

    fn on_response(&self, exchange: &str, status: u16, body: &str) {
        if !self.log_bodies {
            return;
        }
        tracing::debug!(
            "[{exchange}] status={status} body={}",
            truncate(body, LOGGED_BODY_CHARS)
        );
    }

    fn on_error(&self, exchange: &str, error: &ExchangeError) {
        tracing::warn!("[{exchange}] request failed: {error}");
    }
}

pub(crate) fn truncate(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(observer: &TracingObserver) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            observer.on_request("OKX", "GET", "https://www.okx.com/x", None);
            observer.on_response("OKX", 503, "maintenance");
            observer.on_error(
                "OKX",
                &ExchangeError::Status {
                    status: 503,
                    body: "maintenance".to_string(),
                },
            );
        });
        logs.text()
    }

    #[test]
    fn quiet_observer_still_warns_on_failure() {
        let logs = capture(&TracingObserver::new(false));
        assert!(!logs.contains("https://www.okx.com/x"));
        assert!(!logs.contains("status=503"));
        assert!(logs.contains("WARN"));
        assert!(logs.contains("[OKX] request failed"));
    }

    #[test]
    fn verbose_observer_logs_request_and_response() {
        let logs = capture(&TracingObserver::new(true));
        assert!(logs.contains("GET https://www.okx.com/x"));
        assert!(logs.contains("status=503 body=maintenance"));
        assert!(logs.contains("[OKX] request failed"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc…");
        assert_eq!(truncate("資金費率", 2), "資金…");
    }
}
