use crate::errors::{AppError, AppResult};
use crate::models::CheckoutSession;

/// Client for the payment provider's two opaque endpoints. Subscription
/// state itself lives with the identity provider; this only starts and
/// cancels.
pub struct BillingClient {
    base_url: String,
}

impl BillingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests a hosted-checkout session. The returned id is what a UI
    /// would hand to the provider's redirect.
    pub fn create_checkout_session(&self) -> AppResult<CheckoutSession> {
        let url = format!("{}/api/create-checkout-session", self.base_url);
        let response = match ureq::post(&url).set("Content-Type", "application/json").call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(AppError::Api(format!(
                    "checkout session request returned status {code}"
                )));
            }
            Err(error) => {
                return Err(AppError::Network(format!(
                    "checkout session request failed: {error}"
                )));
            }
        };

        let body: serde_json::Value = response
            .into_json()
            .map_err(|error| AppError::Api(format!("checkout session response unreadable: {error}")))?;
        let id = body
            .get("id")
            .and_then(|value| value.as_str())
            .ok_or_else(|| AppError::Api("checkout session response carried no id".to_string()))?;

        Ok(CheckoutSession { id: id.to_string() })
    }

    /// Asks the provider to cancel the active subscription. Only the
    /// success/failure of the request is surfaced.
    pub fn cancel_subscription(&self) -> AppResult<()> {
        let url = format!("{}/api/cancel-subscription", self.base_url);
        match ureq::post(&url).set("Content-Type", "application/json").call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, _)) => Err(AppError::Api(format!(
                "cancel subscription request returned status {code}"
            ))),
            Err(error) => Err(AppError::Network(format!(
                "cancel subscription request failed: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BillingClient;
    use crate::errors::AppError;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buffer = [0u8; 4096];
                let _ = stream.read(&mut buffer);
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    fn dead_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        format!("http://{addr}")
    }

    #[test]
    fn constructor_trims_trailing_slashes() {
        let client = BillingClient::new("http://localhost:9999///");
        assert_eq!(client.base_url(), "http://localhost:9999");
    }

    #[test]
    fn checkout_parses_the_session_id() {
        let base = serve_once("200 OK", "{\"id\":\"cs_test_123\"}");
        let session = BillingClient::new(base).create_checkout_session().expect("session");
        assert_eq!(session.id, "cs_test_123");
    }

    #[test]
    fn checkout_without_an_id_is_an_api_error() {
        let base = serve_once("200 OK", "{\"unexpected\":true}");
        let error = BillingClient::new(base)
            .create_checkout_session()
            .expect_err("should fail");
        assert!(matches!(error, AppError::Api(_)));
    }

    #[test]
    fn server_failures_map_to_api_errors() {
        let base = serve_once("500 Internal Server Error", "{}");
        let error = BillingClient::new(base)
            .cancel_subscription()
            .expect_err("should fail");
        assert!(matches!(error, AppError::Api(_)));
    }

    #[test]
    fn unreachable_providers_map_to_network_errors() {
        let base = dead_endpoint();
        let error = BillingClient::new(base)
            .create_checkout_session()
            .expect_err("should fail");
        assert!(matches!(error, AppError::Network(_)));
    }

    #[test]
    fn cancel_succeeds_on_2xx() {
        let base = serve_once("200 OK", "{}");
        BillingClient::new(base).cancel_subscription().expect("cancel");
    }
}
