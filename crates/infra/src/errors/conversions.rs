//! Conversions from external infrastructure errors into domain errors.

use rdi_domain::RdiError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RdiError);

impl From<InfraError> for RdiError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RdiError> for InfraError {
    fn from(value: RdiError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRdiError {
    fn into_rdi(self) -> RdiError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RdiError */
/* -------------------------------------------------------------------------- */

impl IntoRdiError for HttpError {
    fn into_rdi(self) -> RdiError {
        if self.is_timeout() {
            return RdiError::request_timeout("HTTP request timed out");
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return RdiError::network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return RdiError::invalid_response(format!("Failed to decode RDI response: {self}"));
        }

        if self.is_builder() {
            return RdiError::config(format!("Invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message = format!("Request failed with status code {code}");

            return match code {
                401 => RdiError::unauthorized(message),
                403 => RdiError::forbidden(message),
                404 => RdiError::not_found(message),
                _ => RdiError::upstream(code, message),
            };
        }

        RdiError::network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_rdi())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → RdiError */
/* -------------------------------------------------------------------------- */

impl IntoRdiError for UrlError {
    fn into_rdi(self) -> RdiError {
        RdiError::config(format!("Invalid RDI instance URL: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(value.into_rdi())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → RdiError */
/* -------------------------------------------------------------------------- */

impl IntoRdiError for JsonError {
    fn into_rdi(self) -> RdiError {
        RdiError::invalid_response(format!("Unexpected RDI response body: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_rdi())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use rdi_domain::{ErrorCode, RdiErrorKind};
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_403_maps_to_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::FORBIDDEN))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: RdiError = InfraError::from(error).into();
        assert_eq!(mapped.kind, RdiErrorKind::Forbidden);
        assert!(mapped.message.contains("403"));
    }

    #[tokio::test]
    async fn http_timeout_maps_to_request_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client =
            Client::builder().no_proxy().timeout(Duration::from_millis(50)).build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap_err();

        let mapped: RdiError = InfraError::from(error).into();
        assert_eq!(mapped.error_code, ErrorCode::RdiRequestTimeout);
        assert_eq!(mapped.http_status, 408);
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: RdiError = InfraError::from(error).into();
        assert_eq!(mapped.error_code, ErrorCode::RdiNetworkError);
        assert_eq!(mapped.kind, RdiErrorKind::Generic);
    }

    #[test]
    fn url_parse_error_maps_to_config_error() {
        let error = url::Url::parse("not a url").unwrap_err();
        let mapped: RdiError = InfraError::from(error).into();
        assert_eq!(mapped.error_code, ErrorCode::RdiConfigurationError);
    }

    #[test]
    fn json_error_maps_to_invalid_response() {
        let error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped: RdiError = InfraError::from(error).into();
        assert_eq!(mapped.error_code, ErrorCode::RdiInvalidResponse);
        assert_eq!(mapped.http_status, 502);
    }
}
