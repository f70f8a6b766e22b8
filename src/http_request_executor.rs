use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, info};

use crate::credentials::{ClientOptions, Credentials};
use crate::errors::ForwardError;
use crate::http_request::RequestDescriptor;
use crate::response::ResponseResult;

pub struct ExecutionContext<'a> {
    pub client: &'a Client,
    pub credentials: &'a Credentials,
}

/// Blocking client; without an explicit timeout a call may wait forever.
pub fn build_client(options: &ClientOptions) -> Result<Client, ForwardError> {
    Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(ForwardError::Client)
}

impl RequestDescriptor {
    pub fn http_method(&self) -> Result<Method, ForwardError> {
        let method = self.method();
        Method::from_bytes(method.as_bytes())
            .map_err(|_| ForwardError::input(format!("{} is not a valid http method", method)))
    }

    /// Defaults first, caller headers last so they win on a name clash.
    pub fn http_headers(&self, credentials: &Credentials) -> Result<HeaderMap, ForwardError> {
        let mut map = HeaderMap::new();
        map.insert(HeaderName::from_static("apikey"), header_value(&credentials.service_key)?);
        map.insert(AUTHORIZATION, header_value(&format!("Bearer {}", credentials.service_key))?);
        if self.body().is_some() {
            map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        for (key, value) in self.headers()? {
            let name = HeaderName::try_from(key)
                .map_err(|_| ForwardError::input(format!("'{}' is not a valid header name", key)))?;
            map.insert(name, header_value(value)?);
        }
        Ok(map)
    }

    pub fn to_request(&self, context: &ExecutionContext<'_>) -> Result<RequestBuilder, ForwardError> {
        let url = context.credentials.url_for(self.path());
        let mut req = context
            .client
            .request(self.http_method()?, url)
            .headers(self.http_headers(context.credentials)?);
        if let Some(body) = self.body() {
            req = req.body(body.as_bytes().to_vec());
        }
        Ok(req)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ForwardError> {
    HeaderValue::try_from(value)
        .map_err(|_| ForwardError::input("header values must be visible ASCII or spaces"))
}

/// Runs the described call. Any status the endpoint answers with becomes a
/// result; only a failure to get an answer at all is an error.
pub fn execute_http_request(
    descriptor: &RequestDescriptor,
    context: &ExecutionContext<'_>,
) -> Result<ResponseResult, ForwardError> {
    let url = context.credentials.url_for(descriptor.path());
    let transport = |source| ForwardError::Transport { url: url.clone(), source };

    let req = descriptor.to_request(context)?;
    debug!(method = %descriptor.method(), url = %url, "sending request");

    let res = req.send().map_err(transport)?;
    let status = res.status().as_u16();
    let body = res.text().map_err(transport)?;

    let result = ResponseResult::new(status, body);
    if result.ok {
        debug!(status, "request succeeded");
    } else {
        info!(status, url = %url, "endpoint answered with an error status");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            rest_url: "https://x.co/".to_string(),
            service_key: "service-key".to_string(),
        }
    }

    fn build(input: &str) -> reqwest::blocking::Request {
        let client = Client::new();
        let credentials = credentials();
        let context = ExecutionContext { client: &client, credentials: &credentials };
        RequestDescriptor::parse(input)
            .unwrap()
            .to_request(&context)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn method_and_url_are_normalized() {
        let req = build(r#"{"path": "/rest/v1/items", "method": "get"}"#);
        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.url().as_str(), "https://x.co/rest/v1/items");
    }

    #[test]
    fn service_key_goes_into_both_auth_headers() {
        let req = build(r#"{"path": "items"}"#);
        assert_eq!(req.headers()["apikey"], "service-key");
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer service-key");
        assert!(req.headers().get(CONTENT_TYPE).is_none());
        assert!(req.body().is_none());
    }

    #[test]
    fn string_body_is_sent_as_json() {
        let req = build(r#"{"path": "items", "method": "POST", "body": "{\"a\":1}"}"#);
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(req.body().and_then(|b| b.as_bytes()), Some(&b"{\"a\":1}"[..]));
    }

    #[test]
    fn null_body_sends_nothing() {
        let req = build(r#"{"path": "items", "method": "DELETE", "body": null}"#);
        assert!(req.body().is_none());
        assert!(req.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn caller_headers_override_defaults() {
        let req = build(
            r#"{"path": "items", "body": "[]", "headers": {"Authorization": "Bearer OTHER", "content-type": "text/csv", "Prefer": "return=minimal"}}"#,
        );
        assert_eq!(req.headers().get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer OTHER");
        assert_eq!(req.headers()[CONTENT_TYPE], "text/csv");
        assert_eq!(req.headers()["prefer"], "return=minimal");
        assert_eq!(req.headers()["apikey"], "service-key");
    }

    #[test]
    fn lowercase_override_replaces_default() {
        let req = build(r#"{"path": "items", "headers": {"authorization": "Bearer OTHER"}}"#);
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer OTHER");
    }

    #[test]
    fn invalid_method_is_an_input_error() {
        let descriptor = RequestDescriptor::parse(r#"{"path": "items", "method": "GE T"}"#).unwrap();
        let err = descriptor.http_method().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_header_name_is_an_input_error() {
        let descriptor = RequestDescriptor::parse(r#"{"path": "items", "headers": {"bad name": "x"}}"#).unwrap();
        let err = descriptor.http_headers(&credentials()).unwrap_err();
        assert!(err.to_string().contains("bad name"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn client_without_timeout_builds() {
        assert!(build_client(&ClientOptions::default()).is_ok());
    }
}
