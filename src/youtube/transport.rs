use std::time::Duration;

use tracing::debug;

use super::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: &str) -> Self {
        HttpRequest {
            method: Method::Get,
            url: url.to_string(),
            headers: vec![],
            body: None,
        }
    }

    pub fn form(url: &str, params: &[(&str, &str)]) -> Self {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();

        HttpRequest {
            method: Method::Post,
            url: url.to_string(),
            headers: vec![(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            body: Some(body),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    #[cfg(test)]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Passes 2xx responses through, turns everything else into an error.
    pub fn error_for_status(self) -> ApiResult<HttpResponse> {
        if (200..300).contains(&self.status) {
            Ok(self)
        } else {
            Err(ApiError::from_status(self.status, self.body))
        }
    }
}

/// Everything that leaves the process goes through here, so tests can
/// script the remote side.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).execute(request)
    }
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(ReqwestTransport { client })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        debug!("{:?} {}", request.method, request.url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Patch => self.client.patch(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        debug!("{} -> {}", request.url, status);

        Ok(HttpResponse { status, body })
    }
}
