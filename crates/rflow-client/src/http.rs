//! Blocking HTTP session against a live analytics server.
//!
//! One request per command, issued sequentially; a long-running remote
//! call (model training) simply blocks until the server answers. No
//! retries and no local timeout beyond the transport's own.

use log::{debug, warn};
use reqwest::blocking::Client;
use serde_json::Value;

use rflow_core::{Session, SessionError};
use rflow_domain::Command;

use crate::routes::{form_fields, route_for, Method};

pub struct HttpSession {
    client: Client,
    base_url: String,
}

impl HttpSession {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(e: &reqwest::Error) -> SessionError {
        SessionError::Transport { message: e.to_string() }
    }
}

impl Session for HttpSession {
    fn execute(&mut self, command: &Command) -> Result<Value, SessionError> {
        let route = route_for(command);
        let url = format!("{}{}", self.base_url, route.path);
        let fields = form_fields(&route.params);
        debug!("{:?} {url}", route.method);

        let request = match route.method {
            Method::Get => self.client.get(&url).query(&fields),
            Method::Post => self.client.post(&url).form(&fields),
        };
        let response = request.send().map_err(|e| Self::transport_error(&e))?;
        let status = response.status();
        if status.is_success() {
            return response.json().map_err(|e| Self::transport_error(&e));
        }

        // Non-2xx: the server saw the command and refused it. Surface its
        // message when it has one.
        let body = response.text().unwrap_or_default();
        warn!("{url} -> {status}");
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("msg")
                    .or_else(|| v.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("{status}: {body}"));
        if status.as_u16() == 404 {
            return Err(SessionError::MissingReference { id: message });
        }
        Err(SessionError::Rejected { message })
    }

    fn label(&self) -> &str {
        "http"
    }
}
