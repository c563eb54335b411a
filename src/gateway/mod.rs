//! Authenticated request gateway.
//!
//! Every call to the SM-Clone API and the media host goes through
//! [`Gateway::execute`]. It attaches the bearer token of the current session,
//! hands successful payloads to the caller's success handler, and applies the
//! failure rules in one place:
//!
//! - 403 on a protected request: notify, drop the session, go back to `/`
//!   after the configured pause.
//! - Any other failure: notify with the server message if there is one.
//!
//! Nothing is retried.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::authorization_value;
use crate::config::Config;
use crate::errors::{status_message, ClientError, ErrorBody};
use crate::notify::{Notification, Notifier};
use crate::routes::{Navigator, Route};
use crate::session::{SessionEvent, SessionStore};

/// Request payload.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(reqwest::multipart::Form),
}

/// One outbound call.
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Body,
    /// Whether the call carries the session's bearer token
    pub protected: bool,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: Body::Empty,
            protected: true,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    /// Send without a bearer token.
    pub fn public(mut self) -> Self {
        self.protected = false;
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Body::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.body = Body::Multipart(form);
        self
    }
}

/// Side effect requested by a success handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Dispatch(SessionEvent),
    Notify(Notification),
    Navigate(Route),
    /// Navigate after the configured redirect pause
    NavigateAfter(Route),
}

/// Executes API calls against the shared session.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: Client,
    store: SessionStore,
    navigator: Navigator,
    notifier: Notifier,
    redirect_delay: Duration,
}

impl Gateway {
    pub fn new(
        config: &Config,
        store: SessionStore,
        navigator: Navigator,
        notifier: Notifier,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            store,
            navigator,
            notifier,
            redirect_delay: config.redirect_delay,
        })
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Run a request and apply the effects its success handler asks for.
    pub async fn execute<T, F>(&self, request: ApiRequest, on_success: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: FnOnce(&T) -> Vec<Effect>,
    {
        let request_id = Uuid::new_v4();
        match self.send(request, request_id).await {
            Ok(payload) => {
                let effects = on_success(&payload);
                self.apply(effects);
                Ok(payload)
            }
            Err(err) => Err(self.fail(err, request_id)),
        }
    }

    /// Run a request whose result stays with the caller.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        self.execute(request, |_| Vec::new()).await
    }

    /// Surface a failure detected before any request was made.
    ///
    /// Follows the same rules as a failed request, including ending the
    /// session for authorization failures.
    pub fn reject(&self, err: ClientError) -> ClientError {
        self.fail(err, Uuid::nil())
    }

    pub fn apply(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Dispatch(event) => {
                    self.store.dispatch(event);
                }
                Effect::Notify(notification) => self.notifier.notify(notification),
                Effect::Navigate(route) => {
                    self.navigator.navigate(route);
                }
                Effect::NavigateAfter(route) => {
                    self.navigator.navigate_after(route, self.redirect_delay)
                }
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        request_id: Uuid,
    ) -> Result<T, ClientError> {
        let ApiRequest {
            method,
            url,
            query,
            body,
            protected,
        } = request;

        let mut builder = self.http.request(method.clone(), &url);
        if protected {
            // read at call time so a token from an earlier login is never reused
            let token = self.store.token().ok_or(ClientError::NotAuthenticated)?;
            builder = builder.header(AUTHORIZATION, authorization_value(&token)?);
        }
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(form) => builder.multipart(form),
        };

        tracing::debug!(%request_id, %method, %url, protected, "Sending request");
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(%request_id, status = status.as_u16(), "Received response");

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let raw = response.text().await.unwrap_or_default();
        let message =
            ErrorBody::message_from(&raw).unwrap_or_else(|| status_message(status.as_u16()));

        if protected && status == StatusCode::FORBIDDEN {
            return Err(ClientError::Forbidden(message));
        }
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }

    fn fail(&self, err: ClientError, request_id: Uuid) -> ClientError {
        self.notifier.error(err.message());

        if err.is_authorization_failure() {
            tracing::warn!(%request_id, "Authorization failed, ending session: {}", err);
            self.store.dispatch(SessionEvent::Logout);
            self.navigator
                .navigate_after(Route::Landing, self.redirect_delay);
        } else {
            tracing::warn!(%request_id, "Request failed: {}", err);
        }
        err
    }
}
