//! Path-prefix routing and the per-route behaviour.

use std::fmt;
use std::sync::Arc;

use log::{error, info, warn};

use crate::parser::{HttpRequest, Method};
use crate::server::config::UserAgentPolicy;
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::store::{FileStore, StoreError};

/// High-level result of routing a request. Each variant maps to exactly one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// 200 with a body.
    OkWithBody,
    /// 200 or 201 without a body.
    OkEmpty,
    NotFound,
    MethodNotAllowed,
    ServerError,
    /// Only produced under [`UserAgentPolicy::BadRequest`].
    BadRequest,
}

impl fmt::Display for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteOutcome::OkWithBody => "ok-with-body",
            RouteOutcome::OkEmpty => "ok-empty",
            RouteOutcome::NotFound => "not-found",
            RouteOutcome::MethodNotAllowed => "method-not-allowed",
            RouteOutcome::ServerError => "server-error",
            RouteOutcome::BadRequest => "bad-request",
        };
        f.write_str(name)
    }
}

/// The routes this server knows, resolved from a request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Root,
    Echo(&'a str),
    UserAgent,
    File(&'a str),
    /// A known prefix whose segments did not match, or no known prefix at all.
    Unknown,
}

impl<'a> Route<'a> {
    /// Resolve a raw target. Prefixes are checked in priority order.
    pub fn resolve(target: &'a str) -> Self {
        if target == "/" {
            Route::Root
        } else if target.starts_with("/echo") {
            match Self::third_segment(target) {
                Some(payload) => Route::Echo(payload),
                None => Route::Unknown,
            }
        } else if target.starts_with("/user-agent") {
            Route::UserAgent
        } else if target.starts_with("/file") {
            match Self::third_segment(target) {
                Some(name) => Route::File(name),
                None => Route::Unknown,
            }
        } else {
            Route::Unknown
        }
    }

    /// The last segment of a target that splits on `/` into exactly three segments.
    ///
    /// Only the count is checked: the caller has already matched the prefix, so
    /// `/echoes/x` resolves like `/echo/x`.
    fn third_segment(target: &'a str) -> Option<&'a str> {
        let mut segments = target.split('/');
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(_), Some(value), None) => Some(value),
            _ => None,
        }
    }
}

/// Maps parsed requests to responses.
pub struct Router {
    store: Arc<dyn FileStore>,
    user_agent_policy: UserAgentPolicy,
}

impl Router {
    /// Create a router serving `/file` from `store`.
    pub fn new(store: Arc<dyn FileStore>, user_agent_policy: UserAgentPolicy) -> Self {
        Self {
            store,
            user_agent_policy,
        }
    }

    /// Route a request and build its response.
    pub fn handle(&self, request: &HttpRequest) -> (HttpResponse, RouteOutcome) {
        match Route::resolve(&request.target) {
            Route::Root => {
                info!("Serving root path");
                (HttpResponse::new(StatusCode::Ok), RouteOutcome::OkEmpty)
            }
            Route::Echo(payload) => {
                info!("Echoing content: '{payload}'");
                let response = HttpResponse::new(StatusCode::Ok)
                    .with_content_type("text/plain")
                    .with_body_string(payload);
                (response, RouteOutcome::OkWithBody)
            }
            Route::UserAgent => self.user_agent(request),
            Route::File(name) => self.file(request, name),
            Route::Unknown => {
                warn!("Route not found: {} {}", request.method, request.target);
                outcome_response(RouteOutcome::NotFound)
            }
        }
    }

    fn user_agent(&self, request: &HttpRequest) -> (HttpResponse, RouteOutcome) {
        match request.get_header("User-Agent").filter(|ua| !ua.is_empty()) {
            Some(user_agent) => {
                info!("User-Agent: {user_agent}");
                let response = HttpResponse::new(StatusCode::Ok).with_body_string(user_agent);
                (response, RouteOutcome::OkWithBody)
            }
            None => {
                warn!("User-Agent header missing");
                match self.user_agent_policy {
                    UserAgentPolicy::NotFound => outcome_response(RouteOutcome::NotFound),
                    UserAgentPolicy::BadRequest => outcome_response(RouteOutcome::BadRequest),
                }
            }
        }
    }

    fn file(&self, request: &HttpRequest, name: &str) -> (HttpResponse, RouteOutcome) {
        match request.method {
            Method::GET => match self.store.read(name) {
                Ok(contents) => {
                    info!("Serving file {name} ({} bytes)", contents.len());
                    let response = HttpResponse::new(StatusCode::Ok)
                        .with_content_type("application/octet-stream")
                        .with_body_bytes(contents);
                    (response, RouteOutcome::OkWithBody)
                }
                Err(e @ (StoreError::NotFound(_) | StoreError::InvalidName(_))) => {
                    warn!("{e}");
                    outcome_response(RouteOutcome::NotFound)
                }
                Err(e) => {
                    error!("Error reading file {name}: {e}");
                    outcome_response(RouteOutcome::ServerError)
                }
            },
            Method::POST => {
                info!("POST file: {name} ({} bytes)", request.body.len());
                match self.store.write(name, &request.body) {
                    Ok(()) => {
                        info!("Successfully created file: {name}");
                        (HttpResponse::new(StatusCode::Created), RouteOutcome::OkEmpty)
                    }
                    Err(e @ StoreError::InvalidName(_)) => {
                        warn!("{e}");
                        outcome_response(RouteOutcome::NotFound)
                    }
                    Err(e) => {
                        error!("Error writing file {name}: {e}");
                        outcome_response(RouteOutcome::ServerError)
                    }
                }
            }
            ref other => {
                warn!("Method not allowed: {other}");
                outcome_response(RouteOutcome::MethodNotAllowed)
            }
        }
    }
}

/// The bodiless response for an error outcome.
fn outcome_response(outcome: RouteOutcome) -> (HttpResponse, RouteOutcome) {
    let status = match outcome {
        RouteOutcome::OkWithBody | RouteOutcome::OkEmpty => StatusCode::Ok,
        RouteOutcome::NotFound => StatusCode::NotFound,
        RouteOutcome::MethodNotAllowed => StatusCode::MethodNotAllowed,
        RouteOutcome::ServerError => StatusCode::InternalServerError,
        RouteOutcome::BadRequest => StatusCode::BadRequest,
    };
    (HttpResponse::new(status), outcome)
}
