//! HTML front of the registration site.
//!
//! Every page is rendered on the server from the `engine` controllers; the
//! browser only submits forms and follows links.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};

pub use server::{ServerState, SiteConfig, router, run_with_listener};

mod admin;
mod auth;
mod cookies;
mod gate;
mod public;
mod server;
mod templates;
mod views;

#[derive(Debug)]
pub enum ServerError {
    Template(minijinja::Error),
    Generic(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Template(err) => {
                tracing::error!("template error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Erro interno</h1>".to_string()),
                )
                    .into_response()
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err).into_response(),
        }
    }
}

impl From<minijinja::Error> for ServerError {
    fn from(value: minijinja::Error) -> Self {
        Self::Template(value)
    }
}
