//! Admin table: filters, totals and payment-status changes.
//!
//! Filtering works on the list already held in [`ServerState::admin`]; only
//! entering the page, "Atualizar" and a status change reach the store. Each
//! request works on its own copy of that list and stores it back when done,
//! so no lock is held while the store is awaited.

use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::Html,
};
use axum_extra::extract::CookieJar;
use engine::{AdminController, Notices, PaymentStatus, Session};
use minijinja::context;
use serde::Deserialize;

use crate::{
    ServerError, cookies,
    server::ServerState,
    templates,
    views::{FilterParams, RowView, StatsView, sex_choices, showing, size_choices},
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Set by the "Atualizar" button.
    #[serde(default)]
    refresh: Option<String>,
    #[serde(flatten)]
    filter: FilterParams,
}

impl PageQuery {
    /// A bare `/admin` is a page entry; the filter form always sends its
    /// fields.
    fn wants_reload(&self, admin: &AdminController) -> bool {
        self.refresh.is_some() || self.filter == FilterParams::default() || !admin.is_loaded()
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    status: String,
    /// Filter of the page the change was made on, rendered back.
    #[serde(flatten)]
    filter: FilterParams,
}

pub async fn page(
    State(state): State<ServerState>,
    Extension(session): Extension<Session>,
    Query(query): Query<PageQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), ServerError> {
    let (jar, mut notices) = cookies::take_notices(jar);
    let mut admin = state.admin.lock().await.clone();

    if query.wants_reload(&admin) {
        match admin
            .refresh(state.store.as_ref(), &session, &mut notices)
            .await
        {
            Ok(()) => *state.admin.lock().await = admin.clone(),
            Err(err) => tracing::debug!("showing last known list: {err}"),
        }
    }

    Ok((jar, render(&state, &admin, &session, &query.filter, &notices)?))
}

pub async fn update_status(
    State(state): State<ServerState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Html<String>, ServerError> {
    let status = PaymentStatus::try_from(form.status.as_str()).map_err(ServerError::Generic)?;
    let mut notices = Notices::default();
    let mut admin = state.admin.lock().await.clone();

    match admin
        .update_status(state.store.as_ref(), &session, &id, status, &mut notices)
        .await
    {
        Ok(()) => *state.admin.lock().await = admin.clone(),
        Err(err) => tracing::debug!(%id, "payment status unchanged: {err}"),
    }

    render(&state, &admin, &session, &form.filter, &notices)
}

fn render(
    state: &ServerState,
    admin: &AdminController,
    session: &Session,
    params: &FilterParams,
    notices: &Notices,
) -> Result<Html<String>, ServerError> {
    let rows: Vec<RowView> = admin
        .filtered(&params.to_filter())
        .into_iter()
        .map(RowView::from)
        .collect();

    templates::render(
        &state.templates,
        "admin.html",
        context! {
            email => &session.email,
            filter => params,
            showing => showing(rows.len(), admin.aggregates().total),
            empty => rows.is_empty(),
            rows,
            stats => StatsView::from(admin.aggregates()),
            sexes => sex_choices(),
            sizes => size_choices(),
            notices => notices.as_slice(),
        },
    )
}
