//! Public pages: event details with the registration form, then payment.

use axum::{Form, extract::State, response::Html};
use axum_extra::extract::CookieJar;
use engine::{
    EVENT_PRICE, FlowState, Notices, PaymentScreen, RegistrationDraft, RegistrationFlow,
};
use minijinja::context;

use crate::{
    ServerError, cookies,
    server::ServerState,
    templates,
    views::{CopyButton, sex_choices, size_choices},
};

/// Home page with an empty form.
pub async fn index(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), ServerError> {
    let (jar, notices) = cookies::take_notices(jar);
    let page = render_flow(&state, &RegistrationFlow::new(), &notices)?;
    Ok((jar, page))
}

/// Validates and stores a registration. Shows the payment page once the row
/// is stored, otherwise the form again with what the runner typed.
pub async fn register(
    State(state): State<ServerState>,
    Form(draft): Form<RegistrationDraft>,
) -> Result<Html<String>, ServerError> {
    let mut flow = RegistrationFlow::with_draft(draft);
    let mut notices = Notices::default();
    flow.submit(state.store.as_ref(), &mut notices).await;
    render_flow(&state, &flow, &notices)
}

fn render_flow(
    state: &ServerState,
    flow: &RegistrationFlow,
    notices: &Notices,
) -> Result<Html<String>, ServerError> {
    match flow.state() {
        FlowState::Confirmed(registration) => {
            let payment = PaymentScreen::for_registration(registration);
            let copy = CopyButton::for_screen(&payment);
            templates::render(
                &state.templates,
                "payment.html",
                context! {
                    payment,
                    copy,
                    notices => notices.as_slice(),
                },
            )
        }
        FlowState::Collecting => templates::render(
            &state.templates,
            "index.html",
            context! {
                draft => flow.form().draft(),
                errors => flow.form().errors(),
                sexes => sex_choices(),
                sizes => size_choices(),
                price => EVENT_PRICE.with_cents(),
                notices => notices.as_slice(),
            },
        ),
    }
}
