//! Domain of the registration site: forms, the registration flow, payment
//! instructions, the admin table and the admin login.
//!
//! Persistence and authentication are collaborators behind
//! [`RegistrationStore`] and [`AuthProvider`]. [`local::LocalBackend`]
//! implements both over sea-orm; the hosted backend lives in its own crate.

pub use admin::{AdminController, Aggregates, RegistrationFilter};
pub use auth::{Access, AuthFailure, AuthMode, LoginController, LoginOutcome, check_access, logout};
pub use error::{AuthError, StoreError};
pub use flow::{FlowState, RegistrationFlow, SubmitOutcome};
pub use form::FormController;
pub use money::Reais;
pub use notice::{Clipboard, Notice, NoticeLevel, Notices, Notifier};
pub use payment::{EVENT_PRICE, PIX_KEY, PaymentScreen, PixCharge, SUPPORT_PHONE};
pub use registration::{
    PaymentStatus, Registration, RegistrationNew, RegistrationPatch, Sex, ShirtSize,
};
pub use store::{AuthProvider, ListOrder, RegistrationStore, Session};
pub use validation::{
    Credentials, FieldErrors, LoginDraft, LoginSchema, RegistrationDraft, RegistrationSchema,
    RunnerDetails, Schema, field,
};

mod admin;
mod auth;
mod error;
mod flow;
mod form;
pub mod local;
mod money;
mod notice;
mod payment;
mod registration;
mod store;
#[cfg(test)]
mod testing;
mod validation;
