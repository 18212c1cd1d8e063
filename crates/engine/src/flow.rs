//! The public registration flow: fill the form, then see how to pay.

use crate::{
    form::FormController,
    notice::{Notice, Notifier},
    registration::{Registration, RegistrationNew},
    store::RegistrationStore,
    validation::{RegistrationDraft, RegistrationSchema},
};

const CREATED: &str = "Inscrição registrada com sucesso!";
const CREATE_FAILED: &str = "Erro ao processar inscrição. Tente novamente.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowState {
    Collecting,
    /// The row was stored; holds what the payment screen shows.
    Confirmed(Registration),
}

/// What a submit attempt did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft failed validation; nothing was sent.
    Invalid,
    /// The store refused or could not be reached; the draft is kept.
    Failed,
    Confirmed,
    /// Already confirmed; start a new registration first.
    Ignored,
}

pub struct RegistrationFlow {
    state: FlowState,
    form: FormController<RegistrationSchema>,
}

impl RegistrationFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::with_draft(RegistrationDraft::default())
    }

    #[must_use]
    pub fn with_draft(draft: RegistrationDraft) -> Self {
        Self {
            state: FlowState::Collecting,
            form: FormController::new(draft),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn form(&self) -> &FormController<RegistrationSchema> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController<RegistrationSchema> {
        &mut self.form
    }

    /// The confirmed registration, once the flow is done.
    pub fn confirmed(&self) -> Option<&Registration> {
        match &self.state {
            FlowState::Confirmed(registration) => Some(registration),
            FlowState::Collecting => None,
        }
    }

    pub async fn submit(
        &mut self,
        store: &dyn RegistrationStore,
        notifier: &mut dyn Notifier,
    ) -> SubmitOutcome {
        if matches!(self.state, FlowState::Confirmed(_)) {
            return SubmitOutcome::Ignored;
        }

        let Some(details) = self.form.submit(notifier) else {
            return SubmitOutcome::Invalid;
        };

        match store.create(&RegistrationNew::pending(details)).await {
            Ok(registration) => {
                tracing::info!(id = %registration.id, "registration created");
                notifier.notify(Notice::success(CREATED));
                self.form.reset();
                self.state = FlowState::Confirmed(registration);
                SubmitOutcome::Confirmed
            }
            Err(err) => {
                tracing::error!("failed to save registration: {err}");
                notifier.notify(Notice::error(CREATE_FAILED));
                SubmitOutcome::Failed
            }
        }
    }

    /// Goes back to an empty form, forgetting the previous submission.
    pub fn new_registration(&mut self) {
        self.form.reset();
        self.state = FlowState::Collecting;
    }
}

impl Default for RegistrationFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::{
        PaymentStatus, Sex, ShirtSize,
        notice::{NoticeLevel, Notices},
        testing::FakeStore,
        validation::field,
    };

    fn ana() -> RegistrationDraft {
        RegistrationDraft {
            name: "Ana Silva".to_string(),
            phone: "22988516911".to_string(),
            sex: "F".to_string(),
            age: "30".to_string(),
            shirt_size: "M".to_string(),
            terms_accepted: true,
        }
    }

    #[tokio::test]
    async fn valid_draft_creates_pending_row_and_confirms() {
        let store = FakeStore::default();
        let mut notices = Notices::default();
        let mut flow = RegistrationFlow::with_draft(ana());

        assert_eq!(flow.submit(&store, &mut notices).await, SubmitOutcome::Confirmed);

        assert_eq!(store.create_calls(), 1);
        let created = store.created.lock().unwrap()[0].clone();
        assert_eq!(created.payment_status, PaymentStatus::Pending);
        assert_eq!(created.name, "Ana Silva");
        assert_eq!(created.sex, Sex::Female);
        assert_eq!(created.shirt_size, ShirtSize::Medium);

        let confirmed = flow.confirmed().unwrap();
        assert_eq!(confirmed.name, "Ana Silva");
        assert_eq!(notices.as_slice(), &[Notice::success(CREATED)]);
    }

    #[tokio::test]
    async fn confirmed_flow_ignores_further_submits() {
        let store = FakeStore::default();
        let mut notices = Notices::default();
        let mut flow = RegistrationFlow::with_draft(ana());
        flow.submit(&store, &mut notices).await;

        *flow.form_mut().draft_mut() = ana();
        assert_eq!(flow.submit(&store, &mut notices).await, SubmitOutcome::Ignored);
        assert_eq!(store.create_calls(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_store() {
        let store = FakeStore::default();
        let mut notices = Notices::default();
        let mut draft = ana();
        draft.age = "4".to_string();
        let mut flow = RegistrationFlow::with_draft(draft);

        assert_eq!(flow.submit(&store, &mut notices).await, SubmitOutcome::Invalid);
        assert_eq!(store.create_calls(), 0);
        assert_eq!(flow.state(), &FlowState::Collecting);
        let fields: Vec<_> = flow.form().errors().fields().collect();
        assert_eq!(fields, vec![field::AGE]);
    }

    #[tokio::test]
    async fn store_failure_keeps_collecting_and_allows_retry() {
        let store = FakeStore::default();
        store.fail_create.store(true, Ordering::SeqCst);
        let mut notices = Notices::default();
        let mut flow = RegistrationFlow::with_draft(ana());

        assert_eq!(flow.submit(&store, &mut notices).await, SubmitOutcome::Failed);
        assert_eq!(flow.state(), &FlowState::Collecting);
        assert_eq!(flow.form().draft(), &ana());
        assert_eq!(notices.as_slice()[0].level, NoticeLevel::Error);

        store.fail_create.store(false, Ordering::SeqCst);
        assert_eq!(flow.submit(&store, &mut notices).await, SubmitOutcome::Confirmed);
        assert_eq!(store.create_calls(), 2);
    }

    #[tokio::test]
    async fn new_registration_starts_over() {
        let store = FakeStore::default();
        let mut flow = RegistrationFlow::with_draft(ana());
        flow.submit(&store, &mut Notices::default()).await;

        flow.new_registration();
        assert_eq!(flow.state(), &FlowState::Collecting);
        assert_eq!(flow.form().draft(), &RegistrationDraft::default());
        assert!(flow.confirmed().is_none());
    }
}
