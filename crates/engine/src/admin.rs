//! Admin table: the full registration list, its filters and totals.
//!
//! Filtering and totals run over the list already fetched from the store;
//! the store is only asked for the whole list or for single-row updates.

use std::collections::BTreeMap;

use crate::{
    error::StoreError,
    money::Reais,
    notice::{Notice, Notifier},
    payment::EVENT_PRICE,
    registration::{PaymentStatus, Registration, RegistrationPatch, Sex, ShirtSize},
    store::{ListOrder, RegistrationStore, Session},
};

const LOAD_FAILED: &str = "Erro ao carregar inscrições";
const UPDATE_FAILED: &str = "Erro ao atualizar status";

/// Conjunctive row filter. `None` and an empty search match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationFilter {
    pub sex: Option<Sex>,
    pub shirt_size: Option<ShirtSize>,
    pub payment_status: Option<PaymentStatus>,
    /// Case-insensitive substring of the runner's name.
    pub search: String,
}

impl RegistrationFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sex.is_none()
            && self.shirt_size.is_none()
            && self.payment_status.is_none()
            && self.search.is_empty()
    }

    #[must_use]
    pub fn matches(&self, registration: &Registration) -> bool {
        if self.sex.is_some_and(|sex| registration.sex != sex) {
            return false;
        }
        if self
            .shirt_size
            .is_some_and(|size| registration.shirt_size != size)
        {
            return false;
        }
        if self
            .payment_status
            .is_some_and(|status| registration.payment_status != status)
        {
            return false;
        }
        self.search.is_empty()
            || registration
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    /// Matching rows, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, rows: &'a [Registration]) -> Vec<&'a Registration> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

/// Totals shown above the admin table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub total: usize,
    pub paid: usize,
    pub revenue: Reais,
    pub by_sex: BTreeMap<Sex, usize>,
    pub by_shirt_size: BTreeMap<ShirtSize, usize>,
}

impl Aggregates {
    #[must_use]
    pub fn from_rows(rows: &[Registration]) -> Self {
        let mut by_sex: BTreeMap<Sex, usize> = Sex::ALL.iter().map(|sex| (*sex, 0)).collect();
        let mut by_shirt_size: BTreeMap<ShirtSize, usize> =
            ShirtSize::ALL.iter().map(|size| (*size, 0)).collect();
        let mut paid = 0;

        for row in rows {
            *by_sex.entry(row.sex).or_default() += 1;
            *by_shirt_size.entry(row.shirt_size).or_default() += 1;
            if row.payment_status.is_paid() {
                paid += 1;
            }
        }

        Self {
            total: rows.len(),
            paid,
            revenue: EVENT_PRICE * paid as u64,
            by_sex,
            by_shirt_size,
        }
    }

    #[must_use]
    pub fn sex(&self, sex: Sex) -> usize {
        self.by_sex.get(&sex).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn shirt_size(&self, size: ShirtSize) -> usize {
        self.by_shirt_size.get(&size).copied().unwrap_or_default()
    }
}

/// Holds the last list fetched for the admin and the totals derived from it.
#[derive(Clone, Debug, Default)]
pub struct AdminController {
    rows: Vec<Registration>,
    aggregates: Aggregates,
    loaded: bool,
}

impl AdminController {
    /// Whether a list was ever fetched successfully.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn rows(&self) -> &[Registration] {
        &self.rows
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn filtered(&self, filter: &RegistrationFilter) -> Vec<&Registration> {
        filter.apply(&self.rows)
    }

    /// Fetches the whole list, newest first.
    ///
    /// On failure the previous list stays in place.
    pub async fn refresh(
        &mut self,
        store: &dyn RegistrationStore,
        session: &Session,
        notifier: &mut dyn Notifier,
    ) -> Result<(), StoreError> {
        match store.list(session, ListOrder::NEWEST_FIRST).await {
            Ok(rows) => {
                tracing::debug!(count = rows.len(), "registrations loaded");
                self.replace_rows(rows);
                Ok(())
            }
            Err(err) => {
                tracing::error!("failed to load registrations: {err}");
                notifier.notify(Notice::error(LOAD_FAILED));
                Err(err)
            }
        }
    }

    /// Sets the payment status of one row, then reloads the whole list.
    pub async fn update_status(
        &mut self,
        store: &dyn RegistrationStore,
        session: &Session,
        id: &str,
        status: PaymentStatus,
        notifier: &mut dyn Notifier,
    ) -> Result<(), StoreError> {
        if let Err(err) = store
            .update(session, id, &RegistrationPatch::status(status))
            .await
        {
            tracing::error!(%id, "failed to update payment status: {err}");
            notifier.notify(Notice::error(UPDATE_FAILED));
            return Err(err);
        }

        tracing::info!(%id, %status, "payment status updated");
        notifier.notify(Notice::success(format!("Status atualizado para {status}")));

        // The row changed remotely even when this reload fails.
        if self.refresh(store, session, notifier).await.is_err() {
            tracing::warn!(%id, "list is stale after status update");
        }
        Ok(())
    }

    fn replace_rows(&mut self, rows: Vec<Registration>) {
        self.aggregates = Aggregates::from_rows(&rows);
        self.rows = rows;
        self.loaded = true;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::{
        notice::{NoticeLevel, Notices},
        testing::{FakeStore, session},
    };

    fn row(id: &str, name: &str, sex: Sex, size: ShirtSize, status: PaymentStatus) -> Registration {
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
            - Duration::minutes(id.len() as i64);
        Registration {
            id: id.to_string(),
            name: name.to_string(),
            phone: "22988516911".to_string(),
            sex,
            age: 30,
            shirt_size: size,
            payment_status: status,
            created_at: at,
            updated_at: at,
        }
    }

    fn sample() -> Vec<Registration> {
        use PaymentStatus::*;
        use ShirtSize::*;
        vec![
            row("1", "Ana Silva", Sex::Female, Medium, Pending),
            row("2", "João Souza", Sex::Male, Large, Paid),
            row("3", "Mariana Lima", Sex::Female, Small, Paid),
            row("4", "Anderson Reis", Sex::Male, Medium, Pending),
            row("5", "Luana Costa", Sex::Female, Medium, Pending),
        ]
    }

    fn ids(rows: &[&Registration]) -> Vec<String> {
        rows.iter().map(|row| row.id.clone()).collect()
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let rows = sample();
        let filter = RegistrationFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(&rows)), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let rows = sample();
        let filter = RegistrationFilter {
            sex: Some(Sex::Female),
            shirt_size: Some(ShirtSize::Medium),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&rows)), vec!["1", "5"]);

        let filter = RegistrationFilter {
            payment_status: Some(PaymentStatus::Paid),
            search: "ma".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&rows)), vec!["3"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let rows = sample();
        let filter = RegistrationFilter {
            search: "AN".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&rows)), vec!["1", "3", "4", "5"]);

        let filter = RegistrationFilter {
            search: "JOÃO".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&rows)), vec!["2"]);
    }

    #[test]
    fn filtering_is_idempotent_and_leaves_source_alone() {
        let rows = sample();
        let filter = RegistrationFilter {
            sex: Some(Sex::Male),
            ..Default::default()
        };
        let once: Vec<Registration> = filter.apply(&rows).into_iter().cloned().collect();
        let twice: Vec<Registration> = filter.apply(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert_eq!(rows, sample());
    }

    #[test]
    fn aggregates_count_groups_and_revenue() {
        let rows = sample();
        let totals = Aggregates::from_rows(&rows);
        assert_eq!(totals.total, 5);
        assert_eq!(totals.paid, 2);
        assert_eq!(totals.revenue, Reais::new(140));
        assert_eq!(totals.sex(Sex::Female), 3);
        assert_eq!(totals.sex(Sex::Male), 2);
        assert_eq!(totals.shirt_size(ShirtSize::Small), 1);
        assert_eq!(totals.shirt_size(ShirtSize::Medium), 3);
        assert_eq!(totals.shirt_size(ShirtSize::Large), 1);
        assert_eq!(totals.by_sex.values().sum::<usize>(), totals.total);
        assert_eq!(totals.by_shirt_size.values().sum::<usize>(), totals.total);
    }

    #[test]
    fn aggregates_of_empty_list() {
        let totals = Aggregates::from_rows(&[]);
        assert_eq!(totals.total, 0);
        assert_eq!(totals.revenue, Reais::ZERO);
        assert_eq!(totals.sex(Sex::Male), 0);
        assert_eq!(totals.shirt_size(ShirtSize::Large), 0);
    }

    #[tokio::test]
    async fn loaded_only_after_a_successful_fetch() {
        let store = FakeStore::with_rows(sample());
        let mut admin = AdminController::default();
        let mut notices = Notices::default();
        assert!(!admin.is_loaded());

        store.fail_list.store(true, Ordering::SeqCst);
        assert!(admin.refresh(&store, &session(), &mut notices).await.is_err());
        assert!(!admin.is_loaded());

        store.fail_list.store(false, Ordering::SeqCst);
        admin.refresh(&store, &session(), &mut notices).await.unwrap();
        assert!(admin.is_loaded());
    }

    #[tokio::test]
    async fn refresh_failure_keeps_last_list() {
        let store = FakeStore::with_rows(sample());
        let mut admin = AdminController::default();
        let mut notices = Notices::default();

        admin.refresh(&store, &session(), &mut notices).await.unwrap();
        assert_eq!(admin.rows().len(), 5);

        store.fail_list.store(true, Ordering::SeqCst);
        store.rows.lock().unwrap().clear();
        assert!(admin.refresh(&store, &session(), &mut notices).await.is_err());
        assert_eq!(admin.rows().len(), 5);
        assert_eq!(admin.aggregates().total, 5);
        assert_eq!(notices.as_slice(), &[Notice::error(LOAD_FAILED)]);
    }

    #[tokio::test]
    async fn marking_paid_reloads_and_bumps_paid_count() {
        let store = FakeStore::with_rows(sample());
        let mut admin = AdminController::default();
        let mut notices = Notices::default();
        admin.refresh(&store, &session(), &mut notices).await.unwrap();
        let paid_before = admin.aggregates().paid;

        admin
            .update_status(&store, &session(), "1", PaymentStatus::Paid, &mut notices)
            .await
            .unwrap();

        let updates = store.updates.lock().unwrap().clone();
        assert_eq!(
            updates,
            vec![("1".to_string(), RegistrationPatch::status(PaymentStatus::Paid))]
        );
        assert_eq!(store.list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(admin.rows()[0].payment_status, PaymentStatus::Paid);
        assert_eq!(admin.aggregates().paid, paid_before + 1);
        assert_eq!(
            notices.as_slice(),
            &[Notice::success("Status atualizado para pago")]
        );
    }

    #[tokio::test]
    async fn failed_update_reports_and_skips_reload() {
        let store = FakeStore::with_rows(sample());
        let mut admin = AdminController::default();
        let mut notices = Notices::default();
        admin.refresh(&store, &session(), &mut notices).await.unwrap();
        store.fail_update.store(true, Ordering::SeqCst);

        let result = admin
            .update_status(&store, &session(), "1", PaymentStatus::Paid, &mut notices)
            .await;

        assert!(result.is_err());
        assert_eq!(store.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(admin.rows()[0].payment_status, PaymentStatus::Pending);
        assert_eq!(notices.as_slice()[0].level, NoticeLevel::Error);
    }
}
