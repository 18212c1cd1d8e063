//! Serializable page data handed to the templates.

use engine::{
    Aggregates, Clipboard, Notices, PaymentScreen, PaymentStatus, Registration,
    RegistrationFilter, Sex, ShirtSize,
};
use serde::{Deserialize, Serialize};

/// Value of a filter that matches everything.
const ANY: &str = "all";

#[derive(Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn sex_choices() -> Vec<Choice> {
    Sex::ALL
        .iter()
        .map(|sex| Choice {
            value: sex.code(),
            label: sex.label(),
        })
        .collect()
}

pub fn size_choices() -> Vec<Choice> {
    ShirtSize::ALL
        .iter()
        .map(|size| Choice {
            value: size.code(),
            label: size.code(),
        })
        .collect()
}

/// Copy button of the payment page. The browser does the actual copy with
/// the text and notice captured here.
#[derive(Debug, Default, Serialize)]
pub struct CopyButton {
    pub text: String,
    pub notice: String,
}

impl Clipboard for CopyButton {
    fn write_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

impl CopyButton {
    pub fn for_screen(screen: &PaymentScreen) -> Self {
        let mut button = CopyButton::default();
        let mut notices = Notices::default();
        screen.copy_pix_key(&mut button, &mut notices);
        if let Some(notice) = notices.into_vec().into_iter().next() {
            button.notice = notice.message;
        }
        button
    }
}

/// Admin filter as it travels in query strings and hidden form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub sex: String,
    pub shirt_size: String,
    pub payment_status: String,
    pub search: String,
}

impl FilterParams {
    /// `all`, empty and unknown values match everything.
    pub fn to_filter(&self) -> RegistrationFilter {
        RegistrationFilter {
            sex: choice(&self.sex).and_then(|value| Sex::try_from(value).ok()),
            shirt_size: choice(&self.shirt_size).and_then(|value| ShirtSize::try_from(value).ok()),
            payment_status: choice(&self.payment_status)
                .and_then(|value| PaymentStatus::try_from(value).ok()),
            search: self.search.clone(),
        }
    }
}

fn choice(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != ANY).then_some(value)
}

#[derive(Debug, Serialize)]
pub struct RowView {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub sex: &'static str,
    pub sex_code: &'static str,
    pub age: u8,
    pub shirt_size: &'static str,
    pub status: &'static str,
    pub badge: &'static str,
    pub paid: bool,
}

impl From<&Registration> for RowView {
    fn from(row: &Registration) -> Self {
        Self {
            id: row.id.clone(),
            name: row.name.clone(),
            phone: row.phone.clone(),
            sex: row.sex.label(),
            sex_code: row.sex.code(),
            age: row.age,
            shirt_size: row.shirt_size.code(),
            status: row.payment_status.as_str(),
            badge: if row.payment_status.is_paid() {
                "✓ Pago"
            } else {
                "⏳ Pendente"
            },
            paid: row.payment_status.is_paid(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsView {
    pub total: usize,
    pub paid: usize,
    pub revenue: String,
    pub male: usize,
    pub female: usize,
    pub small: usize,
    pub medium: usize,
    pub large: usize,
}

impl From<&Aggregates> for StatsView {
    fn from(aggregates: &Aggregates) -> Self {
        Self {
            total: aggregates.total,
            paid: aggregates.paid,
            revenue: aggregates.revenue.to_string(),
            male: aggregates.sex(Sex::Male),
            female: aggregates.sex(Sex::Female),
            small: aggregates.shirt_size(ShirtSize::Small),
            medium: aggregates.shirt_size(ShirtSize::Medium),
            large: aggregates.shirt_size(ShirtSize::Large),
        }
    }
}

pub fn showing(filtered: usize, total: usize) -> String {
    format!("Mostrando {filtered} de {total} inscrições")
}
