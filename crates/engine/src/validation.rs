//! Form schemas for the registration and login forms.
//!
//! A [`Schema`] turns a raw draft (strings as typed by the user) into a
//! normalized value, or into a [`FieldErrors`] map holding the first message
//! for every failing field. Messages are user-facing and kept in Portuguese.

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::registration::{Sex, ShirtSize};

/// Field keys used in [`FieldErrors`].
pub mod field {
    pub const NAME: &str = "name";
    pub const PHONE: &str = "phone";
    pub const SEX: &str = "sex";
    pub const AGE: &str = "age";
    pub const SHIRT_SIZE: &str = "shirt_size";
    pub const TERMS_ACCEPTED: &str = "terms_accepted";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
}

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 100;
const PHONE_MIN: usize = 10;
const PHONE_MAX: usize = 15;
const AGE_MIN: i64 = 5;
const AGE_MAX: i64 = 120;
const PASSWORD_MIN: usize = 6;

/// Field name to first error message, ordered by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Records `message` for `field` unless the field already has one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// Validation rules for one form.
pub trait Schema {
    type Draft: Default + Clone;
    type Output;

    /// Notice raised when a submission is rejected, if the form shows one.
    const FAILURE_NOTICE: Option<&'static str>;

    fn validate(draft: &Self::Draft) -> Result<Self::Output, FieldErrors>;
}

/// Registration form as submitted by the browser.
///
/// Everything is kept as text so that a half-filled form can be rendered back
/// to the user unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationDraft {
    pub name: String,
    pub phone: String,
    pub sex: String,
    pub age: String,
    pub shirt_size: String,
    #[serde(deserialize_with = "checkbox")]
    pub terms_accepted: bool,
}

/// A registration that passed validation. The accepted terms are implied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerDetails {
    pub name: String,
    pub phone: String,
    pub sex: Sex,
    pub age: u8,
    pub shirt_size: ShirtSize,
}

pub struct RegistrationSchema;

impl Schema for RegistrationSchema {
    type Draft = RegistrationDraft;
    type Output = RunnerDetails;

    const FAILURE_NOTICE: Option<&'static str> = Some("Por favor, corrija os erros no formulário");

    fn validate(draft: &RegistrationDraft) -> Result<RunnerDetails, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name: String = draft.name.trim().nfc().collect();
        let name_len = name.chars().count();
        if name_len < NAME_MIN {
            errors.add(field::NAME, "Nome deve ter pelo menos 3 caracteres");
        } else if name_len > NAME_MAX {
            errors.add(field::NAME, "Nome muito longo");
        }

        let phone_len = draft.phone.chars().count();
        if phone_len < PHONE_MIN {
            errors.add(field::PHONE, "WhatsApp inválido");
        } else if phone_len > PHONE_MAX {
            errors.add(field::PHONE, "WhatsApp muito longo");
        }

        let sex = Sex::try_from(draft.sex.as_str()).ok();
        if sex.is_none() {
            errors.add(field::SEX, "Selecione o sexo");
        }

        let age = match draft.age.trim().parse::<i64>() {
            Ok(age) if age < AGE_MIN => {
                errors.add(field::AGE, "Idade mínima: 5 anos");
                None
            }
            Ok(age) if age > AGE_MAX => {
                errors.add(field::AGE, "Idade inválida");
                None
            }
            Ok(age) => u8::try_from(age).ok(),
            Err(_) => {
                errors.add(field::AGE, "Idade inválida");
                None
            }
        };

        let shirt_size = ShirtSize::try_from(draft.shirt_size.as_str()).ok();
        if shirt_size.is_none() {
            errors.add(field::SHIRT_SIZE, "Selecione o tamanho");
        }

        if !draft.terms_accepted {
            errors.add(
                field::TERMS_ACCEPTED,
                "Você deve aceitar o termo de responsabilidade",
            );
        }

        match (sex, age, shirt_size) {
            (Some(sex), Some(age), Some(shirt_size)) => errors.into_result(|| RunnerDetails {
                name,
                phone: draft.phone.clone(),
                sex,
                age,
                shirt_size,
            }),
            _ => Err(errors),
        }
    }
}

/// Admin login / sign-up form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginDraft {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub struct LoginSchema;

impl Schema for LoginSchema {
    type Draft = LoginDraft;
    type Output = Credentials;

    const FAILURE_NOTICE: Option<&'static str> = None;

    fn validate(draft: &LoginDraft) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();

        if !is_valid_email(&draft.email) {
            errors.add(field::EMAIL, "Email inválido");
        }
        if draft.password.chars().count() < PASSWORD_MIN {
            errors.add(field::PASSWORD, "Senha deve ter pelo menos 6 caracteres");
        }

        errors.into_result(|| Credentials {
            email: draft.email.clone(),
            password: draft.password.clone(),
        })
    }
}

/// Dotted local part, then dotted domain labels ending in a 2+ letter TLD.
/// The regex crate has no lookaround, so a leading dot and `..` are
/// rejected separately.
static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$").ok()
});

fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.')
        && !email.contains("..")
        && EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

/// HTML checkboxes are either absent or carry a value like `on`.
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(value) => value,
        Raw::Text(text) => matches!(text.as_str(), "on" | "true" | "1" | "yes"),
    })
}
