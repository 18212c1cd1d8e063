//! Runner registrations as stored in the `inscricoes` table.
//!
//! Field names follow the backend's column names on the wire (`nome`,
//! `whatsapp`, `sexo`, ...) while the Rust side uses English names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::RunnerDetails;

/// Runner sex as collected by the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    /// Single-letter code stored in the backend.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Sex::Male => "Masculino",
            Sex::Female => "Feminino",
        }
    }
}

impl TryFrom<&str> for Sex {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            other => Err(format!("unknown sex code: {other}")),
        }
    }
}

/// Event shirt sizes (P, M, G).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShirtSize {
    #[serde(rename = "P")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "G")]
    Large,
}

impl ShirtSize {
    pub const ALL: [ShirtSize; 3] = [ShirtSize::Small, ShirtSize::Medium, ShirtSize::Large];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            ShirtSize::Small => "P",
            ShirtSize::Medium => "M",
            ShirtSize::Large => "G",
        }
    }
}

impl TryFrom<&str> for ShirtSize {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "P" => Ok(ShirtSize::Small),
            "M" => Ok(ShirtSize::Medium),
            "G" => Ok(ShirtSize::Large),
            other => Err(format!("unknown shirt size: {other}")),
        }
    }
}

/// Payment state of a registration, changed only by an admin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "pago")]
    Paid,
}

impl PaymentStatus {
    /// Value stored in the `status_pagamento` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pendente",
            PaymentStatus::Paid => "pago",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pendente",
            PaymentStatus::Paid => "Pago",
        }
    }

    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl core::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pendente" => Ok(PaymentStatus::Pending),
            "pago" => Ok(PaymentStatus::Paid),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// A stored registration row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "whatsapp")]
    pub phone: String,
    #[serde(rename = "sexo")]
    pub sex: Sex,
    #[serde(rename = "idade")]
    pub age: u8,
    #[serde(rename = "tamanho_camisa")]
    pub shirt_size: ShirtSize,
    #[serde(rename = "status_pagamento", default)]
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row sent to the store on creation. Id and timestamps are assigned there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationNew {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "whatsapp")]
    pub phone: String,
    #[serde(rename = "sexo")]
    pub sex: Sex,
    #[serde(rename = "idade")]
    pub age: u8,
    #[serde(rename = "tamanho_camisa")]
    pub shirt_size: ShirtSize,
    #[serde(rename = "status_pagamento")]
    pub payment_status: PaymentStatus,
}

impl RegistrationNew {
    /// New rows always start as pending, whatever the caller had in mind.
    #[must_use]
    pub fn pending(details: RunnerDetails) -> Self {
        Self {
            name: details.name,
            phone: details.phone,
            sex: details.sex,
            age: details.age,
            shirt_size: details.shirt_size,
            payment_status: PaymentStatus::Pending,
        }
    }
}

/// Partial update of a registration row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPatch {
    #[serde(rename = "status_pagamento", skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

impl RegistrationPatch {
    #[must_use]
    pub fn status(status: PaymentStatus) -> Self {
        Self {
            payment_status: Some(status),
        }
    }
}
