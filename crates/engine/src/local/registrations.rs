//! `inscricoes` table.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{
    error::StoreError,
    registration::{PaymentStatus, Registration, RegistrationNew, Sex, ShirtSize},
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inscricoes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "nome")]
    pub name: String,
    #[sea_orm(column_name = "whatsapp")]
    pub phone: String,
    #[sea_orm(column_name = "sexo")]
    pub sex: String,
    #[sea_orm(column_name = "idade")]
    pub age: i32,
    #[sea_orm(column_name = "tamanho_camisa")]
    pub shirt_size: String,
    #[sea_orm(column_name = "status_pagamento")]
    pub payment_status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new_row(id: String, row: &RegistrationNew, now: DateTimeUtc) -> Self {
        Self {
            id: ActiveValue::Set(id),
            name: ActiveValue::Set(row.name.clone()),
            phone: ActiveValue::Set(row.phone.clone()),
            sex: ActiveValue::Set(row.sex.code().to_string()),
            age: ActiveValue::Set(i32::from(row.age)),
            shirt_size: ActiveValue::Set(row.shirt_size.code().to_string()),
            payment_status: ActiveValue::Set(row.payment_status.as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}

impl TryFrom<Model> for Registration {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            sex: Sex::try_from(model.sex.as_str()).map_err(StoreError::Backend)?,
            age: u8::try_from(model.age)
                .map_err(|_| StoreError::Backend(format!("invalid age: {}", model.age)))?,
            shirt_size: ShirtSize::try_from(model.shirt_size.as_str())
                .map_err(StoreError::Backend)?,
            payment_status: PaymentStatus::try_from(model.payment_status.as_str())
                .map_err(StoreError::Backend)?,
            id: model.id,
            name: model.name,
            phone: model.phone,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
