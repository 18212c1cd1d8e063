//! Sessions handed out by the local backend.

use chrono::Utc;
use sea_orm::entity::prelude::*;

use crate::store::Session;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    pub email: String,
    pub expires_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub(crate) fn is_live(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

impl From<Model> for Session {
    fn from(model: Model) -> Self {
        Self {
            access_token: model.token,
            email: model.email,
            expires_at: Some(model.expires_at),
        }
    }
}
