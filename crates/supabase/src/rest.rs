use async_trait::async_trait;
use chrono::Utc;
use engine::{
    ListOrder, Registration, RegistrationNew, RegistrationPatch, RegistrationStore, Session,
    StoreError,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{ClientError, SupabaseClient, error_message};

const RETURN_MINIMAL: &str = "return=minimal";
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Serialize)]
struct NewRow<'a> {
    id: &'a str,
    #[serde(flatten)]
    registration: &'a RegistrationNew,
}

async fn store_error(res: reqwest::Response) -> StoreError {
    let (status, message) = error_message(res).await;
    tracing::warn!(%status, "supabase rest request failed: {message}");
    match status.as_u16() {
        401 | 403 => StoreError::Unauthorized,
        404 => StoreError::NotFound(message),
        _ => StoreError::Backend(message),
    }
}

#[async_trait]
impl RegistrationStore for SupabaseClient {
    /// Inserts without reading the row back: the public role may insert but
    /// not select. The id is assigned here so the caller still gets a row.
    async fn create(&self, registration: &RegistrationNew) -> Result<Registration, StoreError> {
        let endpoint = self.endpoint(&format!("rest/v1/{}", self.table))?;
        let id = Uuid::new_v4().to_string();

        let res = self
            .public(self.http.post(endpoint))
            .header("Prefer", RETURN_MINIMAL)
            .json(&NewRow {
                id: &id,
                registration,
            })
            .send()
            .await
            .map_err(ClientError::Http)?;

        if !res.status().is_success() {
            return Err(store_error(res).await);
        }

        let now = Utc::now();
        Ok(Registration {
            id,
            name: registration.name.clone(),
            phone: registration.phone.clone(),
            sex: registration.sex,
            age: registration.age,
            shirt_size: registration.shirt_size,
            payment_status: registration.payment_status,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list(
        &self,
        session: &Session,
        order: ListOrder,
    ) -> Result<Vec<Registration>, StoreError> {
        let endpoint = self.endpoint(&format!("rest/v1/{}", self.table))?;
        let direction = if order.descending { "desc" } else { "asc" };
        let order = format!("{}.{direction}", ListOrder::COLUMN);

        let res = self
            .authorized(self.http.get(endpoint), &session.access_token)
            .query(&[("select", "*"), ("order", order.as_str())])
            .send()
            .await
            .map_err(ClientError::Http)?;

        if !res.status().is_success() {
            return Err(store_error(res).await);
        }

        Ok(res
            .json::<Vec<Registration>>()
            .await
            .map_err(ClientError::Http)?)
    }

    async fn update(
        &self,
        session: &Session,
        id: &str,
        patch: &RegistrationPatch,
    ) -> Result<(), StoreError> {
        let endpoint = self.endpoint(&format!("rest/v1/{}", self.table))?;
        let filter = format!("eq.{id}");

        let res = self
            .authorized(self.http.patch(endpoint), &session.access_token)
            .query(&[("id", filter.as_str())])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(patch)
            .send()
            .await
            .map_err(ClientError::Http)?;

        if !res.status().is_success() {
            return Err(store_error(res).await);
        }

        // PostgREST answers 200 with no rows when the filter matched nothing.
        let rows = res.json::<Vec<Value>>().await.map_err(ClientError::Http)?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
