//! Shared lookup tables (`/dominios_comunes/`), cached in memory.

use tracing::{debug, instrument};

use super::{ApiClient, CacheValue};
use crate::api::ApiError;
use crate::api::types::common::ListResponse;
use crate::api::types::{PaymentMethod, StatusRecord};

const PAYMENT_METHODS_KEY: &str = "payment_methods";
const STATUSES_KEY: &str = "statuses";

impl ApiClient {
    /// Payment methods, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache is cold and the API request fails.
    #[instrument(skip(self))]
    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethod>, ApiError> {
        if let Some(CacheValue::PaymentMethods(methods)) = self.cached(PAYMENT_METHODS_KEY).await {
            debug!("Cache hit for payment methods");
            return Ok(methods);
        }

        let list: ListResponse<PaymentMethod> =
            self.get_json("dominios_comunes/metodos-pago/", &[]).await?;
        let methods: Vec<PaymentMethod> = list.into();
        self.cache_insert(
            PAYMENT_METHODS_KEY,
            CacheValue::PaymentMethods(methods.clone()),
        )
        .await;
        Ok(methods)
    }

    /// Status rows, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache is cold and the API request fails.
    #[instrument(skip(self))]
    pub async fn statuses(&self) -> Result<Vec<StatusRecord>, ApiError> {
        if let Some(CacheValue::Statuses(statuses)) = self.cached(STATUSES_KEY).await {
            debug!("Cache hit for statuses");
            return Ok(statuses);
        }

        let list: ListResponse<StatusRecord> =
            self.get_json("dominios_comunes/estados/", &[]).await?;
        let statuses: Vec<StatusRecord> = list.into();
        self.cache_insert(STATUSES_KEY, CacheValue::Statuses(statuses.clone()))
            .await;
        Ok(statuses)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::config::ApiConfig;

    #[tokio::test]
    async fn test_payment_methods_are_cached() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/dominios_comunes/metodos-pago/");
            then.status(200).json_body(json!([
                {"id": 1, "nombre": "Efectivo"},
                {"id": 2, "nombre": "Transferencia"}
            ]));
        });

        let client = ApiClient::new(&ApiConfig {
            base_url: server.url("/api"),
            timeout: Duration::from_secs(5),
            lookup_ttl: Duration::from_secs(60),
        })
        .unwrap();

        let first = client.payment_methods().await.unwrap();
        let second = client.payment_methods().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(mock.hits(), 1);

        client.invalidate_lookups().await;
        client.payment_methods().await.unwrap();
        assert_eq!(mock.hits(), 2);
    }
}
