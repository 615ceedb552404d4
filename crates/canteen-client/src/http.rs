//! # HTTP Backend
//!
//! reqwest implementation of the [`Backend`] trait against the canteen
//! server's REST API. Responses are `{ success, data, message }` envelopes;
//! see [`crate::envelope`].

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use canteen_core::types::{
    CreatePurchaseRequest, Customer, FaceDescriptor, Location, Product, Purchase,
};

use crate::backend::Backend;
use crate::envelope::Envelope;
use crate::error::{BackendError, BackendResult};

/// HTTP client for the canteen server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    /// Underlying HTTP client (connection pool).
    client: Client,

    /// Base URL of the server, without a trailing slash.
    base_url: String,
}

/// Body of `POST /customers/fetch-by-face`.
#[derive(Debug, Serialize)]
struct FaceMatchRequest<'a> {
    descriptor: &'a [f32],
}

impl HttpBackend {
    /// Creates a new backend client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpBackend {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> BackendResult<Envelope<T>> {
        debug!(path = %path, "GET request");

        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(path = %path, status = %status, "Server returned error status");
            return Err(BackendError::Server {
                message: format!("HTTP {} on {}", status, path),
            });
        }

        response
            .json::<Envelope<T>>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn post_envelope<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> BackendResult<Envelope<T>> {
        debug!(path = %path, "POST request");

        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(path = %path, status = %status, "Server returned error status");
            return Err(BackendError::Server {
                message: format!("HTTP {} on {}", status, path),
            });
        }

        response
            .json::<Envelope<T>>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn search_customer_exact(&self, exact: &str) -> BackendResult<Vec<Customer>> {
        let envelope: Envelope<Vec<Customer>> = self
            .get_envelope("customers", &[("exactData", exact)])
            .await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    async fn fetch_customer_by_face(
        &self,
        descriptor: &FaceDescriptor,
    ) -> BackendResult<Option<Customer>> {
        let body = FaceMatchRequest {
            descriptor: descriptor.as_slice(),
        };
        let envelope: Envelope<Customer> =
            self.post_envelope("customers/fetch-by-face", &body).await?;
        envelope.into_data()
    }

    async fn list_purchases(&self) -> BackendResult<Vec<Purchase>> {
        let envelope: Envelope<Vec<Purchase>> = self.get_envelope("purchases", &[]).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    async fn create_purchase(&self, request: &CreatePurchaseRequest) -> BackendResult<Purchase> {
        let envelope: Envelope<Purchase> = self.post_envelope("purchases", request).await?;
        envelope.into_required_data("purchase")
    }

    async fn reverse_purchase(&self, purchase_id: &str) -> BackendResult<Purchase> {
        let path = format!("purchases/{}/reverse", purchase_id);
        let envelope: Envelope<Purchase> = self.post_envelope(&path, &()).await?;
        envelope.into_required_data("purchase")
    }

    async fn list_items(&self) -> BackendResult<Vec<Product>> {
        let envelope: Envelope<Vec<Product>> = self.get_envelope("items", &[]).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    async fn list_locations(&self) -> BackendResult<Vec<Location>> {
        let envelope: Envelope<Vec<Location>> = self.get_envelope("locations", &[]).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining_trims_slashes() {
        let backend = HttpBackend::new("http://localhost:4000/api/");
        assert_eq!(backend.url("/purchases"), "http://localhost:4000/api/purchases");
        assert_eq!(backend.url("items"), "http://localhost:4000/api/items");
    }

    #[test]
    fn test_face_request_wire_shape() {
        let descriptor = FaceDescriptor(vec![0.5, 1.0]);
        let body = FaceMatchRequest {
            descriptor: descriptor.as_slice(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["descriptor"][1], 1.0);
    }
}
