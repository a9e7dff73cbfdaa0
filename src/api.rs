// API client module: a small blocking HTTP client that talks to the
// bookstore's JSON store (json-server style: `/books`, `/sales`,
// `/{collection}/{id}`). Synchronous on purpose; one request at a time.

use crate::error::StoreError;
use crate::model::{Book, Collection, NewBook, NewSale, RecordId, Sale};
use crate::settings::Settings;
use crate::store::Store;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Blocking client bound to one store base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the store described by `settings`.
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Port the store listens on, from the base URL (scheme default if unset).
    pub fn port(&self) -> Option<u16> {
        reqwest::Url::parse(&self.base_url)
            .ok()
            .and_then(|url| url.port_or_known_default())
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url, collection.path())
    }

    fn record_url(&self, collection: Collection, id: &RecordId) -> String {
        format!("{}/{}/{}", self.base_url, collection.path(), id)
    }

    /// Send the request and turn transport failures and non-2xx answers
    /// into [`StoreError`]s. A 404 on a single record becomes `NotFound`.
    fn send(
        &self,
        request: RequestBuilder,
        collection: Collection,
        id: Option<&RecordId>,
    ) -> Result<Response, StoreError> {
        let res = request.send().map_err(|e| {
            tracing::warn!(%collection, error = %e, "store unreachable");
            StoreError::Transport(e)
        })?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        tracing::warn!(%collection, status = status.as_u16(), "store rejected request");
        match id {
            Some(id) if status == StatusCode::NOT_FOUND => Err(StoreError::NotFound {
                collection,
                id: id.clone(),
            }),
            _ => Err(StoreError::Status {
                collection,
                status: status.as_u16(),
            }),
        }
    }

    fn decode<T: DeserializeOwned>(res: Response, collection: Collection) -> Result<T, StoreError> {
        res.json()
            .map_err(|source| StoreError::Decode { collection, source })
    }

    /// POST a new record; the store answers with the record and its id.
    fn create<B: Serialize, T: DeserializeOwned>(
        &self,
        collection: Collection,
        body: &B,
    ) -> Result<T, StoreError> {
        tracing::debug!(%collection, "POST");
        let req = self.client.post(self.collection_url(collection)).json(body);
        let res = self.send(req, collection, None)?;
        Self::decode(res, collection)
    }

    fn list<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, StoreError> {
        tracing::debug!(%collection, "GET all");
        let req = self.client.get(self.collection_url(collection));
        let res = self.send(req, collection, None)?;
        Self::decode(res, collection)
    }

    fn get<T: DeserializeOwned>(&self, collection: Collection, id: &RecordId) -> Result<T, StoreError> {
        tracing::debug!(%collection, %id, "GET");
        let req = self.client.get(self.record_url(collection, id));
        let res = self.send(req, collection, Some(id))?;
        Self::decode(res, collection)
    }

    /// PUT the full record back. The response body is not needed.
    fn update<B: Serialize>(&self, collection: Collection, id: &RecordId, body: &B) -> Result<(), StoreError> {
        tracing::debug!(%collection, %id, "PUT");
        let req = self.client.put(self.record_url(collection, id)).json(body);
        self.send(req, collection, Some(id))?;
        Ok(())
    }

    fn delete(&self, collection: Collection, id: &RecordId) -> Result<(), StoreError> {
        tracing::debug!(%collection, %id, "DELETE");
        let req = self.client.delete(self.record_url(collection, id));
        self.send(req, collection, Some(id))?;
        Ok(())
    }
}

impl Store for ApiClient {
    fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        self.list(Collection::Books)
    }

    fn get_book(&self, id: &RecordId) -> Result<Book, StoreError> {
        self.get(Collection::Books, id)
    }

    fn create_book(&self, book: &NewBook) -> Result<Book, StoreError> {
        self.create(Collection::Books, book)
    }

    fn update_book(&self, book: &Book) -> Result<(), StoreError> {
        self.update(Collection::Books, &book.id, book)
    }

    fn delete_book(&self, id: &RecordId) -> Result<(), StoreError> {
        self.delete(Collection::Books, id)
    }

    fn list_sales(&self) -> Result<Vec<Sale>, StoreError> {
        self.list(Collection::Sales)
    }

    fn get_sale(&self, id: &RecordId) -> Result<Sale, StoreError> {
        self.get(Collection::Sales, id)
    }

    fn create_sale(&self, sale: &NewSale) -> Result<Sale, StoreError> {
        self.create(Collection::Sales, sale)
    }

    fn update_sale(&self, sale: &Sale) -> Result<(), StoreError> {
        self.update(Collection::Sales, &sale.id, sale)
    }

    fn delete_sale(&self, id: &RecordId) -> Result<(), StoreError> {
        self.delete(Collection::Sales, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&Settings::new(base).unwrap()).unwrap()
    }

    #[test]
    fn port_comes_from_the_base_url() {
        assert_eq!(client("http://localhost:3000").port(), Some(3000));
        assert_eq!(client("http://127.0.0.1:4010/").port(), Some(4010));
        assert_eq!(client("http://store.local").port(), Some(80));
    }

    #[test]
    fn builds_collection_and_record_urls() {
        let api = client("http://localhost:3000/");
        assert_eq!(api.collection_url(Collection::Books), "http://localhost:3000/books");
        assert_eq!(
            api.record_url(Collection::Sales, &RecordId::Text("a9".into())),
            "http://localhost:3000/sales/a9"
        );
        assert_eq!(
            api.record_url(Collection::Books, &RecordId::Number(4)),
            "http://localhost:3000/books/4"
        );
    }
}
