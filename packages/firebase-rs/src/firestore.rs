//! Document CRUD over the Cloud Firestore REST API.
//!
//! Ids are assigned by the server on create, and `patch_document` sends an
//! `updateMask` per top-level field so updates merge into the stored record
//! instead of replacing it.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{status_error, FirebaseError, Result};
use crate::types::{from_fields, to_fields};

const BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// One document with its server-assigned id and plain-JSON payload.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub data: JsonValue,
}

#[derive(Debug, Deserialize)]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: JsonValue,
}

impl RestDocument {
    fn into_document(self) -> Document {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Document {
            id,
            data: from_fields(&self.fields),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RestDocument>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

/// Client for one project's default Firestore database.
pub struct FirestoreClient {
    client: reqwest::Client,
    project_id: String,
}

impl FirestoreClient {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            project_id: project_id.into(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            BASE_URL, self.project_id, collection
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    /// Insert a new document; the server assigns the id.
    pub async fn create_document(&self, collection: &str, data: &JsonValue) -> Result<Document> {
        let url = self.collection_url(collection);
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "fields": to_fields(data) }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, collection, &body));
        }

        let created: RestDocument = resp
            .json()
            .await
            .map_err(|e| FirebaseError::Parse(format!("create response: {e}")))?;
        let document = created.into_document();
        debug!(collection, id = %document.id, "document created");
        Ok(document)
    }

    /// Fetch one document, or `None` if it does not exist.
    pub async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let url = self.document_url(collection, id);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &format!("{collection}/{id}"), &body));
        }

        let doc: RestDocument = resp
            .json()
            .await
            .map_err(|e| FirebaseError::Parse(format!("get response: {e}")))?;
        Ok(Some(doc.into_document()))
    }

    /// Fetch every document in the collection, following pagination.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }
            let resp = request.send().await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(status_error(status, collection, &body));
            }

            let page: ListResponse = resp
                .json()
                .await
                .map_err(|e| FirebaseError::Parse(format!("list response: {e}")))?;
            documents.extend(page.documents.into_iter().map(RestDocument::into_document));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(collection, count = documents.len(), "listed documents");
        Ok(documents)
    }

    /// Merge the given top-level fields into an existing document.
    pub async fn patch_document(
        &self,
        collection: &str,
        id: &str,
        patch: &JsonValue,
    ) -> Result<()> {
        let url = self.document_url(collection, id);

        let field_paths: Vec<(&str, &str)> = patch
            .as_object()
            .map(|object| {
                object
                    .keys()
                    .map(|key| ("updateMask.fieldPaths", key.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        let resp = self
            .client
            .patch(&url)
            .query(&field_paths)
            .json(&serde_json::json!({ "fields": to_fields(patch) }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &format!("{collection}/{id}"), &body));
        }

        debug!(collection, id, "document patched");
        Ok(())
    }

    /// Remove a document.
    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let url = self.document_url(collection, id);
        let resp = self.client.delete(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &format!("{collection}/{id}"), &body));
        }

        debug!(collection, id, "document deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rest_document_id_comes_from_resource_name() {
        let rest = RestDocument {
            name: "projects/p/databases/(default)/documents/ceylonstays/abc123".to_string(),
            fields: json!({ "title": { "stringValue": "Villa" } }),
        };

        let doc = rest.into_document();
        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.data["title"], json!("Villa"));
    }
}
