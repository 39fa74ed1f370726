//! REST implementation of [`ResourceApi`]
//!
//! Handles both endpoint families of the management API:
//! - ERS style (`/ers/config/...`): bodies wrapped in a type-named object,
//!   listings under `SearchResult` with a `nextPage` link
//! - OpenAPI style (`/api/v1/...`): records under `response`
//!
//! Which shape applies is driven entirely by the [`ResourceDefinition`].

use super::api::ResourceApi;
use super::types::{Created, DetailRecord, ResourceKind, SummaryRecord, Target};
use crate::codec::KeyFields;
use crate::config::ResourceDefinition;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{parse_link_header, Page, PageLink, PageQuery};
use crate::template::{encode_path_segment, render_path, TemplateContext};
use crate::types::{json_path, scalar_to_string, JsonObject, JsonValue};
use async_trait::async_trait;
use reqwest::header::{LINK, LOCATION};
use reqwest::Response;
use std::sync::Arc;
use tracing::debug;

/// One resource kind served over HTTP
pub struct RestResource {
    client: Arc<HttpClient>,
    kind: ResourceKind,
    def: ResourceDefinition,
}

impl RestResource {
    /// Create an adapter for a resource definition
    pub fn new(client: Arc<HttpClient>, def: ResourceDefinition) -> Self {
        Self {
            client,
            kind: def.to_kind(),
            def,
        }
    }

    /// Endpoint descriptor
    pub fn definition(&self) -> &ResourceDefinition {
        &self.def
    }

    fn collection_url(&self) -> &str {
        self.def.path.trim_end_matches('/')
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), encode_path_segment(id))
    }

    fn target_url(&self, target: &Target) -> Result<String> {
        match target {
            Target::Id(id) if id.is_empty() => Err(Error::missing_key(&self.kind.name, "id")),
            Target::Id(id) => Ok(self.item_url(id)),
            Target::Compound(keys) => self.compound_url(keys),
        }
    }

    fn compound_url(&self, keys: &KeyFields) -> Result<String> {
        let template = self
            .def
            .compound_path
            .as_deref()
            .ok_or_else(|| Error::unsupported_lookup(&self.kind.name, "by_compound_key"))?;
        render_path(template, &TemplateContext::from_keys(keys))
    }

    /// GET a single record; 404 means absent
    async fn get_detail(&self, url: &str) -> Result<Option<DetailRecord>> {
        debug!(kind = %self.kind, url = %url, "Fetching detail");
        let response = match self.client.get(url).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let body = read_json(response).await?;
        let Some(body) = body else {
            return Ok(None);
        };
        self.detail_from(&body)
            .map(Some)
            .ok_or_else(|| Error::decode(format!("{} detail response has no record", self.kind)))
    }

    /// Record inside a detail response
    fn detail_from(&self, body: &JsonValue) -> Option<DetailRecord> {
        let value = match self.def.detail_path() {
            Some(path) => json_path(body, path)?,
            None => body,
        };
        DetailRecord::from_value(value.clone())
    }

    /// Request body in the shape the endpoint expects
    fn wrap(&self, fields: JsonObject) -> JsonValue {
        match &self.def.wrapper {
            Some(wrapper) => {
                let mut outer = JsonObject::new();
                outer.insert(wrapper.clone(), JsonValue::Object(fields));
                JsonValue::Object(outer)
            }
            None => JsonValue::Object(fields),
        }
    }

    fn parse_page(&self, body: &JsonValue, link_header: Option<&str>) -> Page {
        let items = json_path(body, &self.def.items_path)
            .and_then(JsonValue::as_array)
            .map(|items| items.iter().map(summary_from).collect())
            .unwrap_or_default();

        let mut page = Page::new(items);

        if let Some(next) = json_path(body, &self.def.next_link_path).and_then(link_from) {
            page.links.push(next);
        }
        if let Some(header) = link_header {
            page.links.extend(parse_link_header(header));
        }

        page.total = self
            .def
            .total_path
            .as_deref()
            .and_then(|path| json_path(body, path))
            .and_then(JsonValue::as_u64);

        page
    }
}

/// Body of a successful response; `None` when empty
async fn read_json(response: Response) -> Result<Option<JsonValue>> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&text)?))
}

fn summary_from(item: &JsonValue) -> SummaryRecord {
    let text = |key: &str| item.get(key).and_then(scalar_to_string);
    SummaryRecord {
        id: text("id").unwrap_or_default(),
        name: text("name").unwrap_or_default(),
        description: text("description"),
        link: item.get("link").and_then(link_from),
    }
}

/// Link given either as an object or as a bare href
fn link_from(value: &JsonValue) -> Option<PageLink> {
    match value {
        JsonValue::String(href) if !href.is_empty() => Some(PageLink::next(href.clone())),
        JsonValue::Object(_) => {
            let mut link: PageLink = serde_json::from_value(value.clone()).ok()?;
            if link.rel.is_empty() {
                link.rel = "next".to_string();
            }
            Some(link)
        }
        _ => None,
    }
}

#[async_trait]
impl ResourceApi for RestResource {
    fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<DetailRecord>> {
        if id.is_empty() {
            return Ok(None);
        }
        self.get_detail(&self.item_url(id)).await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Option<DetailRecord>> {
        let template = self
            .def
            .name_path
            .as_deref()
            .ok_or_else(|| Error::unsupported_lookup(&self.kind.name, "by_name"))?;
        let ctx = TemplateContext::new().with("name", name);
        self.get_detail(&render_path(template, &ctx)?).await
    }

    async fn fetch_by_compound_key(&self, keys: &KeyFields) -> Result<Option<DetailRecord>> {
        self.get_detail(&self.compound_url(keys)?).await
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<Page> {
        debug!(kind = %self.kind, page = ?query.page, size = ?query.size, "Fetching listing page");
        let response = self
            .client
            .get_with_config(
                self.collection_url(),
                RequestConfig::new().queries(query.to_params()),
            )
            .await?;

        let link_header = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = read_json(response).await?.unwrap_or(JsonValue::Null);
        Ok(self.parse_page(&body, link_header.as_deref()))
    }

    async fn create(&self, payload: &JsonObject) -> Result<Created> {
        let response = self
            .client
            .post(self.collection_url(), self.wrap(payload.clone()))
            .await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let record = read_json(response)
            .await?
            .and_then(|body| self.detail_from(&body));

        debug!(kind = %self.kind, location = ?location, "Created resource");
        Ok(Created {
            id: None,
            location,
            record,
        })
    }

    async fn update(&self, target: &Target, payload: &JsonObject) -> Result<Option<DetailRecord>> {
        let url = self.target_url(target)?;
        let mut fields = payload.clone();
        if let Target::Id(id) = target {
            fields.insert("id".to_string(), JsonValue::String(id.clone()));
        }

        let response = self.client.put(&url, self.wrap(fields)).await?;
        // ERS answers with a field diff, not the record
        Ok(read_json(response)
            .await?
            .and_then(|body| self.detail_from(&body))
            .filter(|record| record.id().is_some() || self.kind.has_compound_key()))
    }

    async fn delete(&self, target: &Target) -> Result<()> {
        let url = self.target_url(target)?;
        self.client.delete(&url).await?;
        debug!(kind = %self.kind, target = %target, "Deleted resource");
        Ok(())
    }
}
