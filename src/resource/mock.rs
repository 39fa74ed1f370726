//! In-memory `ResourceApi` for unit tests

use super::api::ResourceApi;
use super::types::{Created, DetailRecord, ResourceKind, SummaryRecord, Target};
use crate::codec::KeyFields;
use crate::error::{Error, Result};
use crate::pagination::{Page, PageQuery};
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Counts of remote calls made against a [`MockApi`]
#[derive(Debug, Default)]
pub struct Calls {
    pub fetch_by_id: AtomicUsize,
    pub fetch_by_name: AtomicUsize,
    pub fetch_by_compound_key: AtomicUsize,
    pub fetch_page: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Fake remote collection.
///
/// Listing pages are derived from the stored records unless pages are
/// scripted explicitly; a scripted `None` page makes that fetch fail.
pub struct MockApi {
    kind: ResourceKind,
    records: Mutex<Vec<DetailRecord>>,
    scripted_pages: Option<Vec<Option<Page>>>,
    pub calls: Calls,
    pub fail_fetch_by_id: bool,
    pub fail_create: Option<(u16, String)>,
    pub fail_update: Option<(u16, String)>,
    pub fail_delete: Option<(u16, String)>,
    next_id: AtomicUsize,
}

impl MockApi {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            records: Mutex::new(Vec::new()),
            scripted_pages: None,
            calls: Calls::default(),
            fail_fetch_by_id: false,
            fail_create: None,
            fail_update: None,
            fail_delete: None,
            next_id: AtomicUsize::new(1),
        }
    }

    /// Kind with `id` + `name` keys, listing and by-id lookups
    pub fn id_name() -> Self {
        Self::new(ResourceKind::new("sponsor_group"))
    }

    pub fn with_record(self, record: JsonValue) -> Self {
        let record = DetailRecord::from_value(record).expect("record must be an object");
        self.records.lock().unwrap().push(record);
        self
    }

    pub fn with_named(self, id: &str, name: &str) -> Self {
        self.with_record(json!({"id": id, "name": name, "description": format!("{name} detail")}))
    }

    pub fn with_pages(mut self, pages: Vec<Option<Page>>) -> Self {
        self.scripted_pages = Some(pages);
        self
    }

    pub fn records(&self) -> Vec<DetailRecord> {
        self.records.lock().unwrap().clone()
    }

    fn find(&self, predicate: impl Fn(&DetailRecord) -> bool) -> Option<DetailRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| predicate(r))
            .cloned()
    }

    fn matches_target(&self, record: &DetailRecord, target: &Target) -> bool {
        match target {
            Target::Id(id) => record.id() == Some(id.as_str()),
            Target::Compound(keys) => self.matches_compound(record, keys),
        }
    }

    fn matches_compound(&self, record: &DetailRecord, keys: &KeyFields) -> bool {
        self.kind
            .keys
            .iter()
            .filter(|spec| self.kind.compound_key.contains(&spec.name))
            .all(|spec| record.field_string(spec.source()).as_deref() == Some(keys.value(&spec.name)))
    }
}

fn status(failure: &(u16, String)) -> Error {
    Error::http_status(failure.0, failure.1.clone())
}

#[async_trait]
impl ResourceApi for MockApi {
    fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<DetailRecord>> {
        self.calls.fetch_by_id.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch_by_id {
            return Err(Error::Timeout { timeout_ms: 10 });
        }
        Ok(self.find(|r| r.id() == Some(id)))
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Option<DetailRecord>> {
        self.calls.fetch_by_name.fetch_add(1, Ordering::SeqCst);
        Ok(self.find(|r| r.name() == Some(name)))
    }

    async fn fetch_by_compound_key(&self, keys: &KeyFields) -> Result<Option<DetailRecord>> {
        self.calls.fetch_by_compound_key.fetch_add(1, Ordering::SeqCst);
        Ok(self.find(|r| self.matches_compound(r, keys)))
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<Page> {
        self.calls.fetch_page.fetch_add(1, Ordering::SeqCst);
        let number = query.page.unwrap_or(1).max(1);

        if let Some(pages) = &self.scripted_pages {
            return match pages.get(number as usize - 1) {
                Some(Some(page)) => Ok(page.clone()),
                Some(None) => Err(Error::http_status(500, "page unavailable")),
                None => Ok(Page::default()),
            };
        }

        let size = query.size.unwrap_or(20).max(1) as usize;
        let records = self.records.lock().unwrap();
        let start = (number as usize - 1) * size;
        let items: Vec<SummaryRecord> = records
            .iter()
            .skip(start)
            .take(size)
            .map(|r| SummaryRecord::new(r.id().unwrap_or(""), r.name().unwrap_or("")))
            .collect();

        let mut page = Page::new(items).with_total(records.len() as u64);
        if start + size < records.len() {
            page = page.with_next(format!("/list?size={size}&page={}", number + 1));
        }
        Ok(page)
    }

    async fn create(&self, payload: &JsonObject) -> Result<Created> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = &self.fail_create {
            return Err(status(failure));
        }

        let id = format!("gen-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut fields = payload.clone();
        fields.insert("id".to_string(), json!(id));
        self.records.lock().unwrap().push(DetailRecord::new(fields));

        Ok(Created::with_location(format!(
            "https://ise.example.com:9060/ers/config/{}/{id}",
            self.kind.name
        )))
    }

    async fn update(&self, target: &Target, payload: &JsonObject) -> Result<Option<DetailRecord>> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = &self.fail_update {
            return Err(status(failure));
        }

        let mut records = self.records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|r| self.matches_target(r, target)) else {
            return Err(Error::http_status(404, "not found"));
        };
        let mut fields = record.fields().clone();
        for (key, value) in payload {
            fields.insert(key.clone(), value.clone());
        }
        *record = DetailRecord::new(fields);
        Ok(Some(record.clone()))
    }

    async fn delete(&self, target: &Target) -> Result<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = &self.fail_delete {
            return Err(status(failure));
        }

        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !self.matches_target(r, target));
        if records.len() == before {
            return Err(Error::http_status(404, "not found"));
        }
        Ok(())
    }
}
