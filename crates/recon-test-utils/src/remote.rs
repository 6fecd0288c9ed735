//! In-memory [`RemoteContent`] implementation

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use recon_core::{Record, RecordType, RemoteContent, RemoteError, RemoteResult, identifier_of};

/// A call received by a [`FakeRemote`]
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    List(RecordType),
    Create(RecordType, Record),
    Update(RecordType, String, Record),
}

/// Destination double that stores records in memory.
///
/// Creates assign increasing numeric ids, updates replace the record with the
/// matching `id`. Every call is recorded.
///
/// # Example
///
/// ```rust
/// use recon_core::RecordType;
/// use recon_test_utils::{FakeRemote, block};
///
/// let remote = FakeRemote::new()
///     .with_records(RecordType::Block, vec![block("footer", "Footer", "A")])
///     .failing_on("header");
/// assert_eq!(remote.records(RecordType::Block).len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FakeRemote {
    records: Mutex<BTreeMap<RecordType, Vec<Record>>>,
    calls: Mutex<Vec<RemoteCall>>,
    failing: HashSet<String>,
    list_error: Option<RemoteError>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection; records without an `id` get one assigned
    pub fn with_records(self, record_type: RecordType, records: Vec<Record>) -> Self {
        {
            let mut stored = self.records.lock().unwrap();
            let collection = stored.entry(record_type).or_default();
            for record in records {
                let id = collection.len() as i64 + 1;
                let record = if record.has_field("id") {
                    record
                } else {
                    record.with("id", id)
                };
                collection.push(record);
            }
        }
        self
    }

    /// Make create/update calls for this identifier fail with HTTP 400
    pub fn failing_on(mut self, identifier: &str) -> Self {
        self.failing.insert(identifier.to_string());
        self
    }

    /// Make every list call fail with `error`
    pub fn failing_list(mut self, error: RemoteError) -> Self {
        self.list_error = Some(error);
        self
    }

    /// Current contents of a collection
    pub fn records(&self, record_type: RecordType) -> Vec<Record> {
        self.records
            .lock()
            .unwrap()
            .get(&record_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Create and update calls only
    pub fn writes(&self) -> Vec<RemoteCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, RemoteCall::List(_)))
            .collect()
    }

    fn check_failure(&self, record_type: RecordType, record: &Record) -> RemoteResult<()> {
        let identifier = identifier_of(record, record_type);
        if self.failing.contains(&identifier) {
            return Err(RemoteError::Http {
                status: 400,
                message: format!("Could not save the {}: {identifier}", record_type.spec().singular),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteContent for FakeRemote {
    async fn list(&self, record_type: RecordType) -> RemoteResult<Vec<Record>> {
        self.calls.lock().unwrap().push(RemoteCall::List(record_type));
        if let Some(error) = &self.list_error {
            return Err(error.clone());
        }
        Ok(self.records(record_type))
    }

    async fn create(&self, record_type: RecordType, record: &Record) -> RemoteResult<Record> {
        self.calls
            .lock()
            .unwrap()
            .push(RemoteCall::Create(record_type, record.clone()));
        self.check_failure(record_type, record)?;

        let mut stored = self.records.lock().unwrap();
        let collection = stored.entry(record_type).or_default();
        let created = record.clone().with("id", collection.len() as i64 + 1);
        collection.push(created.clone());
        Ok(created)
    }

    async fn update(&self, record_type: RecordType, id: &str, record: &Record) -> RemoteResult<Record> {
        self.calls.lock().unwrap().push(RemoteCall::Update(
            record_type,
            id.to_string(),
            record.clone(),
        ));
        self.check_failure(record_type, record)?;

        let mut stored = self.records.lock().unwrap();
        let collection = stored.entry(record_type).or_default();
        let existing = collection
            .iter_mut()
            .find(|r| r.get("id").text_form().as_deref() == Some(id))
            .ok_or_else(|| RemoteError::Http {
                status: 404,
                message: format!("The CMS {} with the \"{id}\" ID doesn't exist.", record_type.spec().singular),
            })?;
        *existing = record.clone();
        Ok(existing.clone())
    }
}
