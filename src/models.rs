//! Core data models for the harvest pipeline.
//!
//! These types represent the records and pages that flow from the Sinopia
//! API through classification into the final report.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::jsonld::RecordGraph;

/// One collection page as returned by the API.
#[derive(Debug, Deserialize)]
pub struct PageEnvelope {
    #[serde(default)]
    pub data: Vec<RawRecord>,
    #[serde(default)]
    pub links: PageLinks,
}

/// Pagination links of a collection page.
///
/// `first` is part of the wire format and is deserialized with every page,
/// but pagination only ever follows `next`.
#[derive(Debug, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub first: Option<String>,
}

/// A record as received from the API, before classification.
///
/// The embedded linked-data payload lives in `data`; everything else is the
/// record's metadata. Keeping the two as separate fields means splitting a
/// record into payload and meta is a move, not a mutation of a shared map.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

/// Everything the API sent about a record except its `data` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordMeta {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(rename = "templateId", default)]
    pub template_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A successfully parsed record: its RDF graph plus the retained metadata.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub graph: RecordGraph,
    pub meta: RecordMeta,
}

/// Accumulator and final result of a harvest run.
///
/// `total` counts every record that carried a `data` payload, whether or
/// not that payload parsed; the buckets only hold records whose graph was
/// built. `resources.len() + templates.len() <= total` always holds, with
/// parse failures accounting for the gap.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub resources: Vec<ParsedRecord>,
    pub templates: Vec<ParsedRecord>,
    pub total: u64,
}

impl HarvestReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records that made it into either bucket.
    pub fn parsed_len(&self) -> usize {
        self.resources.len() + self.templates.len()
    }
}
