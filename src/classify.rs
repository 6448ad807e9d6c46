//! Record classification.
//!
//! Turns one raw API record into a bucket placement on the report, or
//! skips it. Skips are never errors: a record without a payload is not
//! counted at all, and a payload that fails to parse still counts toward
//! the total so the report reflects how much data the API actually held.

use crate::jsonld::parse_jsonld;
use crate::models::{HarvestReport, ParsedRecord, RawRecord};
use crate::namespaces::Namespaces;
use crate::progress::{HarvestEvent, HarvestReporter};

/// Substring of `templateId` that marks a record as a resource template
/// rather than a data instance.
pub const TEMPLATE_TYPE_MARKER: &str = "sinopia:template:resource";

/// Classify one record into the report.
///
/// Consumes the record: the payload and the retained metadata are two
/// disjoint halves of it, so no shared structure is mutated along the way.
pub fn classify_record(
    record: RawRecord,
    namespaces: &Namespaces,
    report: &mut HarvestReport,
    reporter: &dyn HarvestReporter,
) {
    let RawRecord { data, meta } = record;

    let Some(payload) = data else {
        reporter.report(HarvestEvent::MissingData {
            uri: meta.uri.clone(),
        });
        return;
    };

    // Counted as soon as a payload exists, parseable or not.
    report.total += 1;

    let graph = match parse_jsonld(&payload, namespaces) {
        Ok(graph) => graph,
        Err(error) => {
            reporter.report(HarvestEvent::ParseFailed {
                uri: meta.uri.clone(),
                error: error.to_string(),
            });
            return;
        }
    };

    let parsed = ParsedRecord { graph, meta };
    if parsed.meta.template_id.contains(TEMPLATE_TYPE_MARKER) {
        report.templates.push(parsed);
    } else {
        report.resources.push(parsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    fn classify(value: serde_json::Value, report: &mut HarvestReport) {
        classify_record(
            record(value),
            &Namespaces::sinopia(),
            report,
            &NoProgress,
        );
    }

    #[test]
    fn missing_data_is_not_counted() {
        let mut report = HarvestReport::new();
        classify(
            json!({"uri": "https://api.sinopia.io/resource/a", "templateId": "x"}),
            &mut report,
        );
        assert_eq!(report.total, 0);
        assert_eq!(report.parsed_len(), 0);
    }

    #[test]
    fn parse_failure_counts_but_fills_no_bucket() {
        let mut report = HarvestReport::new();
        classify(
            json!({
                "uri": "https://api.sinopia.io/resource/bad",
                "templateId": "x",
                "data": "not a json-ld document"
            }),
            &mut report,
        );
        assert_eq!(report.total, 1);
        assert_eq!(report.parsed_len(), 0);
    }

    #[test]
    fn template_marker_routes_to_templates() {
        let mut report = HarvestReport::new();
        classify(
            json!({
                "uri": "https://api.sinopia.io/resource/t",
                "templateId": "sinopia:template:resource",
                "data": [{"@id": "https://api.sinopia.io/resource/t", "@type": "sinopia:ResourceTemplate"}]
            }),
            &mut report,
        );
        assert_eq!(report.total, 1);
        assert_eq!(report.templates.len(), 1);
        assert!(report.resources.is_empty());
    }

    #[test]
    fn marker_matches_as_substring() {
        let mut report = HarvestReport::new();
        classify(
            json!({
                "uri": "https://api.sinopia.io/resource/t2",
                "templateId": "ld4p:sinopia:template:resource:bf2:Monograph",
                "data": [{"@id": "https://api.sinopia.io/resource/t2"}]
            }),
            &mut report,
        );
        assert_eq!(report.templates.len(), 1);
    }

    #[test]
    fn everything_else_routes_to_resources() {
        let mut report = HarvestReport::new();
        classify(
            json!({
                "uri": "https://api.sinopia.io/resource/r",
                "templateId": "ld4p:RT:bf2:Monograph",
                "data": [{
                    "@id": "https://api.sinopia.io/resource/r",
                    "bf:mainTitle": "A resource"
                }]
            }),
            &mut report,
        );
        assert_eq!(report.resources.len(), 1);
        assert!(report.templates.is_empty());
        // Metadata survives classification; the payload does not.
        assert_eq!(
            report.resources[0].meta.uri.as_deref(),
            Some("https://api.sinopia.io/resource/r")
        );
        assert_eq!(report.resources[0].graph.len(), 1);
    }

    #[test]
    fn missing_template_id_defaults_to_resources() {
        let mut report = HarvestReport::new();
        classify(
            json!({
                "uri": "https://api.sinopia.io/resource/untyped",
                "data": [{"@id": "https://api.sinopia.io/resource/untyped"}]
            }),
            &mut report,
        );
        assert_eq!(report.resources.len(), 1);
    }

    #[test]
    fn buckets_are_exclusive() {
        let mut report = HarvestReport::new();
        for (id, template_id) in [
            ("r1", "ld4p:RT:bf2:Monograph"),
            ("t1", "sinopia:template:resource"),
            ("r2", "ld4p:RT:bf2:Serial"),
        ] {
            classify(
                json!({
                    "uri": format!("https://api.sinopia.io/resource/{}", id),
                    "templateId": template_id,
                    "data": [{"@id": format!("https://api.sinopia.io/resource/{}", id)}]
                }),
                &mut report,
            );
        }
        assert_eq!(report.total, 3);
        assert_eq!(report.resources.len(), 2);
        assert_eq!(report.templates.len(), 1);

        let resource_uris: Vec<_> = report
            .resources
            .iter()
            .filter_map(|r| r.meta.uri.as_deref())
            .collect();
        let template_uris: Vec<_> = report
            .templates
            .iter()
            .filter_map(|r| r.meta.uri.as_deref())
            .collect();
        assert!(resource_uris.iter().all(|u| !template_uris.contains(u)));
    }

    #[test]
    fn bucket_order_follows_classification_order() {
        let mut report = HarvestReport::new();
        for id in ["first", "second", "third"] {
            classify(
                json!({
                    "uri": format!("https://api.sinopia.io/resource/{}", id),
                    "templateId": "ld4p:RT:bf2:Monograph",
                    "data": [{"@id": format!("https://api.sinopia.io/resource/{}", id)}]
                }),
                &mut report,
            );
        }
        let uris: Vec<_> = report
            .resources
            .iter()
            .filter_map(|r| r.meta.uri.as_deref())
            .collect();
        assert_eq!(
            uris,
            vec![
                "https://api.sinopia.io/resource/first",
                "https://api.sinopia.io/resource/second",
                "https://api.sinopia.io/resource/third",
            ]
        );
    }
}
