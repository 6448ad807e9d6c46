//! JSON-LD to RDF graph parsing.
//!
//! Converts the embedded linked-data payload of a harvested record into a
//! set of `oxrdf` triples. The parser covers the shapes the Sinopia API
//! emits: a single node object, an array of node objects, or a document
//! with `@graph`. An inline `@context` extends the fixed namespace table;
//! it never replaces it.
//!
//! Anything outside that subset (`@list`, remote contexts) is reported as
//! an error rather than guessed at. Callers treat every [`JsonLdError`] as
//! a per-record condition: the record is skipped and the harvest continues.

use std::collections::{HashMap, HashSet};

use oxrdf::vocab::{rdf, xsd};
use oxrdf::{BlankNode, Literal, NamedNode, Subject, Term, Triple};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::namespaces::Namespaces;

/// Errors raised while parsing a linked-data payload.
#[derive(Debug, Error)]
pub enum JsonLdError {
    #[error("linked-data payload is not a JSON object or array")]
    NotAnObject,
    #[error("'@graph' must be an array of node objects")]
    InvalidGraph,
    #[error("'@context' entries must map terms to IRIs")]
    InvalidContext,
    #[error("invalid IRI '{0}'")]
    InvalidIri(String),
    #[error("invalid blank node label '{0}'")]
    InvalidBlankNode(String),
    #[error("invalid language tag '{0}'")]
    InvalidLanguageTag(String),
    #[error("unsupported JSON-LD construct '{0}'")]
    Unsupported(String),
}

/// An RDF graph built from one record's payload, labeled with the
/// namespace table it was parsed under.
#[derive(Debug, Clone)]
pub struct RecordGraph {
    /// HashSet deduplicates repeated triples within a payload.
    triples: HashSet<Triple>,
    namespaces: Namespaces,
}

impl RecordGraph {
    pub fn new(namespaces: Namespaces) -> Self {
        Self {
            triples: HashSet::new(),
            namespaces,
        }
    }

    pub fn insert(&mut self, triple: Triple) {
        self.triples.insert(triple);
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// The prefix bindings this graph was parsed under.
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Serialize as N-Triples, sorted for deterministic output.
    pub fn to_ntriples(&self) -> String {
        let mut lines: Vec<String> = self.triples.iter().map(|t| format!("{} .", t)).collect();
        lines.sort();
        lines.join("\n")
    }
}

/// Parse a JSON-LD document into a [`RecordGraph`] carrying the given
/// namespace bindings.
pub fn parse_jsonld(doc: &Value, namespaces: &Namespaces) -> Result<RecordGraph, JsonLdError> {
    let mut parser = Parser::new(namespaces);
    match doc {
        Value::Array(nodes) => {
            for node in nodes {
                parser.parse_entry(node)?;
            }
        }
        Value::Object(map) => {
            parser.load_context(map)?;
            if let Some(graph) = map.get("@graph") {
                let nodes = graph.as_array().ok_or(JsonLdError::InvalidGraph)?;
                for node in nodes {
                    parser.parse_entry(node)?;
                }
            } else {
                parser.parse_node(map)?;
            }
        }
        _ => return Err(JsonLdError::NotAnObject),
    }
    Ok(parser.into_graph())
}

struct Parser<'a> {
    namespaces: &'a Namespaces,
    /// Term and prefix mappings collected from inline `@context` objects.
    context: HashMap<String, String>,
    vocab: Option<String>,
    blank_counter: u64,
    graph: RecordGraph,
}

impl<'a> Parser<'a> {
    fn new(namespaces: &'a Namespaces) -> Self {
        Self {
            namespaces,
            context: HashMap::new(),
            vocab: None,
            blank_counter: 0,
            graph: RecordGraph::new(namespaces.clone()),
        }
    }

    fn into_graph(self) -> RecordGraph {
        self.graph
    }

    /// Merge an inline `@context` into the parser's term table.
    ///
    /// Remote contexts (string values) cannot be fetched here and are
    /// reported as unsupported.
    fn load_context(&mut self, map: &Map<String, Value>) -> Result<(), JsonLdError> {
        let Some(context) = map.get("@context") else {
            return Ok(());
        };
        let entries = match context {
            Value::Object(entries) => entries,
            Value::String(url) => {
                return Err(JsonLdError::Unsupported(format!("remote @context '{}'", url)))
            }
            _ => return Err(JsonLdError::InvalidContext),
        };
        for (term, value) in entries {
            match (term.as_str(), value) {
                ("@vocab", Value::String(iri)) => self.vocab = Some(iri.clone()),
                // @base only matters for relative IRIs, which Sinopia
                // payloads do not use.
                ("@base", _) => {}
                (_, Value::String(iri)) => {
                    self.context.insert(term.clone(), iri.clone());
                }
                (_, Value::Object(def)) => {
                    let iri = def
                        .get("@id")
                        .and_then(Value::as_str)
                        .ok_or(JsonLdError::InvalidContext)?;
                    self.context.insert(term.clone(), iri.to_string());
                }
                _ => return Err(JsonLdError::InvalidContext),
            }
        }
        Ok(())
    }

    /// Parse one entry of a node array or `@graph`.
    fn parse_entry(&mut self, value: &Value) -> Result<Subject, JsonLdError> {
        let map = value.as_object().ok_or(JsonLdError::NotAnObject)?;
        self.load_context(map)?;
        self.parse_node(map)
    }

    /// Parse a node object, inserting its triples and returning its subject.
    fn parse_node(&mut self, map: &Map<String, Value>) -> Result<Subject, JsonLdError> {
        let subject = match map.get("@id") {
            Some(Value::String(id)) => self.subject_for(id)?,
            Some(_) => return Err(JsonLdError::InvalidIri("@id".to_string())),
            None => Subject::BlankNode(self.fresh_blank()),
        };

        for (key, value) in map {
            match key.as_str() {
                "@id" | "@context" => {}
                "@type" => self.parse_types(&subject, value)?,
                keyword if keyword.starts_with('@') => {
                    return Err(JsonLdError::Unsupported(keyword.to_string()))
                }
                term => {
                    // Terms that resolve to no IRI are dropped, matching
                    // JSON-LD processor behavior for unmapped keys.
                    if let Some(predicate) = self.expand_predicate(term)? {
                        self.parse_values(&subject, &predicate, value)?;
                    }
                }
            }
        }
        Ok(subject)
    }

    fn parse_types(&mut self, subject: &Subject, value: &Value) -> Result<(), JsonLdError> {
        let types = match value {
            Value::Array(types) => types.as_slice(),
            single => std::slice::from_ref(single),
        };
        for t in types {
            let term = t.as_str().ok_or(JsonLdError::InvalidIri("@type".to_string()))?;
            let iri = self.expand_required(term)?;
            self.graph
                .insert(Triple::new(subject.clone(), rdf::TYPE, iri));
        }
        Ok(())
    }

    fn parse_values(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        value: &Value,
    ) -> Result<(), JsonLdError> {
        match value {
            Value::Array(values) => {
                for v in values {
                    self.parse_values(subject, predicate, v)?;
                }
            }
            // JSON-LD treats null values as absent.
            Value::Null => {}
            Value::String(s) => self.emit(subject, predicate, Literal::new_simple_literal(s)),
            Value::Number(n) => {
                let literal = number_literal(n);
                self.emit(subject, predicate, literal);
            }
            Value::Bool(b) => self.emit(
                subject,
                predicate,
                Literal::new_typed_literal(b.to_string(), xsd::BOOLEAN),
            ),
            Value::Object(map) => self.parse_object_value(subject, predicate, map)?,
        }
        Ok(())
    }

    fn parse_object_value(
        &mut self,
        subject: &Subject,
        predicate: &NamedNode,
        map: &Map<String, Value>,
    ) -> Result<(), JsonLdError> {
        if map.contains_key("@list") {
            return Err(JsonLdError::Unsupported("@list".to_string()));
        }
        if map.contains_key("@value") {
            let literal = self.value_object_literal(map)?;
            self.emit(subject, predicate, literal);
            return Ok(());
        }
        // A lone @id is a node reference; anything more is an embedded
        // node object that contributes its own triples.
        if map.len() == 1 {
            if let Some(Value::String(id)) = map.get("@id") {
                let object = self.subject_for(id)?;
                self.graph.insert(Triple::new(
                    subject.clone(),
                    predicate.clone(),
                    subject_term(&object),
                ));
                return Ok(());
            }
        }
        let child = self.parse_node(map)?;
        self.graph.insert(Triple::new(
            subject.clone(),
            predicate.clone(),
            subject_term(&child),
        ));
        Ok(())
    }

    fn value_object_literal(&self, map: &Map<String, Value>) -> Result<Literal, JsonLdError> {
        let value = map.get("@value").ok_or(JsonLdError::NotAnObject)?;
        let language = map.get("@language").and_then(Value::as_str);
        let datatype = map.get("@type").and_then(Value::as_str);

        if let Some(lang) = language {
            let lexical = value
                .as_str()
                .ok_or_else(|| JsonLdError::Unsupported("non-string @value with @language".to_string()))?;
            return Literal::new_language_tagged_literal(lexical, lang)
                .map_err(|_| JsonLdError::InvalidLanguageTag(lang.to_string()));
        }
        if let Some(dtype) = datatype {
            let iri = self.expand_required(dtype)?;
            let lexical = scalar_lexical(value)?;
            return Ok(Literal::new_typed_literal(lexical, iri));
        }
        match value {
            Value::String(s) => Ok(Literal::new_simple_literal(s)),
            Value::Number(n) => Ok(number_literal(n)),
            Value::Bool(b) => Ok(Literal::new_typed_literal(b.to_string(), xsd::BOOLEAN)),
            _ => Err(JsonLdError::Unsupported("@value".to_string())),
        }
    }

    fn emit(&mut self, subject: &Subject, predicate: &NamedNode, literal: Literal) {
        self.graph
            .insert(Triple::new(subject.clone(), predicate.clone(), literal));
    }

    /// Resolve an `@id` value to a named or blank subject.
    fn subject_for(&mut self, id: &str) -> Result<Subject, JsonLdError> {
        if let Some(label) = id.strip_prefix("_:") {
            let node = BlankNode::new(label)
                .map_err(|_| JsonLdError::InvalidBlankNode(id.to_string()))?;
            return Ok(Subject::BlankNode(node));
        }
        let iri = self.expand_required(id)?;
        Ok(Subject::NamedNode(iri))
    }

    /// Fresh blank node for a node object without `@id`. The `gen` prefix
    /// keeps generated labels apart from any `_:b…` labels in the payload.
    fn fresh_blank(&mut self) -> BlankNode {
        let label = format!("gen{}", self.blank_counter);
        self.blank_counter += 1;
        BlankNode::new_unchecked(label)
    }

    /// Expand a term that must resolve to a valid IRI (`@id`, `@type`,
    /// datatypes).
    fn expand_required(&self, term: &str) -> Result<NamedNode, JsonLdError> {
        let candidate = self
            .expand_term(term)
            .ok_or_else(|| JsonLdError::InvalidIri(term.to_string()))?;
        NamedNode::new(candidate.clone()).map_err(|_| JsonLdError::InvalidIri(candidate))
    }

    /// Expand a property key. Keys that resolve to no IRI yield `None`
    /// and the property is dropped; keys that resolve to a malformed IRI
    /// are an error.
    fn expand_predicate(&self, term: &str) -> Result<Option<NamedNode>, JsonLdError> {
        match self.expand_term(term) {
            Some(candidate) => NamedNode::new(candidate.clone())
                .map(Some)
                .map_err(|_| JsonLdError::InvalidIri(candidate)),
            None => Ok(None),
        }
    }

    /// Term expansion, in precedence order: inline context term mapping,
    /// inline context prefix, fixed namespace prefix, absolute IRI as-is,
    /// `@vocab` fallback.
    fn expand_term(&self, term: &str) -> Option<String> {
        if let Some(iri) = self.context.get(term) {
            return Some(iri.clone());
        }
        if let Some((prefix, local)) = term.split_once(':') {
            if let Some(ns) = self.context.get(prefix) {
                return Some(format!("{}{}", ns, local));
            }
            if let Some(iri) = self.namespaces.expand(term) {
                return Some(iri);
            }
            // A colon with an unbound prefix is taken as an absolute IRI
            // (http:, urn:, mailto:); validity is checked by the caller.
            return Some(term.to_string());
        }
        self.vocab.as_ref().map(|vocab| format!("{}{}", vocab, term))
    }
}

fn number_literal(n: &serde_json::Number) -> Literal {
    if n.is_i64() || n.is_u64() {
        Literal::new_typed_literal(n.to_string(), xsd::INTEGER)
    } else {
        Literal::new_typed_literal(n.to_string(), xsd::DOUBLE)
    }
}

fn scalar_lexical(value: &Value) -> Result<String, JsonLdError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(JsonLdError::Unsupported("@value".to_string())),
    }
}

fn subject_term(subject: &Subject) -> Term {
    match subject {
        Subject::NamedNode(n) => Term::NamedNode(n.clone()),
        Subject::BlankNode(b) => Term::BlankNode(b.clone()),
        #[allow(unreachable_patterns)]
        _ => unreachable!("the parser only produces named and blank subjects"),
    }
}
