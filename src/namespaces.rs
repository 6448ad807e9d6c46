//! The fixed namespace prefix table bound to every harvested graph.
//!
//! The Sinopia vocabulary set is a constant of the system: the five
//! prefix→IRI bindings below must be reproduced exactly for compatible
//! graph serialization. The table is an immutable value passed into
//! graph construction, never process-global state.

/// Prefix→IRI bindings used for CURIE expansion and IRI compaction.
#[derive(Debug, Clone)]
pub struct Namespaces {
    bindings: Vec<(String, String)>,
}

impl Namespaces {
    /// The standard Sinopia binding set: `bf`, `bflc`, `mads`, `skos`,
    /// and `sinopia`.
    pub fn sinopia() -> Self {
        Self::from_pairs(&[
            ("bf", "http://id.loc.gov/ontologies/bibframe/"),
            ("bflc", "http://id.loc.gov/ontologies/bflc/"),
            ("mads", "http://www.loc.gov/mads/rdf/v1#"),
            ("skos", "http://www.w3.org/2004/02/skos/core#"),
            ("sinopia", "http://sinopia.io/vocabulary/"),
        ])
    }

    /// Build a table from literal pairs. Order is preserved for display.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            bindings: pairs
                .iter()
                .map(|(p, iri)| (p.to_string(), iri.to_string()))
                .collect(),
        }
    }

    /// Look up the IRI bound to a prefix.
    pub fn iri(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, iri)| iri.as_str())
    }

    /// Expand a CURIE (`prefix:local`) against the table.
    ///
    /// Returns `None` when the term has no colon or the prefix is unbound,
    /// so callers can fall through to other resolution strategies.
    pub fn expand(&self, term: &str) -> Option<String> {
        let (prefix, local) = term.split_once(':')?;
        let iri = self.iri(prefix)?;
        Some(format!("{}{}", iri, local))
    }

    /// Compact an IRI back to CURIE form, preferring the longest matching
    /// namespace. Unmatched IRIs are returned unchanged.
    pub fn compact(&self, iri: &str) -> String {
        let mut best: Option<&(String, String)> = None;
        for binding in &self.bindings {
            if iri.starts_with(&binding.1) {
                if best.is_none() || binding.1.len() > best.unwrap().1.len() {
                    best = Some(binding);
                }
            }
        }
        match best {
            Some((prefix, ns)) => format!("{}:{}", prefix, &iri[ns.len()..]),
            None => iri.to_string(),
        }
    }

    /// Iterate over `(prefix, iri)` bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(p, iri)| (p.as_str(), iri.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
