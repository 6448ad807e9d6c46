//! # Sinopia Harvest
//!
//! A pagination-driven harvester for Sinopia linked-data records.
//!
//! Sinopia Harvest walks a paged Sinopia API collection endpoint, parses
//! the embedded JSON-LD payload of each record into an RDF graph, and
//! sorts the results into resource and template buckets of an in-memory
//! report.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌────────────┐   ┌───────────────┐
//! │ Paginator │──▶│ Classifier │──▶│ HarvestReport │
//! │ next-link │   │ JSON-LD →  │   │ resources /   │
//! │ traversal │   │ RDF graph  │   │ templates     │
//! └───────────┘   └────────────┘   └───────────────┘
//! ```
//!
//! The harvest is fully sequential: one blocking request at a time, no
//! retries, no persistence. An error status on a pagination request ends
//! the traversal and the partial report is returned; a network failure
//! aborts the run.
//!
//! ## Quick Start
//!
//! ```bash
//! sinharv harvest                              # harvest the default endpoint
//! sinharv harvest https://stage.sinopia.io/resource --group stanford
//! sinharv namespaces                           # show the fixed prefix table
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Records, pages, and the harvest report |
//! | [`namespaces`] | The fixed prefix→IRI table |
//! | [`jsonld`] | JSON-LD to RDF graph parsing |
//! | [`classify`] | Per-record bucket placement |
//! | [`harvest`] | The pagination loop |
//! | [`progress`] | Progress reporting on stderr |

pub mod classify;
pub mod config;
pub mod harvest;
pub mod jsonld;
pub mod models;
pub mod namespaces;
pub mod progress;
