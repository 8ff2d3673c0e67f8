//! Affinity-based matching of people under capacity constraints.
//!
//! Matches two populations (mentors and mentees, papers and reviewers) or
//! one population with itself (conference "mind matching"), maximizing
//! total profile similarity while honoring per-entity capacity bounds and
//! conflicts of interest. Peer matches are then scheduled into timeslots.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Entity`, `AffinityMatrix`, `BoundPair`,
//!   `CapacityBounds`, `ExclusionSet`, `Assignment`
//! - **`profile`**: Text normalization into token sequences, seniority and
//!   time-zone parsing
//! - **`affinity`**: Term weighting, low-rank projection, cosine affinity,
//!   weighted composition
//! - **`conflicts`**: Exclusion sets from affiliations, seniority, time
//!   zones, and fuzzy-matched exclusion requests
//! - **`lp`**: Sparse LP encoding, pluggable solver, rounding
//! - **`scheduler`**: Line-graph coloring into timeslots, table assignment
//! - **`report`**: Output rows and match KPIs
//! - **`pipeline`**: `Matcher`, the end-to-end runs
//! - **`validation`**: Input integrity and post-condition checks
//! - **`config`**: `MatchConfig`, every tunable policy value
//!
//! # Quick start
//!
//! ```
//! use u_match::config::MatchConfig;
//! use u_match::models::{BoundPair, Entity};
//! use u_match::pipeline::Matcher;
//!
//! let papers = vec![
//!     Entity::new(1).with_profile_field("grid cells entorhinal"),
//!     Entity::new(2).with_profile_field("language models syntax"),
//! ];
//! let reviewers = vec![
//!     Entity::new(10).with_profile_field("entorhinal grid cells"),
//!     Entity::new(11).with_profile_field("syntax language models"),
//!     Entity::new(12).with_profile_field("grid cells"),
//!     Entity::new(13).with_profile_field("language syntax"),
//! ];
//! let config = MatchConfig::reviewing()
//!     .with_bounds(BoundPair::exactly(2), BoundPair::exactly(1));
//! let outcome = Matcher::new(config).match_bipartite(&papers, &reviewers).unwrap();
//! assert_eq!(outcome.rows[0].right_ids_joined(), "10;12");
//! ```
//!
//! # References
//!
//! - Charlin & Zemel (2013), "The Toronto Paper Matching System"
//! - Schrijver (2003), "Combinatorial Optimization", Ch. 21
//! - Vizing (1964), "On an estimate of the chromatic class of a p-graph"

pub mod affinity;
pub mod config;
pub mod conflicts;
pub mod error;
pub mod lp;
pub mod models;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod scheduler;
pub mod validation;

pub use config::MatchConfig;
pub use error::{MatchError, MatchResult};
pub use pipeline::{MatchOutcome, Matcher, PeerOutcome};
