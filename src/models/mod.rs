//! Matching domain models.
//!
//! Provides the typed data passed between pipeline stages: entities,
//! affinity matrices, capacity bounds, exclusion sets, and the discrete
//! assignment. Stages communicate only through these types.
//!
//! # Domain Mappings
//!
//! | u-match | Mentoring | Peer review | Mind matching |
//! |---------|-----------|-------------|---------------|
//! | Row entity | Mentor | Paper | Attendee |
//! | Column entity | Mentee | Reviewer | Attendee |
//! | Exclusion | Same institution | Co-author | "Do not match me with" |
//! | Assignment | Mentor groups | Review load | Meeting list |

mod assignment;
mod bounds;
mod entity;
mod exclusion;
mod matrix;

pub use assignment::{Assignment, Violation, ViolationType};
pub use bounds::{BoundPair, CapacityBounds};
pub use entity::{Attendance, Entity, EntityId};
pub use exclusion::ExclusionSet;
pub use matrix::AffinityMatrix;
