//! A guided tour of where a running program keeps its data: stack locals,
//! heap values, statics, constants, thread-local slots and a memory-mapped
//! buffer.
//!
//! ```text
//!   race-memory-tour
//!   ├── car          - heap value holder with two named constructors
//!   ├── counter      - static race counter behind an explicit context
//!   ├── thread_slot  - lazily assigned per-thread identifier
//!   ├── mapped       - named fixed-size memory-mapped region
//!   ├── tour         - the ordered walk through all of the above
//!   └── error        - crate error type
//! ```

pub mod car;
pub mod counter;
pub mod error;
pub mod mapped;
pub mod thread_slot;
pub mod tour;

pub use car::Car;
pub use counter::{RaceContext, RACE_TYPE};
pub use error::{Result, TourError};
pub use mapped::{round_trip, MappedRegion, ReadView, WriteView};
pub use thread_slot::{ThreadContext, ThreadObservation};
pub use tour::{Tour, TourSettings, TourSummary};
