//! Match pipeline
//!
//! Seed resolution, criteria derivation, candidate search with local
//! re-validation, photo harvesting and ranking, and the driver that stores
//! the results:
//!
//! ```text
//! seed id -> resolver -> criteria -> search -> (resolver per hit)
//!         -> harvester -> store
//! ```

pub mod criteria;
pub mod photos;
pub mod resolver;
pub mod search;
pub mod service;

pub use photos::PhotoHarvester;
pub use resolver::ProfileResolver;
pub use search::CandidateSearch;
pub use service::MatchReport;
pub use service::MatchService;
pub use service::MatchedCandidate;
