// Model exports
pub mod card;
pub mod domain;
pub mod requests;
pub mod responses;

pub use card::{CandidateCard, CardKey, FaceState, Interest, VerdictState, VerdictWrite};
pub use domain::{FilterSpec, MatchLink, UserProfile};
pub use requests::PendingWrite;
pub use responses::{DeckSnapshot, FilterReport, OutboxReport, PopulateReport};
