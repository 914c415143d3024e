//! Clients for the services the almanac pulls data from: an
//! OpenAI-compatible chat endpoint for text extraction, IGDB and the Steam
//! store for title translations, and Gamersky release listings.

pub mod error;
pub mod extract;
pub mod gamersky;
pub mod igdb;
pub mod llm;
pub mod rate_limit;
pub mod steam;

pub use error::FetchError;
pub use extract::{
    ExtractedGame, Extraction, GameCandidate, Rejection, ShowcaseCandidate, extract_games,
    extract_showcases,
};
pub use gamersky::{DEFAULT_PLATFORMS, GamerskyClient, ListingItem, ListingPage, build_urls};
pub use igdb::{IgdbClient, TitleNames};
pub use llm::LlmClient;
pub use rate_limit::RateLimiter;
pub use steam::{SteamClient, SteamNames};
