pub mod aggregate;
pub mod batch;
pub mod export;
pub mod metadata;
pub mod resolver;
pub mod reviews;
pub mod sentiment;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod text;
pub mod traits;

pub use batch::{parse_tokens, run_batch, BatchOptions, BatchReport, PlaceToken};
pub use reviews::{collect_reviews, FetchOutcome, ReviewFetch, ReviewOptions, StopReason};
pub use sentiment::{classify, PolarityAnalyzer, VaderAnalyzer};
pub use text::normalize;
pub use traits::PlacesApi;
