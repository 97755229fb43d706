//! OMDb access layer: request building, transport, retry and outcome
//! classification.

pub mod client;
pub mod record;
pub mod request;
pub mod transport;

pub use client::{ErrorKind, FetchError, LookupOutcome, OmdbClient, RetryPolicy, Sleeper, TokioSleeper};
pub use record::{Field, MovieRecord, SearchPage, NOT_AVAILABLE};
pub use request::{LookupRequest, MediaType, RequestError};
pub use transport::{HttpTransport, MovieTransport, TransportError};
