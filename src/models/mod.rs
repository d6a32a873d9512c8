mod link;

pub use link::{GenerateResponse, ResolveRequest, ShortLink, ShortenRequest, ShortenResponse};
