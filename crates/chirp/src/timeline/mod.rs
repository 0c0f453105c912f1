//! User timeline types and query options.

mod options;
mod types;

pub use options::UserTimelineOptions;
pub use types::{CREATED_AT_FORMAT, Entities, Tweet, UrlEntity, parse_created_at};
