//! Keyword and regex heuristics applied to scraped profile bios.

mod contact;
mod hashtags;
mod location;
mod naming;
mod quality;

pub use contact::{extract_contact, extract_email, extract_phone};
pub use hashtags::{contextual_hashtags, hashtags_for, DEFAULT_HASHTAG_LIMIT};
pub use location::{extract_location, state_name};
pub use naming::{business_name, subcategory};
pub use quality::quality_score;
