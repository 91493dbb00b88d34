use crate::{utils, Category};
use chrono::{DateTime, Utc};
use lazy_regex::regex;
use std::fmt;

pub const MAX_BIO_CHARS: usize = 500;

/// Lower-cases a handle and strips `@` and any `instagram.com/` prefix.
pub fn normalize_handle(raw: &str) -> String {
    let raw = raw.trim();
    let raw = match regex!(r"(?i)instagram\.com/([^/?#\s]+)").captures(raw) {
        Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()),
        None => raw,
    };
    raw.trim_start_matches('@')
        .trim_end_matches('/')
        .to_lowercase()
}

pub fn instagram_url(handle: &str) -> String {
    format!("https://www.instagram.com/{}", handle)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorRecord {
    pub handle: String,
    pub business_name: Option<String>,
    pub category: Category,
    pub subcategory: Option<String>,
    pub bio: String,
    pub instagram_url: Option<String>,
    pub website_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub follower_count: i64,
    pub post_count: i64,
    pub is_verified: bool,
    pub is_business_account: bool,
    pub profile_image_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VendorRecord {
    /// A fresh record with normalised handle, canonical Instagram URL and
    /// both timestamps set to now.
    pub fn new(handle: &str, category: Category) -> VendorRecord {
        let handle = normalize_handle(handle);
        let now = utils::get_now();
        VendorRecord {
            instagram_url: Some(instagram_url(&handle)),
            handle,
            business_name: None,
            category,
            subcategory: None,
            bio: String::new(),
            website_url: None,
            email: None,
            phone: None,
            follower_count: 0,
            post_count: 0,
            is_verified: false,
            is_business_account: false,
            profile_image_url: None,
            city: None,
            state: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_bio(mut self, bio: &str) -> VendorRecord {
        self.bio = utils::truncate_chars(bio.trim(), MAX_BIO_CHARS);
        self
    }
}

impl fmt::Display for VendorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_none(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or("None")
        }

        writeln!(f, "Handle          : @{}", self.handle)?;
        writeln!(f, "Business Name   : {}", or_none(&self.business_name))?;
        writeln!(f, "Category        : {}", self.category)?;
        writeln!(f, "Subcategory     : {}", or_none(&self.subcategory))?;
        writeln!(
            f,
            "Location        : {}, {}",
            or_none(&self.city),
            or_none(&self.state)
        )?;
        writeln!(
            f,
            "Followers/Posts : {}/{}",
            self.follower_count, self.post_count
        )?;
        writeln!(f, "Email           : {}", or_none(&self.email))?;
        writeln!(f, "Phone           : {}", or_none(&self.phone))?;
        writeln!(f, "Website         : {}", or_none(&self.website_url))?;
        writeln!(f, "Bio             : {}", self.bio.replace('\n', "\n  "))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_handles() {
        assert_eq!(normalize_handle(" @BloomsDallas "), "bloomsdallas");
        assert_eq!(
            normalize_handle("https://www.instagram.com/Twig.And.Cotton/"),
            "twig.and.cotton"
        );
        assert_eq!(
            normalize_handle("instagram.com/glam_by_ash?igshid=abc"),
            "glam_by_ash"
        );
        assert_eq!(normalize_handle("plain"), "plain");
    }

    #[test]
    fn new_record_has_canonical_url() {
        let r = VendorRecord::new("@LovelyPlanning", Category::WeddingPlanners);
        assert_eq!(r.handle, "lovelyplanning");
        assert_eq!(
            r.instagram_url.as_deref(),
            Some("https://www.instagram.com/lovelyplanning")
        );
        assert_eq!(r.created_at, r.updated_at);
    }

    #[test]
    fn bio_is_truncated() {
        let long = "x".repeat(MAX_BIO_CHARS + 20);
        let r = VendorRecord::new("a", Category::Venues).with_bio(&long);
        assert_eq!(r.bio.chars().count(), MAX_BIO_CHARS);
    }
}
