use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocationData {
    #[serde(default)]
    pub name: Option<String>,
}

/// One item of a scraping job's dataset.
///
/// Depending on the search type the scraper reports the account either
/// under `ownerX` fields (hashtag/post results) or plain fields (profile
/// details), so every accessor prefers the owner form and falls back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProfile {
    pub owner_username: Option<String>,
    pub username: Option<String>,
    pub handle: Option<String>,

    pub owner_full_name: Option<String>,
    pub full_name: Option<String>,

    pub owner_bio: Option<String>,
    #[serde(alias = "biography")]
    pub bio: Option<String>,

    pub owner_followers_count: Option<i64>,
    pub followers_count: Option<i64>,

    pub owner_posts_count: Option<i64>,
    pub posts_count: Option<i64>,

    pub owner_external_url: Option<String>,
    pub external_url: Option<String>,

    pub owner_is_verified: Option<bool>,
    pub verified: Option<bool>,

    pub owner_is_business_account: Option<bool>,
    pub is_business_account: Option<bool>,

    pub owner_profile_pic_url: Option<String>,
    pub profile_pic_url: Option<String>,

    pub location_data: Option<LocationData>,

    pub error: Option<String>,
}

fn first_non_empty<'a>(values: &[&'a Option<String>]) -> Option<&'a str> {
    values
        .iter()
        .filter_map(|v| v.as_deref())
        .map(str::trim)
        .find(|v| !v.is_empty())
}

impl RawProfile {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn handle(&self) -> Option<String> {
        first_non_empty(&[&self.owner_username, &self.username, &self.handle])
            .map(crate::vendor::normalize_handle)
            .filter(|h| !h.is_empty())
    }

    pub fn full_name(&self) -> Option<&str> {
        first_non_empty(&[&self.owner_full_name, &self.full_name])
    }

    pub fn bio(&self) -> &str {
        self.owner_bio
            .as_deref()
            .filter(|b| !b.is_empty())
            .or(self.bio.as_deref())
            .unwrap_or_default()
    }

    pub fn followers(&self) -> i64 {
        self.owner_followers_count
            .filter(|&n| n > 0)
            .or(self.followers_count)
            .unwrap_or(0)
    }

    pub fn posts(&self) -> i64 {
        self.owner_posts_count
            .filter(|&n| n > 0)
            .or(self.posts_count)
            .unwrap_or(0)
    }

    pub fn external_url(&self) -> Option<&str> {
        first_non_empty(&[&self.owner_external_url, &self.external_url])
    }

    pub fn is_verified(&self) -> bool {
        self.owner_is_verified.unwrap_or(false) || self.verified.unwrap_or(false)
    }

    pub fn is_business_account(&self) -> bool {
        self.owner_is_business_account.unwrap_or(false)
            || self.is_business_account.unwrap_or(false)
    }

    pub fn profile_pic_url(&self) -> Option<&str> {
        first_non_empty(&[&self.owner_profile_pic_url, &self.profile_pic_url])
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location_data
            .as_ref()
            .and_then(|l| l.name.as_deref())
            .filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn owner_fields_take_precedence() {
        let p: RawProfile = serde_json::from_str(
            r#"{
                "ownerUsername": "BloomsDallas",
                "username": "someone_else",
                "ownerBio": "Dallas florist",
                "bio": "ignored",
                "ownerFollowersCount": 1400,
                "followersCount": 10,
                "ownerIsVerified": false,
                "verified": true,
                "ownerExternalUrl": ""
            }"#,
        )
        .unwrap();

        assert_eq!(p.handle().as_deref(), Some("bloomsdallas"));
        assert_eq!(p.bio(), "Dallas florist");
        assert_eq!(p.followers(), 1400);
        assert!(p.is_verified());
        assert_eq!(p.external_url(), None);
    }

    #[test]
    fn falls_back_to_plain_fields() {
        let p: RawProfile = serde_json::from_str(
            r#"{
                "username": "@twigandcotton",
                "fullName": "Twig and Cotton",
                "biography": "Wedding florist",
                "followersCount": 2200,
                "postsCount": 340,
                "externalUrl": "https://twigandcotton.com",
                "isBusinessAccount": true,
                "profilePicUrl": "https://cdn/p.jpg",
                "locationData": { "name": "Dallas, Texas" }
            }"#,
        )
        .unwrap();

        assert_eq!(p.handle().as_deref(), Some("twigandcotton"));
        assert_eq!(p.full_name(), Some("Twig and Cotton"));
        assert_eq!(p.bio(), "Wedding florist");
        assert_eq!(p.followers(), 2200);
        assert_eq!(p.posts(), 340);
        assert_eq!(p.external_url(), Some("https://twigandcotton.com"));
        assert!(p.is_business_account());
        assert_eq!(p.profile_pic_url(), Some("https://cdn/p.jpg"));
        assert_eq!(p.location_name(), Some("Dallas, Texas"));
        assert!(!p.is_error());
    }

    #[test]
    fn error_items_and_nulls() {
        let p: RawProfile =
            serde_json::from_str(r#"{"error": "not_found", "followersCount": null}"#).unwrap();
        assert!(p.is_error());
        assert_eq!(p.handle(), None);
        assert_eq!(p.followers(), 0);
        assert_eq!(p.bio(), "");
    }
}
