use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfiguration {
    pub use_apify_proxy: bool,
    pub apify_proxy_groups: Vec<String>,
}

impl Default for ProxyConfiguration {
    fn default() -> Self {
        ProxyConfiguration {
            use_apify_proxy: true,
            apify_proxy_groups: vec!["RESIDENTIAL".to_string()],
        }
    }
}

/// Input document for the Instagram scraper actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScraperInput {
    pub direct_urls: Vec<String>,
    pub hashtags: Vec<String>,
    pub search_queries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_limit: Option<u32>,
    pub results_type: String,
    pub results_limit: u32,
    pub add_parent_data: bool,
    pub add_metadata: bool,
    pub enhance_user_search_with_facebook_page: bool,
    #[serde(rename = "isUserReelFeedURL")]
    pub is_user_reel_feed_url: bool,
    #[serde(rename = "isUserTaggedFeedURL")]
    pub is_user_tagged_feed_url: bool,
    pub proxy_configuration: ProxyConfiguration,
}

impl ScraperInput {
    /// Posts found under the given hashtags, reported with owner details.
    pub fn hashtag_search<I, S>(hashtags: I, results_limit: u32, search_limit: u32) -> ScraperInput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ScraperInput {
            direct_urls: vec![],
            hashtags: hashtags
                .into_iter()
                .map(|h| h.as_ref().trim().trim_start_matches('#').to_string())
                .filter(|h| !h.is_empty())
                .collect(),
            search_queries: vec![],
            search_type: Some("hashtag".to_string()),
            search_limit: Some(search_limit),
            results_type: "details".to_string(),
            results_limit,
            add_parent_data: false,
            add_metadata: true,
            enhance_user_search_with_facebook_page: false,
            is_user_reel_feed_url: false,
            is_user_tagged_feed_url: false,
            proxy_configuration: ProxyConfiguration::default(),
        }
    }

    /// Profile details of the given accounts.
    pub fn profile_details<I, S>(handles: I) -> ScraperInput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let direct_urls: Vec<String> = handles
            .into_iter()
            .map(|h| crate::vendor::normalize_handle(h.as_ref()))
            .filter(|h| !h.is_empty())
            .map(|h| format!("https://www.instagram.com/{}/", h))
            .collect();

        ScraperInput {
            results_limit: u32::try_from(direct_urls.len()).unwrap_or(u32::MAX),
            direct_urls,
            hashtags: vec![],
            search_queries: vec![],
            search_type: None,
            search_limit: None,
            results_type: "details".to_string(),
            add_parent_data: true,
            add_metadata: true,
            enhance_user_search_with_facebook_page: true,
            is_user_reel_feed_url: false,
            is_user_tagged_feed_url: false,
            proxy_configuration: ProxyConfiguration::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn hashtag_search_document() {
        let input = ScraperInput::hashtag_search(["#dallasweddingflorist", " ", "txbridalflowers"], 30, 25);
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "directUrls": [],
                "hashtags": ["dallasweddingflorist", "txbridalflowers"],
                "searchQueries": [],
                "searchType": "hashtag",
                "searchLimit": 25,
                "resultsType": "details",
                "resultsLimit": 30,
                "addParentData": false,
                "addMetadata": true,
                "enhanceUserSearchWithFacebookPage": false,
                "isUserReelFeedURL": false,
                "isUserTaggedFeedURL": false,
                "proxyConfiguration": {
                    "useApifyProxy": true,
                    "apifyProxyGroups": ["RESIDENTIAL"]
                }
            })
        );
    }

    #[test]
    fn profile_details_document() {
        let input = ScraperInput::profile_details(vec!["@KleinFeld", "bhldn"]);
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(
            value["directUrls"],
            json!([
                "https://www.instagram.com/kleinfeld/",
                "https://www.instagram.com/bhldn/"
            ])
        );
        assert_eq!(value["resultsLimit"], json!(2));
        assert!(value.get("searchType").is_none());
    }
}
