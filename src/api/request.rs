use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::ValidationError;
use crate::crawler::{
    CrawlParams, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, DEPTH_RANGE, PAGES_RANGE,
};

/// http(s) scheme, then a dotted domain, `localhost` or an IPv4 address, an
/// optional port and an optional path
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$",
    )
    .expect("URL pattern is valid")
});

/// Body of `POST /v1/scraper/crawl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRequest {
    /// Base URL of the clinic website
    pub url: String,

    /// Link depth to follow, 3 when absent or null
    #[serde(default)]
    pub max_depth: Option<i64>,

    /// Pages to crawl at most, 50 when absent or null
    #[serde(default)]
    pub max_pages: Option<i64>,
}

impl CrawlRequest {
    /// Check the request and turn it into crawl parameters
    ///
    /// Limits outside their range are rejected, not clamped.
    pub fn validate(&self) -> Result<CrawlParams, ValidationError> {
        let url = self.url.trim();
        if !URL_PATTERN.is_match(url) {
            return Err(ValidationError::InvalidUrl);
        }
        let seed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl)?;

        Ok(CrawlParams {
            seed,
            url: self.url.clone(),
            max_depth: limit("max_depth", self.max_depth, DEPTH_RANGE, DEFAULT_MAX_DEPTH)?,
            max_pages: limit("max_pages", self.max_pages, PAGES_RANGE, DEFAULT_MAX_PAGES)?,
        })
    }
}

fn limit(
    field: &'static str,
    value: Option<i64>,
    range: RangeInclusive<u32>,
    default: u32,
) -> Result<u32, ValidationError> {
    let Some(value) = value else {
        return Ok(default);
    };
    u32::try_from(value)
        .ok()
        .filter(|v| range.contains(v))
        .ok_or(ValidationError::OutOfRange {
            field,
            min: *range.start(),
            max: *range.end(),
            value,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, max_depth: Option<i64>, max_pages: Option<i64>) -> CrawlRequest {
        CrawlRequest {
            url: url.to_string(),
            max_depth,
            max_pages,
        }
    }

    #[test]
    fn test_defaults_apply() {
        let params = request("https://happypaws.com", None, None).validate().unwrap();
        assert_eq!(params.seed.as_str(), "https://happypaws.com/");
        assert_eq!(params.url, "https://happypaws.com");
        assert_eq!(params.max_depth, 3);
        assert_eq!(params.max_pages, 50);
    }

    #[test]
    fn test_requested_url_is_kept_verbatim() {
        let params = request("HTTPS://HappyPaws.com/About", None, None)
            .validate()
            .unwrap();
        assert_eq!(params.url, "HTTPS://HappyPaws.com/About");
        assert_eq!(params.seed.as_str(), "https://happypaws.com/About");
    }

    #[test]
    fn test_null_limits_mean_default() {
        let req: CrawlRequest = serde_json::from_str(
            r#"{"url": "https://happypaws.com", "max_depth": null, "max_pages": 10}"#,
        )
        .unwrap();
        let params = req.validate().unwrap();
        assert_eq!(params.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(params.max_pages, 10);
    }

    #[test]
    fn test_limits_out_of_range() {
        assert_eq!(
            request("https://happypaws.com", Some(11), None).validate(),
            Err(ValidationError::OutOfRange {
                field: "max_depth",
                min: 1,
                max: 10,
                value: 11
            })
        );
        assert!(request("https://happypaws.com", Some(0), None).validate().is_err());
        assert!(request("https://happypaws.com", None, Some(201)).validate().is_err());
        assert!(request("https://happypaws.com", None, Some(-1)).validate().is_err());
        assert!(request("https://happypaws.com", Some(10), Some(200)).validate().is_ok());
        assert!(request("https://happypaws.com", Some(1), Some(1)).validate().is_ok());
    }

    #[test]
    fn test_url_format() {
        for ok in [
            "http://localhost:8000",
            "https://192.168.1.10/clinic",
            "https://www.happy-paws.co.uk/about?tab=team",
            "HTTPS://HAPPYPAWS.COM/",
        ] {
            assert!(request(ok, None, None).validate().is_ok(), "{ok}");
        }
        for bad in [
            "happypaws.com",
            "ftp://happypaws.com",
            "https://happypaws",
            "https://happy paws.com",
            "",
        ] {
            assert_eq!(
                request(bad, None, None).validate(),
                Err(ValidationError::InvalidUrl),
                "{bad}"
            );
        }
    }
}
