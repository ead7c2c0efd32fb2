//! # Content Aggregator
//!
//! Combines the markdown of crawled pages into a single bounded text blob, the
//! input of one extraction call. The budget keeps the cost of that call under
//! control no matter how large the crawl was.
//!
//! Pages are appended in crawl order, each under a `--- PAGE: {url} ---`
//! header so the model can trace facts back to their source. Oversized pages
//! are capped individually; once the total budget is reached the remaining
//! pages are left out rather than cut mid-page, unless the very first page
//! alone is over budget, in which case it is hard-cut.

use tracing::{debug, instrument, warn};

use crate::crawler::PageResult;
use crate::markdown::visible_char_count;

/// Marker appended to pages cut at the per-page cap
pub const TRUNCATION_MARKER: &str = "\n...[content truncated]";

/// Configuration for aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Budget for the whole blob, in bytes
    pub max_total_chars: usize,

    /// Cap applied to each page before it is added, in bytes
    pub max_chars_per_page: usize,

    /// Visible characters needed before the blob is worth extracting from
    pub min_content_chars: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_total_chars: 500_000,
            max_chars_per_page: 50_000,
            min_content_chars: 100,
        }
    }
}

/// Text built from a crawl, ready for extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedContent {
    /// The combined page sections
    pub text: String,

    /// Number of pages that contributed text
    pub pages_included: usize,

    /// Visible (non-markup, non-whitespace) characters of the included pages
    pub visible_chars: usize,

    /// Whether any page was cut or left out because of the budget
    pub truncated: bool,
}

impl AggregatedContent {
    /// Whether the blob carries enough content to extract from
    pub fn is_usable(&self, config: &AggregatorConfig) -> bool {
        self.pages_included > 0 && self.visible_chars >= config.min_content_chars
    }
}

/// Combine crawled pages into one bounded blob
///
/// # Arguments
///
/// * `pages` - Crawled pages in discovery order
/// * `config` - Budget settings
///
/// # Returns
///
/// The aggregated content, whose `text.len()` never exceeds
/// `config.max_total_chars`
#[instrument(skip_all, fields(pages = pages.len()))]
pub fn aggregate(pages: &[PageResult], config: &AggregatorConfig) -> AggregatedContent {
    let mut out = AggregatedContent::default();

    for (index, page) in pages.iter().enumerate() {
        if page.content.trim().is_empty() {
            debug!(url = %page.url, "Skipping empty page");
            continue;
        }

        let (body, page_cut) = cap_page(&page.content, config.max_chars_per_page);
        let header = format!("--- PAGE: {} ---\n", page.url);
        let header_len = header.len();
        let section = format!("{header}{body}\n\n");
        out.truncated |= page_cut;

        let added = if out.text.len() + section.len() <= config.max_total_chars {
            section.as_str()
        } else if out.pages_included == 0 {
            warn!(url = %page.url, "First page exceeds the content budget, cutting it");
            out.truncated = true;
            truncate_at_boundary(&section, config.max_total_chars)
        } else {
            debug!(url = %page.url, "Content budget reached");
            out.truncated = true;
            break;
        };

        out.text.push_str(added);
        out.pages_included += 1;
        out.visible_chars += visible_char_count(added.get(header_len..).unwrap_or(""));
        if out.text.len() >= config.max_total_chars {
            out.truncated |= has_content(&pages[index + 1..]);
            break;
        }
    }

    debug!(
        chars = out.text.len(),
        pages_included = out.pages_included,
        truncated = out.truncated,
        "Aggregated crawl content"
    );
    out
}

/// Whether any of `pages` would have added a section
fn has_content(pages: &[PageResult]) -> bool {
    pages.iter().any(|page| !page.content.trim().is_empty())
}

/// Cap a page at `max` bytes, appending the truncation marker when cut
fn cap_page(content: &str, max: usize) -> (String, bool) {
    if content.len() <= max {
        (content.to_string(), false)
    } else {
        let mut capped = truncate_at_boundary(content, max).to_string();
        capped.push_str(TRUNCATION_MARKER);
        (capped, true)
    }
}

/// Longest prefix of `s` that is at most `max` bytes and ends on a char boundary
fn truncate_at_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, content: &str) -> PageResult {
        PageResult {
            url: url.to_string(),
            title: None,
            content: content.to_string(),
            depth: 1,
        }
    }

    #[test]
    fn test_pages_are_joined_in_crawl_order() {
        let pages = vec![
            page("https://vet.test/", "Welcome to Happy Paws."),
            page("https://vet.test/hours", "Monday: 9am-5pm"),
        ];
        let out = aggregate(&pages, &AggregatorConfig::default());

        assert_eq!(
            out.text,
            "--- PAGE: https://vet.test/ ---\nWelcome to Happy Paws.\n\n\
             --- PAGE: https://vet.test/hours ---\nMonday: 9am-5pm\n\n"
        );
        assert_eq!(out.pages_included, 2);
        assert!(!out.truncated);
    }

    #[test]
    fn test_blank_pages_are_skipped() {
        let pages = vec![
            page("https://vet.test/empty", "   \n\t"),
            page("https://vet.test/", "Cats and dogs welcome."),
        ];
        let out = aggregate(&pages, &AggregatorConfig::default());

        assert_eq!(out.pages_included, 1);
        assert!(!out.text.contains("/empty"));
    }

    #[test]
    fn test_long_page_is_capped_with_marker() {
        let config = AggregatorConfig {
            max_chars_per_page: 10,
            ..AggregatorConfig::default()
        };
        let out = aggregate(&[page("https://vet.test/", &"a".repeat(50))], &config);

        assert!(out.text.contains(&format!("{}{}", "a".repeat(10), TRUNCATION_MARKER)));
        assert!(!out.text.contains(&"a".repeat(11)));
        assert!(out.truncated);
    }

    #[test]
    fn test_budget_stops_before_a_page_that_does_not_fit() {
        let config = AggregatorConfig {
            max_total_chars: 120,
            ..AggregatorConfig::default()
        };
        let pages = vec![
            page("https://vet.test/a", &"a".repeat(40)),
            page("https://vet.test/b", &"b".repeat(40)),
            page("https://vet.test/c", "c"),
        ];
        let out = aggregate(&pages, &config);

        assert_eq!(out.pages_included, 1);
        assert!(out.text.ends_with("\n\n"));
        assert!(!out.text.contains('b'));
        assert!(out.truncated);
    }

    #[test]
    fn test_exact_budget_with_only_blank_pages_left_is_not_truncated() {
        let config = AggregatorConfig {
            max_total_chars: 75,
            ..AggregatorConfig::default()
        };
        let mut pages = vec![
            page("https://vet.test/a", &"a".repeat(40)),
            page("https://vet.test/blank", "  \n"),
            page("https://vet.test/empty", ""),
        ];
        let out = aggregate(&pages, &config);

        assert_eq!(out.text.len(), 75);
        assert_eq!(out.pages_included, 1);
        assert!(!out.truncated);

        pages.push(page("https://vet.test/c", "c"));
        assert!(aggregate(&pages, &config).truncated);
    }

    #[test]
    fn test_oversized_first_page_is_hard_cut() {
        let config = AggregatorConfig {
            max_total_chars: 64,
            max_chars_per_page: 1_000,
            ..AggregatorConfig::default()
        };
        let out = aggregate(&[page("https://vet.test/", &"é".repeat(200))], &config);

        assert!(out.text.len() <= 64);
        assert!(out.text.starts_with("--- PAGE: https://vet.test/ ---\n"));
        assert_eq!(out.pages_included, 1);
        assert!(out.truncated);
    }

    #[test]
    fn test_budget_holds_for_any_crawl_size() {
        let config = AggregatorConfig {
            max_total_chars: 1_000,
            max_chars_per_page: 300,
            ..AggregatorConfig::default()
        };
        for count in [0, 1, 3, 10, 200] {
            let pages: Vec<PageResult> = (0..count)
                .map(|i| page(&format!("https://vet.test/{i}"), &"x".repeat(i * 7 + 1)))
                .collect();
            let out = aggregate(&pages, &config);
            assert!(out.text.len() <= config.max_total_chars);
            assert!(out.pages_included <= count);
        }
    }

    #[test]
    fn test_usable_content() {
        let config = AggregatorConfig::default();
        assert!(!AggregatedContent::default().is_usable(&config));

        let thin = aggregate(&[page("https://vet.test/", "***\n\n# .")], &config);
        assert_eq!(thin.pages_included, 1);
        assert!(!thin.is_usable(&config));

        let rich = aggregate(
            &[page("https://vet.test/", &"Open Monday to Friday. ".repeat(10))],
            &config,
        );
        assert!(rich.is_usable(&config));
    }
}
