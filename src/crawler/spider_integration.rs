//! Integration with spider library for web crawling

use std::collections::HashMap;

use spider::page::Page;
use spider::website::Website;
use spider_utils::spider_transformations::transformation::content::{
    transform_content, ReturnFormat, TransformConfig,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, info_span, instrument, warn};
use url::Url;

use crate::crawler::content_extraction::{
    discover_links, extract_title, page_key, should_skip_url, strip_images,
};
use crate::crawler::error::CrawlError;
use crate::crawler::{CrawlParams, CrawlerConfig, PageResult};

/// Pages gathered from the crawl broadcast
#[derive(Debug, Default)]
struct Collected {
    pages: Vec<PageResult>,
    fetched: usize,
}

/// Tracks the link depth of every discovered URL
#[derive(Debug)]
struct DepthMap {
    depths: HashMap<String, u32>,
}

impl DepthMap {
    fn new(seed: &Url) -> Self {
        let mut depths = HashMap::new();
        depths.insert(page_key(seed), 0);
        Self { depths }
    }

    fn depth_of(&self, url: &Url) -> Option<u32> {
        self.depths.get(&page_key(url)).copied()
    }

    fn record_links(&mut self, links: Vec<Url>, depth: u32) {
        for link in links {
            self.depths.entry(page_key(&link)).or_insert(depth);
        }
    }
}

/// Crawl a website and convert its pages to markdown
///
/// # Arguments
///
/// * `params` - Seed URL and limits of this crawl
/// * `config` - The crawler configuration
///
/// # Returns
///
/// The content pages in discovery order, at most `params.max_pages` of them
#[instrument(skip(config), fields(seed = %params.seed))]
pub async fn crawl_website(
    params: &CrawlParams,
    config: &CrawlerConfig,
) -> Result<Vec<PageResult>, CrawlError> {
    info!(
        max_depth = params.max_depth,
        max_pages = params.max_pages,
        "Starting deep crawl"
    );
    debug!("Crawler config: {:?}", config);

    let mut website = Website::new(params.seed.as_str());
    website
        .configuration
        .with_respect_robots_txt(config.respect_robots_txt)
        .with_user_agent(Some(config.user_agent.as_str()))
        .with_delay(config.rate_limit_ms)
        .with_depth(params.max_depth as usize)
        .with_limit(params.max_pages);

    // Room for every page spider may send, so the receiver never lags
    let mut rx = website.subscribe(params.max_pages as usize + 1);

    let params_for_task = params.clone();
    let config_for_task = config.clone();
    let handle = tokio::spawn(async move {
        let mut collected = Collected::default();
        let mut depths = DepthMap::new(&params_for_task.seed);
        loop {
            match rx.recv().await {
                Ok(page) => collect_page(
                    &page,
                    &params_for_task,
                    &config_for_task,
                    &mut depths,
                    &mut collected,
                ),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Page receiver lagged behind the crawl");
                }
                Err(RecvError::Closed) => break,
            }
        }
        collected
    });

    website.crawl().await;
    info!("Crawl finished");
    website.unsubscribe();
    let collected = handle.await?;

    if collected.fetched == 0 {
        warn!("No page could be fetched from {}", params.seed);
        return Err(CrawlError::Unreachable(params.seed.to_string()));
    }

    info!(
        fetched = collected.fetched,
        kept = collected.pages.len(),
        "Processed crawled pages"
    );
    Ok(collected.pages)
}

/// Convert one crawled page and keep it if it carries content
fn collect_page(
    page: &Page,
    params: &CrawlParams,
    config: &CrawlerConfig,
    depths: &mut DepthMap,
    collected: &mut Collected,
) {
    let _page_span = info_span!("process_page", url = %page.get_url()).entered();

    if !page.status_code.is_success() {
        debug!(status = %page.status_code, "Skipping failed page");
        return;
    }
    collected.fetched += 1;

    let Ok(url) = Url::parse(page.get_url()) else {
        debug!("Skipping page with unparsable URL");
        return;
    };
    let depth = match depths.depth_of(&url) {
        Some(depth) => depth,
        None => match Url::parse(page.get_url_final())
            .ok()
            .and_then(|target| depths.depth_of(&target))
        {
            Some(depth) => depth,
            None => {
                debug!("Skipping page not reached through a link");
                return;
            }
        },
    };

    // Links of too-deep pages are recorded too, so their children stay too deep
    let html = page.get_html();
    depths.record_links(discover_links(&url, &html), depth.saturating_add(1));

    if depth > params.max_depth {
        debug!(depth, "Skipping page beyond max depth");
        return;
    }
    if collected.pages.len() >= params.max_pages as usize {
        debug!("Reached max_pages limit of {}", params.max_pages);
        return;
    }
    if should_skip_url(url.as_str(), &config.skip_patterns) {
        debug!("Skipping non-content URL");
        return;
    }

    let transform_config = TransformConfig {
        return_format: ReturnFormat::Markdown,
        readability: true,
        main_content: true,
        ..Default::default()
    };
    let markdown = strip_images(&transform_content(
        page,
        &transform_config,
        &None,
        &None,
        &None,
    ));
    if markdown.len() < config.min_content_length {
        debug!("Skipping page with insufficient content");
        return;
    }

    info!(chars = markdown.len(), depth, "Extracted page content");
    collected.pages.push(PageResult {
        url: url.to_string(),
        title: extract_title(&html),
        content: markdown,
        depth,
    });
}
