//! Scrape every registered site and merge the results.
//!
//! Sites are fetched up to `concurrency` at a time, but results are always
//! combined in registry order. A site that fails to fetch is logged and
//! contributes nothing; aggregation itself never fails.

use crate::classify::classify;
use crate::error::FetchError;
use crate::models::{Headline, SiteDescriptor};
use crate::scrapers::{Fetch, extract_headlines};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use tracing::{error, info, instrument};

pub const DEFAULT_CONCURRENCY: usize = 4;

/// How one site fared during a scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOutcome {
    pub name: String,
    /// Headlines extracted before global deduplication.
    pub extracted: usize,
    /// Fetch failure, if any.
    pub error: Option<String>,
}

/// Result of one scrape cycle.
#[derive(Debug, Clone, Default)]
pub struct ScrapeReport {
    /// Unique by text; first site in registry order wins.
    pub headlines: Vec<Headline>,
    pub outcomes: Vec<SiteOutcome>,
}

impl ScrapeReport {
    pub fn failed_sites(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}

/// Run fetch, extract, and classify over `sites` and merge the results.
///
/// Up to `concurrency` sites are in flight at once (a value of 0 is treated
/// as 1). Results are merged in registry order regardless of which fetch
/// finishes first, then deduplicated by exact headline text so the first
/// site to report a headline keeps it.
///
/// # Arguments
///
/// * `fetcher` - Page source, usually an [`HttpFetcher`](crate::scrapers::HttpFetcher)
/// * `sites` - Registry entries to scrape, in display order
/// * `concurrency` - Maximum number of sites fetched at the same time
///
/// # Returns
///
/// A [`ScrapeReport`] holding the unique headlines and one [`SiteOutcome`]
/// per site. A site that fails to fetch is logged and recorded in its
/// outcome; it never aborts the run, so this function has no error case.
#[instrument(level = "info", skip_all, fields(sites = sites.len(), concurrency = concurrency))]
pub async fn aggregate<F: Fetch>(fetcher: &F, sites: &[SiteDescriptor], concurrency: usize) -> ScrapeReport {
    // Collected before streaming so the returned future stays `Send`.
    let jobs: Vec<_> = sites
        .iter()
        .map(|site| async move {
            match scrape_site(fetcher, site).await {
                Ok(headlines) => {
                    info!(site = %site.name, count = headlines.len(), "Scraped site");
                    let outcome = SiteOutcome {
                        name: site.name.clone(),
                        extracted: headlines.len(),
                        error: None,
                    };
                    (outcome, headlines)
                }
                Err(e) => {
                    error!(site = %site.name, error = %e, "Error fetching site; skipping");
                    let outcome = SiteOutcome {
                        name: site.name.clone(),
                        extracted: 0,
                        error: Some(e.to_string()),
                    };
                    (outcome, Vec::new())
                }
            }
        })
        .collect();
    let per_site: Vec<(SiteOutcome, Vec<Headline>)> = stream::iter(jobs)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let (outcomes, batches): (Vec<_>, Vec<_>) = per_site.into_iter().unzip();
    let total: usize = batches.iter().map(Vec::len).sum();
    let headlines = batches
        .into_iter()
        .flatten()
        .unique_by(|h| h.text.clone())
        .collect::<Vec<_>>();

    info!(
        total,
        unique = headlines.len(),
        failed_sites = outcomes.iter().filter(|o| o.error.is_some()).count(),
        "Aggregation complete"
    );

    ScrapeReport { headlines, outcomes }
}

async fn scrape_site<F: Fetch>(fetcher: &F, site: &SiteDescriptor) -> Result<Vec<Headline>, FetchError> {
    let html = fetcher.fetch(&site.url).await?;
    let headlines = extract_headlines(&html, &site.selectors(), &site.base_url)
        .into_iter()
        .map(|extracted| {
            let importance = classify(&extracted.text);
            Headline::new(site, extracted, importance)
        })
        .collect();
    Ok(headlines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImportanceTier, LinkScope};
    use crate::scrapers::fetch::tests::local_fetcher;
    use reqwest::StatusCode;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    /// Serves canned pages by URL; anything else is a 503.
    struct StubFetcher {
        pages: HashMap<String, String>,
    }

    impl StubFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            }
        }
    }

    impl Fetch for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.pages
                .get(url)
                .map(|body| body.as_bytes().to_vec())
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: StatusCode::SERVICE_UNAVAILABLE,
                })
        }
    }

    fn site(name: &str, url: &str) -> SiteDescriptor {
        SiteDescriptor {
            name: name.to_string(),
            url: url.to_string(),
            tag: "h3".to_string(),
            class_name: "headline".to_string(),
            link_tag: "a".to_string(),
            link_class: "headline".to_string(),
            base_url: format!("https://{name}.example"),
            site_url: format!("https://{name}.example/home"),
            link_scope: LinkScope::SelfThenParent,
        }
    }

    fn page(items: &[&str]) -> String {
        items
            .iter()
            .enumerate()
            .map(|(i, text)| format!(r#"<h3 class="headline"><a class="headline" href="/s/{i}">{text}</a></h3>"#))
            .collect()
    }

    #[tokio::test]
    async fn test_failed_site_is_skipped() {
        let sites = vec![
            site("alpha", "https://alpha.example/news"),
            site("down", "https://down.example/news"),
            site("gamma", "https://gamma.example/news"),
        ];
        let fetcher = StubFetcher::new(&[
            ("https://alpha.example/news", page(&["Alpha story"]).as_str()),
            ("https://gamma.example/news", page(&["Gamma story"]).as_str()),
        ]);

        let report = aggregate(&fetcher, &sites, 2).await;
        let sources: Vec<_> = report.headlines.iter().map(|h| h.source.as_str()).collect();
        assert_eq!(sources, vec!["alpha", "gamma"]);
        assert_eq!(report.failed_sites(), 1);
        assert!(report.outcomes[1].error.as_deref().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_global_dedup_first_site_wins() {
        let sites = vec![
            site("alpha", "https://alpha.example/news"),
            site("beta", "https://beta.example/news"),
        ];
        let fetcher = StubFetcher::new(&[
            ("https://alpha.example/news", page(&["Shared story", "Alpha only"]).as_str()),
            ("https://beta.example/news", page(&["Beta only", "Shared story", "shared story"]).as_str()),
        ]);

        let report = aggregate(&fetcher, &sites, DEFAULT_CONCURRENCY).await;
        let texts: Vec<_> = report.headlines.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Shared story", "Alpha only", "Beta only", "shared story"]);

        let shared = &report.headlines[0];
        assert_eq!(shared.source, "alpha");
        assert_eq!(shared.link, "https://alpha.example/s/0");
        assert_eq!(shared.site_url, "https://alpha.example/home");

        let unique: HashSet<_> = report.headlines.iter().map(|h| &h.text).collect();
        assert_eq!(unique.len(), report.headlines.len());
        assert_eq!(report.outcomes[1].extracted, 3);
    }

    #[tokio::test]
    async fn test_headlines_are_classified() {
        let sites = vec![site("alpha", "https://alpha.example/news")];
        let fetcher = StubFetcher::new(&[(
            "https://alpha.example/news",
            page(&["Breaking: flood alert", "Policy review begins", "Garden show opens"]).as_str(),
        )]);

        let report = aggregate(&fetcher, &sites, 1).await;
        let tiers: Vec<_> = report.headlines.iter().map(|h| h.importance).collect();
        assert_eq!(
            tiers,
            vec![ImportanceTier::High, ImportanceTier::Medium, ImportanceTier::Low]
        );
        assert_eq!(report.headlines[0].emoji, "🔴");
    }

    #[tokio::test]
    async fn test_all_sites_down_yields_empty_report() {
        let sites = vec![site("a", "https://a.example/"), site("b", "https://b.example/")];
        let report = aggregate(&StubFetcher::new(&[]), &sites, 0).await;
        assert!(report.headlines.is_empty());
        assert_eq!(report.failed_sites(), 2);
    }

    #[tokio::test]
    async fn test_runs_on_spawned_task() {
        let ctx = Arc::new((
            StubFetcher::new(&[
                ("https://alpha.example/news", page(&["Alpha story"]).as_str()),
                ("https://beta.example/news", page(&["Beta story"]).as_str()),
            ]),
            vec![
                site("alpha", "https://alpha.example/news"),
                site("beta", "https://beta.example/news"),
            ],
        ));

        let worker = Arc::clone(&ctx);
        let report = tokio::spawn(async move { aggregate(&worker.0, &worker.1, 2).await })
            .await
            .unwrap();

        let texts: Vec<_> = report.headlines.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha story", "Beta story"]);
        assert_eq!(report.failed_sites(), 0);
    }

    #[tokio::test]
    async fn test_connection_refused_site_does_not_abort_run() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let body = page(&["Live story"]);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let sites = vec![
            site("refused", "http://127.0.0.1:9/news"),
            site("live", &format!("http://{addr}/news")),
        ];
        let fetcher = local_fetcher();
        let report = aggregate(&fetcher, &sites, 1).await;

        assert_eq!(report.headlines.len(), 1);
        assert_eq!(report.headlines[0].source, "live");
        assert!(report.outcomes[0].error.is_some());
    }
}
