//! Headless browser sessions for script-rendered listing pages.
//!
//! Uses chromiumoxide (CDP). A [`BrowserSession`] owns the browser process
//! for one agency crawl and tears it down when dropped, on every exit path.

mod config;

pub use config::BrowserEngineConfig;

use std::time::Duration;

use async_trait::async_trait;

use super::ScrapeError;

/// Something that can turn a listing URL into rendered HTML.
#[async_trait]
pub trait PageRenderer: Send {
    /// Load `url`, let it settle for `settle`, then wait for `selector` to
    /// match at least one element. Returns the rendered document.
    async fn render(
        &mut self,
        url: &str,
        selector: &str,
        settle: Duration,
    ) -> Result<String, ScrapeError>;
}

#[cfg(feature = "browser")]
mod session {
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use chromiumoxide::handler::{Handler, HandlerConfig};
    use chromiumoxide::{Browser, BrowserConfig, Page};
    use futures::StreamExt;
    use tokio::task::JoinHandle;
    use tracing::{debug, info, warn};

    use super::{BrowserEngineConfig, PageRenderer};
    use crate::scrapers::ScrapeError;

    /// Common Chrome executable paths to check before falling back to
    /// chromiumoxide's own detection.
    const CHROME_PATHS: &[&str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/opt/google/chrome/google-chrome",
    ];

    const SELECTOR_POLL: Duration = Duration::from_millis(250);

    /// A live browser plus its CDP event loop.
    pub struct BrowserSession {
        browser: Browser,
        handler: JoinHandle<()>,
        config: BrowserEngineConfig,
    }

    impl BrowserSession {
        /// Launch a local browser, or connect to `remote_url` when configured.
        pub async fn launch(config: &BrowserEngineConfig) -> Result<Self, ScrapeError> {
            let (browser, mut handler) = match config.remote_url.as_deref() {
                Some(url) => connect_remote(url, config).await?,
                None => {
                    info!("Launching browser (headless={})", config.headless);
                    Browser::launch(launch_config(config)?)
                        .await
                        .map_err(|e| ScrapeError::Browser(e.to_string()))?
                }
            };

            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                browser,
                handler,
                config: config.clone(),
            })
        }

        /// Close the browser gracefully. Dropping the session also tears it down.
        pub async fn close(&mut self) {
            if let Err(e) = self.browser.close().await {
                debug!("Browser close: {}", e);
            }
            let _ = self.browser.wait().await;
        }

        async fn wait_for_selector(&self, page: &Page, selector: &str) -> Result<(), ScrapeError> {
            let deadline = Instant::now() + self.config.element_wait();
            loop {
                if page.find_element(selector).await.is_ok() {
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    return Err(ScrapeError::Timeout {
                        what: format!("selector {:?}", selector),
                        seconds: self.config.element_wait,
                    });
                }
                tokio::time::sleep(SELECTOR_POLL).await;
            }
        }

        async fn load(
            &self,
            page: &Page,
            url: &str,
            selector: &str,
            settle: Duration,
        ) -> Result<String, ScrapeError> {
            match tokio::time::timeout(self.config.page_load(), page.goto(url)).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    return Err(ScrapeError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    })
                }
                Err(_) => {
                    return Err(ScrapeError::Timeout {
                        what: format!("page load of {}", url),
                        seconds: self.config.page_load_timeout,
                    })
                }
            }

            tokio::time::sleep(settle).await;
            self.wait_for_selector(page, selector).await?;
            page.content().await.map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
        }
    }

    #[async_trait]
    impl PageRenderer for BrowserSession {
        async fn render(
            &mut self,
            url: &str,
            selector: &str,
            settle: Duration,
        ) -> Result<String, ScrapeError> {
            let page = self
                .browser
                .new_page("about:blank")
                .await
                .map_err(|e| ScrapeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

            let result = self.load(&page, url, selector, settle).await;

            // One tab per profile, closed whether or not the load finished.
            if let Err(e) = page.close().await {
                warn!("Failed to close tab for {}: {}", url, e);
            }
            result
        }
    }

    impl Drop for BrowserSession {
        fn drop(&mut self) {
            // chromiumoxide kills a launched child process when `Browser` drops.
            self.handler.abort();
        }
    }

    fn launch_config(config: &BrowserEngineConfig) -> Result<BrowserConfig, ScrapeError> {
        let mut builder = BrowserConfig::builder().request_timeout(config.page_load());

        if let Some(path) = CHROME_PATHS
            .iter()
            .map(std::path::Path::new)
            .find(|p| p.exists())
        {
            debug!("Found Chrome at: {}", path.display());
            builder = builder.chrome_executable(path);
        }

        // with_head means NOT headless
        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--window-size=1920,1080")
            .arg("--ignore-certificate-errors")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        builder.build().map_err(ScrapeError::Browser)
    }

    async fn connect_remote(
        url: &str,
        config: &BrowserEngineConfig,
    ) -> Result<(Browser, Handler), ScrapeError> {
        info!("Connecting to remote browser at {}", url);

        // Resolve the WebSocket URL from the /json/version endpoint.
        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let version: serde_json::Value = reqwest::get(&version_url).await?.json().await?;
        let ws_url = version
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ScrapeError::Browser("no webSocketDebuggerUrl in response".into()))?;

        let handler_config = HandlerConfig {
            request_timeout: config.page_load(),
            ..Default::default()
        };

        Browser::connect_with_config(ws_url, handler_config)
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        /// Needs a local Chrome.
        ///
        /// Run with: cargo test test_timed_out_load_closes_its_tab -- --ignored
        #[tokio::test]
        #[ignore]
        async fn test_timed_out_load_closes_its_tab() {
            let config = BrowserEngineConfig {
                page_load_timeout: 0,
                ..Default::default()
            };
            let mut session = BrowserSession::launch(&config).await.unwrap();
            let before = session.browser.pages().await.unwrap().len();

            let result = session
                .render("https://www.kidp.or.kr/", "table", Duration::ZERO)
                .await;
            assert!(matches!(result, Err(ScrapeError::Timeout { .. })));

            let after = session.browser.pages().await.unwrap().len();
            assert_eq!(before, after);
            session.close().await;
        }
    }
}

#[cfg(feature = "browser")]
pub use session::BrowserSession;

// Stub for when the browser feature is disabled
#[cfg(not(feature = "browser"))]
pub struct BrowserSession;

#[cfg(not(feature = "browser"))]
impl BrowserSession {
    pub async fn launch(_config: &BrowserEngineConfig) -> Result<Self, ScrapeError> {
        Err(ScrapeError::Browser(
            "browser support not compiled; rebuild with --features browser".into(),
        ))
    }

    pub async fn close(&mut self) {}
}

#[cfg(not(feature = "browser"))]
#[async_trait]
impl PageRenderer for BrowserSession {
    async fn render(
        &mut self,
        _url: &str,
        _selector: &str,
        _settle: Duration,
    ) -> Result<String, ScrapeError> {
        Err(ScrapeError::Browser("browser support not compiled".into()))
    }
}
