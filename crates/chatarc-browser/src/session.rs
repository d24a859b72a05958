use std::path::PathBuf;
use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};
use url::Url;

use crate::error::{Error, Result};

/// Selector set that signals an authenticated app shell is rendered.
pub const APP_SHELL_SELECTOR: &str = "main, nav, aside, [data-testid='sidebar']";

/// First wait for the app shell on an already-authenticated profile.
pub const APP_SHELL_TIMEOUT: Duration = Duration::from_secs(20);

/// Extended wait covering a human completing the login flow by hand.
pub const LOGIN_GRACE_TIMEOUT: Duration = Duration::from_secs(180);

/// Settle time after the initial navigation, before the first shell probe.
const INITIAL_SETTLE: Duration = Duration::from_millis(1200);

/// Interval between selector probes while waiting for the shell.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One in-page fetch against a same-origin path, resolving to the parsed
/// JSON body on a 2xx response and to null on any failure. Cookies ride
/// along via `credentials: 'include'`, which is the whole point of calling
/// the endpoints from inside the session.
const IN_PAGE_FETCH: &str = r#"
const path = arguments[0];
const done = arguments[1];
fetch(path, { credentials: 'include' })
  .then((r) => (r.ok ? r.json() : null))
  .then((data) => done(data === undefined ? null : data))
  .catch(() => done(null));
"#;

/// Best-effort automation mask applied after navigation.
const WEBDRIVER_MASK: &str =
    "try { Object.defineProperty(navigator, 'webdriver', { get: () => undefined }); } catch (e) {}";

/// Static options for opening the browser session.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// WebDriver endpoint, e.g. a locally running chromedriver.
    pub webdriver_url: String,
    /// Root URL of the chat service.
    pub base_url: Url,
    /// Browser user-data directory (parent of named profiles).
    pub user_data_dir: PathBuf,
    /// Named profile inside the user-data directory.
    pub profile_name: String,
}

/// A live browser session, exclusively owned for the duration of one run.
///
/// All operations are serial; the underlying client handle is cloned per
/// command but never driven from more than one place at a time.
pub struct Session {
    client: Client,
    base_url: Url,
}

impl Session {
    /// Open a WebDriver session against the configured profile.
    pub async fn connect(config: &BrowserConfig) -> Result<Self> {
        let mut caps = serde_json::map::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": [
                    format!("--user-data-dir={}", config.user_data_dir.display()),
                    format!("--profile-directory={}", config.profile_name),
                    "--disable-blink-features=AutomationControlled",
                    "--no-first-run",
                    "--no-default-browser-check",
                ],
                "excludeSwitches": ["enable-automation"],
            }),
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Navigate to an absolute URL.
    pub async fn goto(&self, url: &str) -> Result<()> {
        let mut client = self.client.clone();
        client.goto(url).await?;
        Ok(())
    }

    /// Navigate to the service root, give the page a moment to settle, and
    /// apply the automation mask.
    pub async fn open_start_page(&self) -> Result<()> {
        self.goto(self.base_url.as_str()).await?;
        tokio::time::sleep(INITIAL_SETTLE).await;
        let mut client = self.client.clone();
        let _ = client.execute(WEBDRIVER_MASK, vec![]).await;
        Ok(())
    }

    /// Poll for the app shell until it appears or `timeout` elapses.
    /// Probe failures count as "not there yet"; only the clock ends the wait.
    pub async fn wait_for_app_shell(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.count_matches(APP_SHELL_SELECTOR).await > 0 {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Issue one same-origin fetch from inside the page. `None` covers
    /// non-2xx responses, network failures, and non-JSON bodies alike.
    pub async fn get_json(&self, path: &str) -> Option<Value> {
        let mut client = self.client.clone();
        match client
            .execute_async(IN_PAGE_FETCH, vec![Value::String(path.to_string())])
            .await
        {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(_) => None,
        }
    }

    /// Number of elements matching a CSS selector; 0 on any failure.
    pub async fn count_matches(&self, css: &str) -> usize {
        let mut client = self.client.clone();
        match client.find_all(Locator::Css(css)).await {
            Ok(elements) => elements.len(),
            Err(_) => 0,
        }
    }

    /// All elements matching a CSS selector; empty on any failure.
    pub async fn find_all(&self, css: &str) -> Vec<Element> {
        let mut client = self.client.clone();
        client
            .find_all(Locator::Css(css))
            .await
            .unwrap_or_default()
    }

    /// First candidate selector with at least one match, with its elements.
    pub async fn first_matching_family(
        &self,
        candidates: &[String],
    ) -> Option<(String, Vec<Element>)> {
        for candidate in candidates {
            let elements = self.find_all(candidate).await;
            if !elements.is_empty() {
                return Some((candidate.clone(), elements));
            }
        }
        None
    }

    /// Click the first button carrying the given accessible label or text.
    /// Returns whether anything was clicked.
    pub async fn click_button_labeled(&self, label: &str) -> bool {
        let xpath = format!(
            "//button[@aria-label='{label}' or normalize-space(.)='{label}']"
        );
        let mut client = self.client.clone();
        match client.find_all(Locator::XPath(&xpath)).await {
            Ok(buttons) => {
                for button in buttons {
                    if button.clone().click().await.is_ok() {
                        return true;
                    }
                }
                false
            }
            Err(_) => false,
        }
    }

    /// Scroll a container (by selector) to its bottom. Returns whether the
    /// container was found.
    pub async fn scroll_container_bottom(&self, css: &str) -> bool {
        let mut client = self.client.clone();
        let script = "const el = document.querySelector(arguments[0]); \
                      if (!el) { return false; } \
                      el.scrollTop = el.scrollHeight; \
                      return true;";
        matches!(
            client
                .execute(script, vec![Value::String(css.to_string())])
                .await,
            Ok(Value::Bool(true))
        )
    }

    pub async fn scroll_window_top(&self) {
        let mut client = self.client.clone();
        let _ = client.execute("window.scrollTo(0, 0);", vec![]).await;
    }

    pub async fn scroll_window_bottom(&self) {
        let mut client = self.client.clone();
        let _ = client
            .execute("window.scrollTo(0, document.body.scrollHeight);", vec![])
            .await;
    }

    /// Current full document height; 0 on any failure.
    pub async fn document_height(&self) -> i64 {
        let mut client = self.client.clone();
        match client
            .execute("return document.body.scrollHeight;", vec![])
            .await
        {
            Ok(value) => value
                .as_i64()
                .or_else(|| value.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Err(_) => 0,
        }
    }

    /// Close the browser session. The profile directory is released here.
    pub async fn close(self) -> Result<()> {
        let mut client = self.client;
        client.close().await.map_err(Error::from)
    }
}
