//! A [`Typesetter`] backed by headless Chrome over the DevTools protocol.
//!
//! One browser process is shared by every pipeline using the typesetter. It is
//! launched on first use and relaunched only once its connection has ended; a
//! tab that fails to open leaves it running. Each session is its own tab.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use folio_traits::{PrintOptions, RenderSession, Script, TypesetError, Typesetter};
use futures::StreamExt;
use log::{debug, info, warn};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const FOOTER_TEMPLATE: &str = "<div style=\"width:100%;font-size:9px;text-align:center;\">\
<span class=\"pageNumber\"></span></div>";

#[derive(Debug, Clone, PartialEq)]
pub struct ChromeOptions {
    /// Browser binary; discovered on the system when `None`.
    pub executable: Option<PathBuf>,
    pub sandbox: bool,
    /// Timeout for a single DevTools request.
    pub request_timeout: Duration,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            executable: None,
            sandbox: true,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ChromeOptions {
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

struct BrowserHandle {
    browser: Browser,
    events: JoinHandle<()>,
}

pub struct ChromeTypesetter {
    options: ChromeOptions,
    browser: Mutex<Option<BrowserHandle>>,
}

impl fmt::Debug for ChromeTypesetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromeTypesetter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for ChromeTypesetter {
    fn default() -> Self {
        Self::new(ChromeOptions::default())
    }
}

impl ChromeTypesetter {
    pub fn new(options: ChromeOptions) -> Self {
        Self {
            options,
            browser: Mutex::new(None),
        }
    }

    async fn launch(&self) -> Result<BrowserHandle, TypesetError> {
        let mut builder = BrowserConfig::builder().request_timeout(self.options.request_timeout);
        if let Some(path) = &self.options.executable {
            builder = builder.chrome_executable(path);
        }
        if !self.options.sandbox {
            builder = builder.no_sandbox();
        }
        let config = builder.build().map_err(TypesetError::Unavailable)?;

        info!("Launching headless browser.");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| TypesetError::Unavailable(e.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event loop stopped: {}", e);
                    break;
                }
            }
        });

        Ok(BrowserHandle { browser, events })
    }

    /// Closes the shared browser, if one is running. A later `open` relaunches it.
    pub async fn shutdown(&self) {
        let Some(mut handle) = self.browser.lock().await.take() else {
            return;
        };
        info!("Shutting down headless browser.");
        if let Err(e) = handle.browser.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }
        if let Err(e) = handle.browser.wait().await {
            warn!("Failed waiting for browser exit: {}", e);
        }
        handle.events.abort();
    }
}

#[async_trait]
impl Typesetter for ChromeTypesetter {
    async fn open(&self) -> Result<Box<dyn RenderSession>, TypesetError> {
        let mut guard = self.browser.lock().await;
        let current = match guard.take() {
            Some(handle) if event_loop_alive(&handle.events) => handle,
            stale => {
                if stale.is_some() {
                    warn!("Headless browser connection is gone; relaunching.");
                }
                drop(stale);
                self.launch().await?
            }
        };
        let handle = guard.insert(current);

        // A failed or cancelled tab leaves the shared browser running for other sessions.
        let page = handle
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| TypesetError::Unavailable(format!("Failed to open tab: {}", e)))?;
        Ok(Box::new(ChromeSession { page }))
    }

    fn name(&self) -> &'static str {
        "chrome"
    }
}

/// The browser is gone once its event loop has ended.
fn event_loop_alive(events: &JoinHandle<()>) -> bool {
    !events.is_finished()
}

struct ChromeSession {
    page: Page,
}

fn print_params(options: &PrintOptions) -> PrintToPdfParams {
    let (width, height) = options.paper.dimensions_in();
    PrintToPdfParams {
        paper_width: Some(width),
        paper_height: Some(height),
        margin_top: Some(options.margin_in),
        margin_bottom: Some(options.margin_in),
        margin_left: Some(options.margin_in),
        margin_right: Some(options.margin_in),
        print_background: Some(options.print_background),
        display_header_footer: Some(options.footer_page_numbers),
        header_template: options.footer_page_numbers.then(|| "<span></span>".to_string()),
        footer_template: options.footer_page_numbers.then(|| FOOTER_TEMPLATE.to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl RenderSession for ChromeSession {
    async fn load_html(&mut self, html: &str) -> Result<(), TypesetError> {
        self.page
            .set_content(html)
            .await
            .map_err(|e| TypesetError::Load(e.to_string()))?;
        Ok(())
    }

    async fn evaluate(&mut self, script: &Script) -> Result<serde_json::Value, TypesetError> {
        let script_error = |message: String| TypesetError::Script {
            name: script.name,
            message,
        };
        let params = EvaluateParams::builder()
            .expression(script.source.clone())
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(script_error)?;
        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| script_error(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn print_pdf(&mut self, options: &PrintOptions) -> Result<Vec<u8>, TypesetError> {
        self.page
            .pdf(print_params(options))
            .await
            .map_err(|e| TypesetError::Print(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), TypesetError> {
        self.page
            .close()
            .await
            .map_err(|e| TypesetError::Release(e.to_string()))
    }
}
