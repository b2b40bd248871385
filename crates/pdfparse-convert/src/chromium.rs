//! Headless Chrome renderer.
//!
//! chromiumoxide is async; this renderer builds a private current-thread
//! Tokio runtime for each call so the facade stays synchronous. The browser
//! process lives exactly as long as one conversion.

use std::path::{Path, PathBuf};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use futures::StreamExt;
use tracing::{debug, warn};

use pdfparse_core::options::css_length_to_inches;
use pdfparse_core::{BackendError, ConversionOptions, DEFAULT_MARGIN_INCHES, HtmlRenderer};

use crate::html::{inject_into_head, style_block};

#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    chrome_path: Option<PathBuf>,
}

impl ChromiumRenderer {
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        Self { chrome_path }
    }

    /// Inline the stylesheet and base URL into the document head.
    pub(crate) fn prepare(
        &self,
        html: &str,
        options: &ConversionOptions,
    ) -> Result<String, BackendError> {
        let mut head = String::new();
        if let Some(base_url) = &options.base_url {
            head.push_str(&format!("<base href=\"{}\">", base_url.replace('"', "%22")));
        }
        if let Some(css) = &options.css {
            head.push_str(&style_block(&css.load()?));
        }
        if head.is_empty() {
            return Ok(html.to_string());
        }
        Ok(inject_into_head(html, &head))
    }

    async fn print(
        &self,
        html: &str,
        output: &Path,
        params: PrintToPdfParams,
    ) -> Result<(), BackendError> {
        let mut builder = BrowserConfig::builder()
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");

        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(BackendError::Render)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BackendError::Render(format!("failed to launch browser: {e}")))?;

        // Drive browser events until the connection closes
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = async {
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| BackendError::Render(e.to_string()))?;
            page.set_content(html)
                .await
                .map_err(|e| BackendError::Render(e.to_string()))?;
            page.save_pdf(params, output)
                .await
                .map_err(|e| BackendError::Render(e.to_string()))?;
            Ok::<(), BackendError>(())
        }
        .await;

        if let Err(e) = browser.close().await {
            warn!(error = %e, "browser did not close cleanly");
        }
        handle.abort();

        result
    }
}

/// Map paper size and margins onto Chrome's print parameters.
///
/// Margins that are not absolute CSS lengths fall back to the default.
pub(crate) fn print_params(options: &ConversionOptions) -> PrintToPdfParams {
    let (width, height) = options.page_size.inches();
    let margin = |value: &str| css_length_to_inches(value).unwrap_or(DEFAULT_MARGIN_INCHES);

    PrintToPdfParams {
        paper_width: Some(width),
        paper_height: Some(height),
        margin_top: Some(margin(&options.margins.top)),
        margin_right: Some(margin(&options.margins.right)),
        margin_bottom: Some(margin(&options.margins.bottom)),
        margin_left: Some(margin(&options.margins.left)),
        print_background: Some(true),
        prefer_css_page_size: Some(true),
        ..Default::default()
    }
}

impl HtmlRenderer for ChromiumRenderer {
    fn name(&self) -> &'static str {
        "chromium"
    }

    fn render(
        &self,
        html: &str,
        output: &Path,
        options: &ConversionOptions,
    ) -> Result<(), BackendError> {
        let html = self.prepare(html, options)?;
        let params = print_params(options);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        debug!(chrome = ?self.chrome_path, "launching headless browser");
        runtime.block_on(self.print(&html, output, params))
    }
}
