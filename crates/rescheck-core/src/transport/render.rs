//! Rendering of client-side web pages.
//!
//! The raw HTTP body of a modern page may not contain the text a user sees,
//! so web page resources are read through a headless browser that runs the
//! page's scripts for a fixed settle time and dumps the resulting DOM.

use std::process::Command;
use std::time::Duration;

use crate::config::WebPageConfig;
use crate::error::TransportError;

/// Produces the fully rendered source of a page.
pub trait PageRenderer: Send + Sync {
    fn render(&self, url: &str, settle: Duration) -> Result<String, TransportError>;
}

/// Runs a Chromium-compatible browser binary in headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessBrowser {
    browser: String,
    window_size: String,
}

impl HeadlessBrowser {
    pub fn new(cfg: &WebPageConfig) -> Self {
        Self {
            browser: cfg.browser.clone(),
            window_size: cfg.window_size.clone(),
        }
    }

    fn args(&self, url: &str, settle: Duration) -> Vec<String> {
        vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            format!("--window-size={}", self.window_size),
            "--ignore-certificate-errors".to_string(),
            format!("--virtual-time-budget={}", settle.as_millis()),
            "--dump-dom".to_string(),
            url.to_string(),
        ]
    }
}

impl PageRenderer for HeadlessBrowser {
    fn render(&self, url: &str, settle: Duration) -> Result<String, TransportError> {
        tracing::debug!(browser = %self.browser, url, ?settle, "rendering page");
        let output = Command::new(&self.browser)
            .args(self.args(url, settle))
            .output()?;

        if !output.status.success() {
            return Err(TransportError::Render(format!(
                "{} exited with {}: {}",
                self.browser,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
