use std::sync::Arc;
use std::time::Duration;

use super::{Checker, FtpFileChecker, HttpFileChecker, RestEndpointChecker, WebPageChecker};
use crate::config::CheckerConfig;
use crate::error::{SelectError, TransportError};
use crate::resource::{Resource, ResourceType};
use crate::transport::{
    CurlFtpConnector, FtpConnector, FtpCredentials, HeadlessBrowser, HttpClient, LiveHttpClient,
    PageRenderer,
};

/// Picks the checker for a resource and hands it the shared transports.
pub struct CheckerFactory {
    http: Arc<dyn HttpClient>,
    ftp: Arc<dyn FtpConnector>,
    renderer: Arc<dyn PageRenderer>,
    config: CheckerConfig,
}

impl CheckerFactory {
    pub fn new(
        http: Arc<dyn HttpClient>,
        ftp: Arc<dyn FtpConnector>,
        renderer: Arc<dyn PageRenderer>,
        config: CheckerConfig,
    ) -> Self {
        Self {
            http,
            ftp,
            renderer,
            config,
        }
    }

    /// Factory backed by the network and the configured browser.
    pub fn live(config: &CheckerConfig) -> Result<Self, TransportError> {
        let http = LiveHttpClient::new(&config.http)?;
        let ftp = CurlFtpConnector::new(Duration::from_secs(config.http.connect_timeout_secs));
        let renderer = HeadlessBrowser::new(&config.web_page);
        Ok(Self::new(
            Arc::new(http),
            Arc::new(ftp),
            Arc::new(renderer),
            config.clone(),
        ))
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn select(&self, resource: Resource) -> Result<Checker, SelectError> {
        let span = tracing::info_span!("check", resource = %resource.name(), url = %resource.url());
        let threshold = self.config.acceptable_size_drop_percent;
        let scheme = resource.url().scheme().to_string();

        let checker = match resource.resource_type() {
            ResourceType::File => match scheme.as_str() {
                "ftp" => {
                    let credentials = FtpCredentials {
                        user: self.config.ftp.user.clone(),
                        password: self.config.ftp.password.clone(),
                    };
                    Checker::FtpFile(FtpFileChecker::new(
                        resource,
                        Arc::clone(&self.ftp),
                        credentials,
                        threshold,
                        span,
                    ))
                }
                "http" | "https" => Checker::HttpFile(HttpFileChecker::new(
                    resource,
                    Arc::clone(&self.http),
                    threshold,
                    span,
                )),
                _ => {
                    return Err(SelectError::UnsupportedProtocol {
                        scheme,
                        resource: resource.to_string(),
                    })
                }
            },
            ResourceType::RestEndpoint => {
                Checker::RestEndpoint(RestEndpointChecker::new(resource, Arc::clone(&self.http), span))
            }
            ResourceType::WebPage => Checker::WebPage(WebPageChecker::new(
                resource,
                Arc::clone(&self.http),
                Arc::clone(&self.renderer),
                Duration::from_secs(self.config.web_page.settle_delay_secs),
                span,
            )),
            resource_type @ (ResourceType::WebService | ResourceType::FtpServer) => {
                return Err(SelectError::UnrecognizedType {
                    resource_type,
                    resource: resource.to_string(),
                })
            }
        };

        tracing::debug!(kind = checker.kind(), "selected checker");
        Ok(checker)
    }
}
