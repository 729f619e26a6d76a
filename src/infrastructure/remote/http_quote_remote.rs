use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::application::ports::QuoteRemote;
use crate::domain::{Quote, QuoteDraft, QuoteId, QuotePatch};
use crate::shared::config::RemoteConfig;
use crate::shared::error::AppError;

/// Body of `POST {api_url}`: the form fields of a fresh, still open quote.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewQuoteBody<'a> {
    #[serde(flatten)]
    fields: &'a QuoteDraft,
    negocio_fechado: bool,
}

/// REST client for the quote collection and its liveness endpoint.
pub struct HttpQuoteRemote {
    client: reqwest::Client,
    api_url: Url,
    health_url: Url,
    authorization: Option<HeaderValue>,
}

impl HttpQuoteRemote {
    pub fn new(config: &RemoteConfig) -> Result<Self, AppError> {
        let api_url = parse_url("api_url", &config.api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(AppError::ConfigurationError(format!(
                "api_url cannot hold item paths: {api_url}"
            )));
        }
        let health_url = parse_url("health_url", &config.health_endpoint())?;

        let authorization = match config.authorization.as_deref() {
            Some(value) => {
                let mut header = HeaderValue::from_str(value).map_err(|_| {
                    AppError::ConfigurationError(
                        "authorization is not a valid header value".to_string(),
                    )
                })?;
                header.set_sensitive(true);
                Some(header)
            }
            None => None,
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| {
                AppError::ConfigurationError(format!("Failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            api_url,
            health_url,
            authorization,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    fn item_url(&self, id: &QuoteId) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(CACHE_CONTROL, "no-cache");
        match &self.authorization {
            Some(value) => builder.header(AUTHORIZATION, value.clone()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, context: String) -> Result<Response, AppError> {
        let response = builder
            .send()
            .await
            .map_err(|err| AppError::Network(format!("{context}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered {}", context, status);
            return Err(AppError::RemoteRejected {
                status: status.as_u16(),
                context,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, AppError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|err| AppError::Network(format!("{context}: {err}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| AppError::MalformedResponse(format!("{context}: {err}")))
    }
}

#[async_trait]
impl QuoteRemote for HttpQuoteRemote {
    async fn list(&self) -> Result<Vec<Quote>, AppError> {
        let context = format!("GET {}", self.api_url);
        let response = self
            .send(self.request(Method::GET, self.api_url.clone()), context.clone())
            .await?;
        Self::decode(response, &context).await
    }

    async fn create(&self, draft: &QuoteDraft) -> Result<Quote, AppError> {
        let context = format!("POST {}", self.api_url);
        let body = NewQuoteBody {
            fields: draft,
            negocio_fechado: false,
        };
        let response = self
            .send(
                self.request(Method::POST, self.api_url.clone()).json(&body),
                context.clone(),
            )
            .await?;
        Self::decode(response, &context).await
    }

    async fn update(&self, id: &QuoteId, patch: &QuotePatch) -> Result<Quote, AppError> {
        let url = self.item_url(id);
        let context = format!("PUT {url}");
        let response = self
            .send(self.request(Method::PUT, url).json(patch), context.clone())
            .await?;
        Self::decode(response, &context).await
    }

    async fn delete(&self, id: &QuoteId) -> Result<(), AppError> {
        let url = self.item_url(id);
        let context = format!("DELETE {url}");
        self.send(self.request(Method::DELETE, url), context).await?;
        Ok(())
    }

    async fn health(&self) -> Result<(), AppError> {
        let context = format!("GET {}", self.health_url);
        self.send(self.request(Method::GET, self.health_url.clone()), context)
            .await?;
        Ok(())
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url, AppError> {
    Url::parse(value)
        .map_err(|err| AppError::ConfigurationError(format!("Invalid {field} `{value}`: {err}")))
}
