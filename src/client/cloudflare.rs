//! Cloudflare v4 API implementation of [`RouteClient`].

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    ApiMessage, ClientError, ClientFuture, CreateRouteParams, DeleteRouteParams,
    ListRoutesParams, RouteClient, UpdateRouteParams,
};
use crate::config::CloudflareConfig;
use crate::route::TunnelRoute;

/// Default base URL of the Cloudflare v4 API.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Response envelope shared by every v4 endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Serialize)]
struct RouteBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<&'a str>,
    tunnel_id: &'a str,
    comment: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    virtual_network_id: &'a str,
}

#[derive(Debug, Serialize)]
struct DeleteQuery<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    virtual_network_id: &'a str,
}

/// Client for the tunnel route ("teamnet routes") endpoints.
#[derive(Clone, Debug)]
pub struct CloudflareClient {
    http: Client,
    base_url: Url,
    api_token: String,
}

impl CloudflareClient {
    /// Constructs a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the configuration fails
    /// validation, [`ClientError::InvalidUrl`] when the base URL cannot be
    /// parsed, and [`ClientError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(config: &CloudflareConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let base_url = Url::parse(config.base_url.trim()).map_err(|err| ClientError::InvalidUrl {
            message: format!("{}: {err}", config.base_url),
        })?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_token: config.api_token.trim().to_owned(),
        })
    }

    /// Builds an endpoint URL below `accounts/{account_id}/teamnet/routes`.
    /// Every segment is percent-encoded, so the slash inside a CIDR becomes
    /// `%2F`.
    fn routes_url(&self, account_id: &str, tail: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| ClientError::InvalidUrl {
                message: format!("{} cannot be a base URL", self.base_url),
            })?;
            segments
                .pop_if_empty()
                .extend(["accounts", account_id, "teamnet", "routes"])
                .extend(tail);
        }
        Ok(url)
    }

    fn network_url(&self, account_id: &str, network: &str) -> Result<Url, ClientError> {
        self.routes_url(account_id, &["network", network])
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url).bearer_auth(&self.api_token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let envelope = self.send_envelope::<T>(request).await?;
        envelope.result.ok_or_else(|| ClientError::Decode {
            message: String::from("response envelope has no result"),
        })
    }

    async fn send_envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        parse_envelope(status, &body)
    }
}

fn parse_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<Envelope<T>, ClientError> {
    let parsed = serde_json::from_str::<Envelope<T>>(body);
    match parsed {
        Ok(envelope) if status.is_success() && envelope.success => Ok(envelope),
        Ok(envelope) => Err(ClientError::Api {
            status: status.as_u16(),
            messages: envelope.errors,
        }),
        Err(_) if !status.is_success() => Err(ClientError::Api {
            status: status.as_u16(),
            messages: Vec::new(),
        }),
        Err(err) => Err(ClientError::Decode {
            message: err.to_string(),
        }),
    }
}

impl RouteClient for CloudflareClient {
    type Error = ClientError;

    fn list_routes<'a>(
        &'a self,
        params: &'a ListRoutesParams,
    ) -> ClientFuture<'a, Vec<TunnelRoute>, Self::Error> {
        Box::pin(async move {
            debug!(account_id = %params.account_id, network = %params.network_subset, "listing tunnel routes");
            let url = self.routes_url(&params.account_id, &[])?;
            self.send(self.request(Method::GET, url).query(params))
                .await
        })
    }

    fn create_route<'a>(
        &'a self,
        params: &'a CreateRouteParams,
    ) -> ClientFuture<'a, TunnelRoute, Self::Error> {
        Box::pin(async move {
            debug!(account_id = %params.account_id, network = %params.network, "creating tunnel route");
            let url = self.network_url(&params.account_id, &params.network)?;
            let body = RouteBody {
                network: None,
                tunnel_id: &params.tunnel_id,
                comment: &params.comment,
                virtual_network_id: &params.virtual_network_id,
            };
            self.send(self.request(Method::POST, url).json(&body)).await
        })
    }

    fn update_route<'a>(
        &'a self,
        params: &'a UpdateRouteParams,
    ) -> ClientFuture<'a, TunnelRoute, Self::Error> {
        Box::pin(async move {
            debug!(account_id = %params.account_id, network = %params.network, "updating tunnel route");
            let url = self.network_url(&params.account_id, &params.network)?;
            let body = RouteBody {
                network: Some(&params.network),
                tunnel_id: &params.tunnel_id,
                comment: &params.comment,
                virtual_network_id: &params.virtual_network_id,
            };
            self.send(self.request(Method::PATCH, url).json(&body))
                .await
        })
    }

    fn delete_route<'a>(
        &'a self,
        params: &'a DeleteRouteParams,
    ) -> ClientFuture<'a, (), Self::Error> {
        Box::pin(async move {
            debug!(account_id = %params.account_id, network = %params.network, "deleting tunnel route");
            let url = self.network_url(&params.account_id, &params.network)?;
            let query = DeleteQuery {
                virtual_network_id: &params.virtual_network_id,
            };
            self.send_envelope::<serde_json::Value>(
                self.request(Method::DELETE, url).query(&query),
            )
            .await
            .map(|_| ())
        })
    }
}
