//! GitHub REST client.
//!
//! Blocking HTTP implementation of the remote traits. Every request carries
//! the pinned API version and bearer token; non-2xx responses become
//! `RemoteError::Status` with the platform's message.

use chrono::DateTime;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::paths::{collection_path, entry_path, public_key_path};
use super::{RateLimits, Repositories, ScopeStore};
use crate::core::constants::{self, PER_PAGE};
use crate::core::domain::{EncryptedPayload, Page, PublicKey, Quota, Repository, ScopeRef, Upsert};
use crate::error::{ConfigError, RemoteError, RemoteResult, Result};

/// GitHub REST API client.
#[derive(Debug, Clone)]
pub struct GitHub {
    http: Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct EntryList {
    #[serde(default)]
    secrets: Vec<Named>,
    #[serde(default)]
    variables: Vec<Named>,
}

#[derive(Debug, Serialize)]
struct VariableBody<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct RepositoryInfo {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    name: String,
    owner: Owner,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    resources: RateResources,
}

#[derive(Debug, Deserialize)]
struct RateResources {
    core: CoreRate,
}

#[derive(Debug, Deserialize)]
struct CoreRate {
    limit: u64,
    remaining: u64,
    reset: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GitHub {
    /// Create a client for `api_url` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL cannot address REST paths or the
    /// token is not a valid header value.
    pub fn new(token: &str, api_url: &str) -> Result<Self> {
        let base = Url::parse(api_url)
            .map_err(|e| ConfigError::InvalidApiUrl(format!("{}: {}", api_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidApiUrl(api_url.to_string()).into());
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ConfigError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(constants::ACCEPT));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(constants::API_VERSION),
        );
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .user_agent(concat!("sync-secrets/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(constants::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Transport {
                path: api_url.to_string(),
                reason: e.to_string(),
            })?;

        debug!(api = %base, "client ready");
        Ok(Self { http, base })
    }

    fn url(&self, segments: &[String]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn execute(
        &self,
        method: Method,
        segments: &[String],
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> RemoteResult<Response> {
        let path = format!("/{}", segments.join("/"));
        trace!(%method, %path, "request");

        let request = build(self.http.request(method.clone(), self.url(segments)));
        let response = request.send().map_err(|e| RemoteError::Transport {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        trace!(%method, %path, status = status.as_u16(), "response");
        if status.is_success() {
            return Ok(response);
        }

        let quota_spent = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");
        let message = error_message(status, &response.text().unwrap_or_default());

        Err(RemoteError::Status {
            method: method.to_string(),
            rate_limited: is_rate_limited(status, quota_spent, &message),
            path,
            status: status.as_u16(),
            message,
        })
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[String],
        query: &[(&str, String)],
    ) -> RemoteResult<(T, Option<u32>)> {
        let response = self.execute(Method::GET, segments, |r| r.query(query))?;
        let next = next_page(
            response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok()),
        )
        .map_err(|reason| RemoteError::Decode {
            path: format!("/{}", segments.join("/")),
            reason,
        })?;
        let body = response.json::<T>().map_err(|e| RemoteError::Decode {
            path: format!("/{}", segments.join("/")),
            reason: e.to_string(),
        })?;
        Ok((body, next))
    }
}

fn paging(page: u32) -> [(&'static str, String); 2] {
    [("per_page", PER_PAGE.to_string()), ("page", page.to_string())]
}

/// Page number of the `rel="next"` link, if any.
///
/// A next link without a numeric `page` parameter is an error, so a
/// listing is never cut short.
fn next_page(link: Option<&str>) -> std::result::Result<Option<u32>, String> {
    let Some(link) = link else {
        return Ok(None);
    };
    let Some(target) = link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        params
            .split(';')
            .any(|p| p.trim() == r#"rel="next""#)
            .then(|| target.trim().trim_start_matches('<').trim_end_matches('>'))
    }) else {
        return Ok(None);
    };

    let url = Url::parse(target).map_err(|e| format!("invalid next link {}: {}", target, e))?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
        .map(Some)
        .ok_or_else(|| format!("next link has no page number: {}", target))
}

/// Platform message from an error body, else the raw body, else the reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.to_string()
    }
}

fn is_rate_limited(status: StatusCode, quota_spent: bool, message: &str) -> bool {
    match status {
        StatusCode::TOO_MANY_REQUESTS => true,
        StatusCode::FORBIDDEN => quota_spent || message.to_lowercase().contains("rate limit"),
        _ => false,
    }
}

impl ScopeStore for GitHub {
    fn list_entries(&self, target: &ScopeRef, page: u32) -> RemoteResult<Page<String>> {
        let segments = collection_path(target)?;
        let (list, next): (EntryList, _) = self.get_json(&segments, &paging(page))?;

        let entries = if target.scope.is_secret() {
            list.secrets
        } else {
            list.variables
        };
        Ok(Page {
            items: entries.into_iter().map(|e| e.name).collect(),
            next,
        })
    }

    fn public_key(&self, target: &ScopeRef) -> RemoteResult<PublicKey> {
        let (key, _) = self.get_json(&public_key_path(target)?, &[])?;
        Ok(key)
    }

    fn put_secret(&self, target: &ScopeRef, payload: &EncryptedPayload) -> RemoteResult<Upsert> {
        let segments = entry_path(target, &payload.name)?;
        let response = self.execute(Method::PUT, &segments, |r| r.json(payload))?;

        if response.status() == StatusCode::CREATED {
            Ok(Upsert::Created)
        } else {
            Ok(Upsert::Updated)
        }
    }

    fn update_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<()> {
        let segments = entry_path(target, name)?;
        self.execute(Method::PATCH, &segments, |r| {
            r.json(&VariableBody { name, value })
        })?;
        Ok(())
    }

    fn create_variable(&self, target: &ScopeRef, name: &str, value: &str) -> RemoteResult<()> {
        let segments = collection_path(target)?;
        self.execute(Method::POST, &segments, |r| {
            r.json(&VariableBody { name, value })
        })?;
        Ok(())
    }

    fn delete_entry(&self, target: &ScopeRef, name: &str) -> RemoteResult<()> {
        self.execute(Method::DELETE, &entry_path(target, name)?, |r| r)?;
        Ok(())
    }
}

impl Repositories for GitHub {
    fn repository_id(&self, repository: &Repository) -> RemoteResult<u64> {
        let segments = vec![
            "repos".to_string(),
            repository.owner().to_string(),
            repository.name().to_string(),
        ];
        let (info, _): (RepositoryInfo, _) = self.get_json(&segments, &[])?;
        Ok(info.id)
    }

    fn search_page(&self, query: &str, page: u32) -> RemoteResult<Page<Repository>> {
        let segments = vec!["search".to_string(), "repositories".to_string()];
        let [per_page, page] = paging(page);
        let params = [("q", query.to_string()), per_page, page];

        let (results, next): (SearchResults, _) = self.get_json(&segments, &params)?;
        Ok(Page {
            items: results
                .items
                .into_iter()
                .map(|item| Repository::new(item.owner.login, item.name))
                .collect(),
            next,
        })
    }
}

impl RateLimits for GitHub {
    fn quota(&self) -> RemoteResult<Quota> {
        let segments = vec!["rate_limit".to_string()];
        let (body, _): (RateLimitResponse, _) = self.get_json(&segments, &[])?;
        let core = body.resources.core;

        let reset = DateTime::from_timestamp(core.reset, 0).ok_or_else(|| RemoteError::Decode {
            path: "/rate_limit".to_string(),
            reason: format!("reset out of range: {}", core.reset),
        })?;

        Ok(Quota {
            limit: core.limit,
            remaining: core.remaining,
            reset,
        })
    }
}
