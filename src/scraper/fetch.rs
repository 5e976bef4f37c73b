// fetch.rs
use crate::scraper::FetchError;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, USER_AGENT};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36";

/// Identities rotated across requests so consecutive calls don't all look alike.
pub const USER_AGENT_POOL: [&str; 26] = [
    // Chrome
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.157 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.113 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.90 Safari/537.36",
    "Mozilla/5.0 (Windows NT 5.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.90 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.2; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.90 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/44.0.2403.157 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.3; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.113 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/57.0.2987.133 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/57.0.2987.133 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/55.0.2883.87 Safari/537.36",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/55.0.2883.87 Safari/537.36",
    // Internet Explorer
    "Mozilla/4.0 (compatible; MSIE 9.0; Windows NT 6.1)",
    "Mozilla/5.0 (Windows NT 6.1; WOW64; Trident/7.0; rv:11.0) like Gecko",
    "Mozilla/5.0 (compatible; MSIE 9.0; Windows NT 6.1; WOW64; Trident/5.0)",
    "Mozilla/5.0 (Windows NT 6.1; Trident/7.0; rv:11.0) like Gecko",
    "Mozilla/5.0 (Windows NT 6.2; WOW64; Trident/7.0; rv:11.0) like Gecko",
    "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko",
    "Mozilla/5.0 (compatible; MSIE 9.0; Windows NT 6.0; Trident/5.0)",
    "Mozilla/5.0 (Windows NT 6.3; WOW64; Trident/7.0; rv:11.0) like Gecko",
    "Mozilla/5.0 (compatible; MSIE 9.0; Windows NT 6.1; Trident/5.0)",
    "Mozilla/5.0 (Windows NT 6.1; Win64; x64; Trident/7.0; rv:11.0) like Gecko",
    "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.1; WOW64; Trident/6.0)",
    "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.1; Trident/6.0)",
    "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 5.1; Trident/4.0; .NET CLR 2.0.50727; .NET CLR 3.0.4506.2152; .NET CLR 3.5.30729)",
];

/// Delay strategy between attempts.
#[derive(Clone, Debug)]
pub enum Backoff {
    Fixed(Duration),
    /// `base * factor^retry`, capped at `max`. Jitter scales the delay by a
    /// random factor in `[0.5, 1.5)`.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Backoff {
    /// Delay before retry number `retry` (0-based).
    pub fn delay(&self, retry: u32) -> Duration {
        match self {
            Backoff::Fixed(d) => *d,
            Backoff::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exp = factor.powi(retry.min(i32::MAX as u32) as i32);
                let mut secs = (base.as_secs_f64() * exp).min(max.as_secs_f64());
                if *jitter {
                    secs *= rand::thread_rng().gen_range(0.5..1.5);
                }
                Duration::from_secs_f64(secs.max(0.0))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Total attempts are `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
    pub retry_on_status: Vec<u16>,
    pub retry_on_timeout: bool,
    pub retry_on_connect: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 6,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(600),
                factor: 2.0,
                max: Duration::from_secs(20),
                jitter: true,
            },
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryConfig,
    pub user_agents: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
            user_agents: USER_AGENT_POOL.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

enum AttemptError {
    Timeout,
    Transport(String),
    Fatal(String),
}

/// Blocking GET client with bounded retries. One per worker thread.
pub struct FetchClient {
    client: Client,
    config: FetchConfig,
}

impl FetchClient {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Picks an identity uniformly at random; an empty pool falls back to the default.
    pub fn user_agent(&self) -> &str {
        self.config
            .user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.fetch(url, &HeaderMap::new())
    }

    /// GET `url`, retrying transient statuses and transport failures.
    ///
    /// Any status outside the retry set (including 4xx) comes back as `Ok`;
    /// the caller decides what a 404 means.
    pub fn fetch(&self, url: &str, headers: &HeaderMap) -> Result<FetchResponse, FetchError> {
        let retry = &self.config.retry;
        let max_attempts = retry.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let start = Instant::now();

            match self.try_fetch(url, headers) {
                Ok(resp) if retry.retry_on_status.contains(&resp.status) => {
                    warn!(
                        url,
                        attempt,
                        status = resp.status,
                        elapsed = ?start.elapsed(),
                        "transient status"
                    );
                    if attempt >= max_attempts {
                        return Err(FetchError::MaxRetriesExceeded {
                            url: url.to_string(),
                            attempts: attempt,
                            last_status: resp.status,
                        });
                    }
                }
                Ok(resp) => {
                    debug!(url, attempt, status = resp.status, elapsed = ?start.elapsed(), "fetched");
                    return Ok(resp);
                }
                Err(AttemptError::Timeout) => {
                    warn!(url, attempt, elapsed = ?start.elapsed(), "request timed out");
                    if !retry.retry_on_timeout || attempt >= max_attempts {
                        return Err(FetchError::Timeout {
                            url: url.to_string(),
                        });
                    }
                }
                Err(AttemptError::Transport(reason)) => {
                    warn!(url, attempt, error = %reason, "request failed");
                    if !retry.retry_on_connect || attempt >= max_attempts {
                        return Err(FetchError::ConnectionFailed {
                            url: url.to_string(),
                            reason,
                        });
                    }
                }
                Err(AttemptError::Fatal(reason)) => {
                    return Err(FetchError::ConnectionFailed {
                        url: url.to_string(),
                        reason,
                    });
                }
            }

            std::thread::sleep(retry.backoff.delay(attempt - 1));
        }
    }

    fn try_fetch(&self, url: &str, headers: &HeaderMap) -> Result<FetchResponse, AttemptError> {
        let mut request = self.client.get(url).headers(headers.clone());
        if !headers.contains_key(USER_AGENT) {
            request = request.header(USER_AGENT, self.user_agent());
        }

        let resp = request.send().map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(classify)?;

        Ok(FetchResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> AttemptError {
    if err.is_timeout() {
        AttemptError::Timeout
    } else if err.is_builder() {
        AttemptError::Fatal(err.to_string())
    } else {
        AttemptError::Transport(err.to_string())
    }
}
