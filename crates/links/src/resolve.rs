use crate::RawLink;
use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::ResultExt;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::instrument;

/// Why a short link could not be expanded.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum ResolveFailure {
    #[display("request timed out")]
    Timeout,
    #[display("redirect chain broken: {_0}")]
    Redirect(String),
    #[display("final response was HTTP {_0}")]
    Status(u16),
    #[display("transport error: {_0}")]
    Transport(String),
}
impl From<reqwest::Error> for ResolveFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_redirect() {
            Self::Redirect(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Follows a URL's redirect chain and reports where it ends up.
pub trait Follow {
    fn follow(&self, url: &str) -> std::result::Result<String, ResolveFailure>;
}
impl<F> Follow for F
where
    F: Fn(&str) -> std::result::Result<String, ResolveFailure>,
{
    fn follow(&self, url: &str) -> std::result::Result<String, ResolveFailure> {
        self(url)
    }
}

#[derive(Clone, Debug)]
pub struct ResolverOptions {
    pub timeout: Duration,
    pub max_redirects: usize,
}
impl Default for ResolverOptions {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(15), max_redirects: 10 }
    }
}

/// Blocking HEAD request that follows redirects; one attempt, no retries.
pub struct HttpFollower {
    client: Client,
}
impl HttpFollower {
    pub fn new(options: &ResolverOptions) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::limited(options.max_redirects))
            .timeout(options.timeout)
            .user_agent(concat!("cloudtape/", env!("CARGO_PKG_VERSION")))
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}
impl Follow for HttpFollower {
    fn follow(&self, url: &str) -> std::result::Result<String, ResolveFailure> {
        let response = self.client.head(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveFailure::Status(status.as_u16()));
        }
        Ok(response.url().to_string())
    }
}

/// The outcome of resolving a single [`RawLink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Already canonical; passed through unchanged.
    Canonical(RawLink),
    /// Short link expanded to its final URL.
    Resolved { short: RawLink, url: String },
    /// Short link that could not be expanded; the original is kept.
    Fallback { short: RawLink, reason: ResolveFailure },
}
impl Resolution {
    /// The URL to hand to the downloader.
    pub fn url(&self) -> &str {
        match self {
            Self::Canonical(link) => link.as_str(),
            Self::Resolved { url, .. } => url,
            Self::Fallback { short, .. } => short.as_str(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Expands short links into canonical SoundCloud URLs.
pub struct Resolver {
    follower: Box<dyn Follow>,
}
impl Resolver {
    pub fn new(options: ResolverOptions) -> Result<Self> {
        Ok(Self::with_follower(HttpFollower::new(&options)?))
    }

    pub fn with_follower(follower: impl Follow + 'static) -> Self {
        Self { follower: Box::new(follower) }
    }

    /// Canonical links are returned as-is without touching the network.
    #[instrument(level = "debug", skip_all, fields(link = %link))]
    pub fn resolve(&self, link: &RawLink) -> Resolution {
        if !link.is_short_form() {
            return Resolution::Canonical(link.clone());
        }
        match self.follower.follow(link.as_str()) {
            Ok(url) => {
                tracing::debug!(resolved = %url, "Resolved short link");
                Resolution::Resolved { short: link.clone(), url }
            },
            Err(reason) => {
                tracing::error!(%reason, "Failed to resolve short link; keeping original");
                Resolution::Fallback { short: link.clone(), reason }
            },
        }
    }

    /// Resolves every link, preserving position.
    pub fn resolve_all(&self, links: &[RawLink]) -> Vec<Resolution> {
        links.iter().map(|link| self.resolve(link)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::{BufRead, BufReader, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::rc::Rc;
    use std::thread;

    fn unreachable_follower(_: &str) -> std::result::Result<String, ResolveFailure> {
        panic!("canonical links must not hit the network");
    }

    #[test]
    fn test_canonical_is_identity() {
        let resolver = Resolver::with_follower(unreachable_follower);
        let link = RawLink::new("https://soundcloud.com/artist/track?in=x");
        let resolution = resolver.resolve(&link);
        assert_eq!(resolution, Resolution::Canonical(link.clone()));
        assert_eq!(resolution.url(), link.as_str());
    }

    #[test]
    fn test_short_link_replaced_in_place() {
        let resolver = Resolver::with_follower(|url: &str| {
            assert_eq!(url, "https://on.soundcloud.com/Ab12");
            Ok("https://soundcloud.com/artist/track".to_string())
        });
        let links = vec![
            RawLink::new("https://soundcloud.com/first/one"),
            RawLink::new("https://on.soundcloud.com/Ab12"),
            RawLink::new("https://soundcloud.com/last/one"),
        ];
        let urls: Vec<_> = resolver.resolve_all(&links).iter().map(|r| r.url().to_string()).collect();
        assert_eq!(
            urls,
            vec!["https://soundcloud.com/first/one", "https://soundcloud.com/artist/track", "https://soundcloud.com/last/one"]
        );
    }

    #[test]
    fn test_failure_falls_back_to_original() {
        let resolver = Resolver::with_follower(|_: &str| Err(ResolveFailure::Status(404)));
        let link = RawLink::new("https://on.soundcloud.com/gone");
        let resolution = resolver.resolve(&link);
        assert!(resolution.is_fallback());
        assert_eq!(resolution.url(), "https://on.soundcloud.com/gone");
        assert_eq!(resolution, Resolution::Fallback { short: link, reason: ResolveFailure::Status(404) });
    }

    #[test]
    fn test_single_attempt_per_link() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let resolver = Resolver::with_follower(move |_: &str| {
            counter.set(counter.get() + 1);
            Err(ResolveFailure::Timeout)
        });
        resolver.resolve(&RawLink::new("https://on.soundcloud.com/slow"));
        assert_eq!(calls.get(), 1);
    }

    /// Minimal HTTP/1.1 responder: one request per connection, routed by path.
    fn spawn_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let Ok(clone) = stream.try_clone() else { continue };
                let mut reader = BufReader::new(clone);
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line) {
                        Ok(n) if n > 2 => continue,
                        _ => break,
                    }
                }
                let status = match request_line.split_whitespace().nth(1).unwrap_or("/") {
                    "/short" => "301 Moved Permanently\r\nLocation: /artist/track",
                    "/artist/track" => "200 OK",
                    "/loop" => "302 Found\r\nLocation: /loop",
                    _ => "404 Not Found",
                };
                let response = format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
                let _ = stream.write_all(response.as_bytes());
            }
        });
        addr
    }

    fn follower() -> HttpFollower {
        let client = Client::builder().no_proxy().timeout(Duration::from_secs(5)).build().unwrap();
        HttpFollower::with_client(client)
    }

    #[test]
    fn test_http_follower_reports_final_url() {
        let addr = spawn_server();
        let resolved = follower().follow(&format!("http://{addr}/short")).unwrap();
        assert_eq!(resolved, format!("http://{addr}/artist/track"));
    }

    #[test]
    fn test_http_follower_rejects_error_status() {
        let addr = spawn_server();
        let failure = follower().follow(&format!("http://{addr}/missing")).unwrap_err();
        assert_eq!(failure, ResolveFailure::Status(404));
    }

    #[test]
    fn test_http_follower_gives_up_on_redirect_loop() {
        let addr = spawn_server();
        let client =
            Client::builder().no_proxy().timeout(Duration::from_secs(5)).redirect(Policy::limited(3)).build().unwrap();
        let failure = HttpFollower::with_client(client).follow(&format!("http://{addr}/loop")).unwrap_err();
        assert!(matches!(failure, ResolveFailure::Redirect(_)), "{failure:?}");
    }

    #[test]
    fn test_http_follower_connection_refused() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let failure = follower().follow(&format!("http://{addr}/short")).unwrap_err();
        assert!(matches!(failure, ResolveFailure::Transport(_)));
    }
}
