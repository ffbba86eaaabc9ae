use crate::core::config::EntrezConfig;
use crate::entrez::term::SearchTerm;
use crate::{PhylofetchError, Result};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Floor on the wall-clock gap between consecutive remote calls. NCBI allows
/// 3 requests per second per client; 340 ms keeps us under that ceiling.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(340);

const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Minimal GET seam so tests can stand in for the remote service.
pub trait Transport {
    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String>;
}

/// Blocking HTTP transport against the Entrez eutils endpoints.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("phylofetch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(HttpTransport {
            client,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }
}

/// Token-interval gate shared by every remote operation. `wait` blocks until
/// at least `min_interval` has passed since the previous call it admitted,
/// regardless of which operation made that call.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        RateGate {
            min_interval,
            last_call: None,
        }
    }

    pub fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                std::thread::sleep(self.min_interval - elapsed);
            }
        }
        self.last_call = Some(Instant::now());
    }
}

#[derive(Deserialize)]
struct ESearchResponse {
    esearchresult: ESearchResult,
}

#[derive(Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// Rate-limited client over the two Entrez operations this system needs:
/// identifier search (esearch) and record fetch (efetch).
pub struct EntrezClient<T: Transport = HttpTransport> {
    transport: T,
    gate: RateGate,
    database: String,
    email: Option<String>,
    api_key: Option<String>,
}

impl EntrezClient<HttpTransport> {
    pub fn new(config: &EntrezConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.base_url.as_deref())?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> EntrezClient<T> {
    pub fn with_transport(transport: T, config: &EntrezConfig) -> Self {
        EntrezClient {
            transport,
            gate: RateGate::new(Duration::from_millis(config.min_interval_ms)),
            database: config.database.clone(),
            email: config.email.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn identification_params(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(email) = &self.email {
            params.push(("email", email.clone()));
        }
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
    }

    /// Return the identifier at position `rank` (0-based) among up to
    /// `max_results` esearch hits for `term`, or `None` when fewer hits
    /// exist.
    ///
    /// Precondition, not enforced here: replacement rounds at rank+1 assume
    /// the service orders hits stably across repeated identical searches.
    pub fn search(
        &mut self,
        term: &SearchTerm,
        rank: usize,
        max_results: usize,
    ) -> Result<Option<String>> {
        let query = term.to_query();
        let mut params = vec![
            ("db", self.database.clone()),
            ("term", query.clone()),
            ("retmax", max_results.to_string()),
            ("retmode", "json".to_string()),
        ];
        self.identification_params(&mut params);

        self.gate.wait();
        debug!(term = %query, rank, "esearch");
        let body = self.transport.get("esearch.fcgi", &params)?;
        let parsed: ESearchResponse = serde_json::from_str(&body)
            .map_err(|e| PhylofetchError::Parse(format!("esearch payload: {e}")))?;
        Ok(parsed.esearchresult.idlist.into_iter().nth(rank))
    }

    /// Fetch the full GenBank flat-file record for one identifier.
    pub fn fetch(&mut self, uid: &str) -> Result<String> {
        let mut params = vec![
            ("db", self.database.clone()),
            ("id", uid.to_string()),
            ("rettype", "gb".to_string()),
            ("retmode", "text".to_string()),
        ];
        self.identification_params(&mut params);

        self.gate.wait();
        debug!(uid, "efetch");
        self.transport.get("efetch.fcgi", &params)
    }
}
