//! Transit API HTTP client.
//!
//! Every query is a GET on
//! `{scheme}://{host}/lines/line:IDFM:{line_id}/{endpoint}?{query}`.
//! The client never retries and never caches.

use chrono::{Local, NaiveDate};
use reqwest::Url;
use tracing::debug;

use crate::domain::StationId;

use super::error::TransitError;
use super::types::StationRecord;

/// Default API host.
pub const DEFAULT_HOST: &str = "api-iv.iledefrance-mobilites.fr";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Date format of the `date` query parameter.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Endpoint below a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// Schedules of the whole line
    Schedules,
    /// Stop areas served by the line
    Stops,
    /// Schedules at one stop area of the line
    StationSchedules(&'a StationId),
}

impl Endpoint<'_> {
    fn path(&self) -> String {
        match self {
            Endpoint::Schedules => "schedules".to_string(),
            Endpoint::Stops => "stops".to_string(),
            Endpoint::StationSchedules(station) => {
                format!("stops/stop_area:IDFM:{}/schedules", station.as_str())
            }
        }
    }
}

/// Configuration for the transit API client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// URL scheme (https in production)
    pub scheme: String,
    /// API host, optionally with a port
    pub host: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransitConfig {
    /// Create a config for the given host over HTTPS.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            scheme: "https".to_string(),
            host: host.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the URL scheme (for testing against a plain HTTP server).
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

/// Read-only client for the transit API.
#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    scheme: String,
    host: String,
}

impl TransitClient {
    /// Create a new transit API client.
    pub fn new(config: TransitConfig) -> Result<Self, TransitError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            scheme: config.scheme,
            host: config.host,
        })
    }

    /// Build the URL of an endpoint of a line.
    pub fn url(
        &self,
        line_id: &str,
        endpoint: Endpoint<'_>,
        params: &[(&str, String)],
    ) -> Result<Url, TransitError> {
        let base = format!(
            "{}://{}/lines/line:IDFM:{}/{}",
            self.scheme,
            self.host,
            line_id,
            endpoint.path()
        );

        let url = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, params)
        };

        url.map_err(|e| TransitError::InvalidUrl {
            message: format!("{base}: {e}"),
        })
    }

    /// URL for the schedules of a line, or of a line at one station.
    pub fn schedules_url(
        &self,
        line_id: &str,
        station: Option<&StationId>,
        include_realtime: bool,
        complete: bool,
        date: NaiveDate,
    ) -> Result<Url, TransitError> {
        let endpoint = match station {
            Some(station) => Endpoint::StationSchedules(station),
            None => Endpoint::Schedules,
        };

        self.url(
            line_id,
            endpoint,
            &[
                ("it", include_realtime.to_string()),
                ("complete", complete.to_string()),
                ("date", date.format(DATE_FORMAT).to_string()),
            ],
        )
    }

    /// URL for the stop areas of a line.
    pub fn stations_url(
        &self,
        line_id: &str,
        stop_points: bool,
        routes: bool,
    ) -> Result<Url, TransitError> {
        self.url(
            line_id,
            Endpoint::Stops,
            &[
                ("stopPoints", stop_points.to_string()),
                ("routes", routes.to_string()),
            ],
        )
    }

    /// URL for the real-time passages of a line at one station.
    pub fn real_time_url(
        &self,
        line_id: &str,
        station: &StationId,
        date: NaiveDate,
    ) -> Result<Url, TransitError> {
        self.url(
            line_id,
            Endpoint::StationSchedules(station),
            &[
                ("date", date.format(DATE_FORMAT).to_string()),
                ("it", true.to_string()),
            ],
        )
    }

    /// Schedules of a line, optionally restricted to one station.
    ///
    /// Always queries for today's date (server local clock).
    pub async fn get_schedules(
        &self,
        line_id: &str,
        station: Option<&StationId>,
        include_realtime: bool,
        complete: bool,
    ) -> Result<serde_json::Value, TransitError> {
        let url = self.schedules_url(line_id, station, include_realtime, complete, today())?;
        self.fetch_json(url).await
    }

    /// Stop areas served by a line.
    pub async fn get_stations(
        &self,
        line_id: &str,
        stop_points: bool,
        routes: bool,
    ) -> Result<Vec<StationRecord>, TransitError> {
        let url = self.stations_url(line_id, stop_points, routes)?;
        let value = self.fetch_json(url).await?;

        serde_json::from_value(value).map_err(|e| TransitError::Format {
            message: format!("expected a list of stop areas: {e}"),
            body: None,
        })
    }

    /// Real-time passages of a line at one station, for today.
    pub async fn get_real_time(
        &self,
        line_id: &str,
        station: &StationId,
    ) -> Result<serde_json::Value, TransitError> {
        let url = self.real_time_url(line_id, station, today())?;
        self.fetch_json(url).await
    }

    /// Issue a GET and parse the body as a JSON object or array.
    async fn fetch_json(&self, url: Url) -> Result<serde_json::Value, TransitError> {
        debug!(%url, "querying transit API");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| TransitError::Format {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if !(value.is_object() || value.is_array()) {
            return Err(TransitError::Format {
                message: "expected a JSON object or array".to_string(),
                body: Some(body.chars().take(500).collect()),
            });
        }

        Ok(value)
    }
}

/// Today's date on the server clock.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, mock};

    fn client() -> TransitClient {
        TransitClient::new(TransitConfig::default()).unwrap()
    }

    fn mock_client() -> TransitClient {
        let host = mockito::server_address().to_string();
        TransitClient::new(TransitConfig::new(host).with_scheme("http")).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 7).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = TransitConfig::default();
        assert_eq!(config.scheme, "https");
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_builder() {
        let config = TransitConfig::new("localhost:8080")
            .with_scheme("http")
            .with_timeout(2);
        assert_eq!(config.scheme, "http");
        assert_eq!(config.host, "localhost:8080");
        assert_eq!(config.timeout_secs, 2);
    }

    #[test]
    fn line_schedules_url() {
        let url = client()
            .schedules_url("C01374", None, true, false, date())
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api-iv.iledefrance-mobilites.fr/lines/line:IDFM:C01374/schedules?it=true&complete=false&date=2024-04-07"
        );
    }

    #[test]
    fn schedules_url_uses_today() {
        let expected = Local::now().format("%Y-%m-%d").to_string();
        let url = client()
            .schedules_url("C01374", None, true, false, today())
            .unwrap();

        assert!(url.path().ends_with("/schedules"));
        assert!(
            url.query_pairs()
                .any(|(k, v)| k == "date" && v == expected.as_str())
        );
    }

    #[test]
    fn station_schedules_url() {
        let station = StationId::new("71264");
        let url = client()
            .schedules_url("C01374", Some(&station), true, true, date())
            .unwrap();

        assert_eq!(
            url.path(),
            "/lines/line:IDFM:C01374/stops/stop_area:IDFM:71264/schedules"
        );
        assert_eq!(url.query(), Some("it=true&complete=true&date=2024-04-07"));
    }

    #[test]
    fn stations_url() {
        let url = client().stations_url("C01374", false, false).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api-iv.iledefrance-mobilites.fr/lines/line:IDFM:C01374/stops?stopPoints=false&routes=false"
        );
    }

    #[test]
    fn real_time_url_uses_its_parameters() {
        let station = StationId::new("43114");
        let url = client().real_time_url("C01371", &station, date()).unwrap();

        assert_eq!(
            url.path(),
            "/lines/line:IDFM:C01371/stops/stop_area:IDFM:43114/schedules"
        );
        assert_eq!(url.query(), Some("date=2024-04-07&it=true"));
    }

    #[test]
    fn url_without_params() {
        let url = client().url("C01374", Endpoint::Stops, &[]).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn invalid_host_is_rejected() {
        let client = TransitClient::new(TransitConfig::new("bad host")).unwrap();
        let err = client.stations_url("C01374", false, false).unwrap_err();
        assert!(matches!(err, TransitError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn get_stations_parses_records() {
        let _m = mock(
            "GET",
            Matcher::Regex(r"^/lines/line:IDFM:C01374/stops".to_string()),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": "stop_area:IDFM:71264", "name": "Châtelet"},
                {"id": "stop_area:IDFM:71359", "name": "Cité"}
            ]"#,
        )
        .create();

        let stations = mock_client()
            .get_stations("C01374", false, false)
            .await
            .unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].station_id().as_str(), "71264");
        assert_eq!(stations[1].name, "Cité");
    }

    #[tokio::test]
    async fn get_stations_unexpected_shape() {
        let _m = mock(
            "GET",
            Matcher::Regex(r"^/lines/line:IDFM:C09001/stops".to_string()),
        )
        .with_status(200)
        .with_body(r#"{"stops": []}"#)
        .create();

        let err = mock_client()
            .get_stations("C09001", false, false)
            .await
            .unwrap_err();
        assert!(matches!(err, TransitError::Format { .. }));
    }

    #[tokio::test]
    async fn get_schedules_non_json() {
        let _m = mock(
            "GET",
            Matcher::Regex(r"^/lines/line:IDFM:C09002/schedules".to_string()),
        )
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create();

        let err = mock_client()
            .get_schedules("C09002", None, true, false)
            .await
            .unwrap_err();
        match err {
            TransitError::Format { body, .. } => {
                assert_eq!(body.as_deref(), Some("<html>maintenance</html>"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn get_schedules_error_status() {
        let _m = mock(
            "GET",
            Matcher::Regex(r"^/lines/line:IDFM:C09003/schedules".to_string()),
        )
        .with_status(502)
        .with_body("Bad Gateway")
        .create();

        let err = mock_client()
            .get_schedules("C09003", None, true, false)
            .await
            .unwrap_err();
        assert!(matches!(err, TransitError::Api { status: 502, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn get_real_time_passes_json_through() {
        let _m = mock(
            "GET",
            Matcher::Regex(
                r"^/lines/line:IDFM:C01374/stops/stop_area:IDFM:71264/schedules".to_string(),
            ),
        )
        .with_status(200)
        .with_body(r#"{"nextDepartures": {"data": []}}"#)
        .create();

        let value = mock_client()
            .get_real_time("C01374", &StationId::new("71264"))
            .await
            .unwrap();
        assert!(value["nextDepartures"]["data"].is_array());
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        let config = TransitConfig::new("127.0.0.1:9")
            .with_scheme("http")
            .with_timeout(1);
        let client = TransitClient::new(config).unwrap();

        let err = client.get_stations("C01374", false, false).await.unwrap_err();
        assert!(matches!(err, TransitError::Unavailable(_)));
    }
}
