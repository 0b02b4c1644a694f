//! HTTP client for the upstream schedule feed.
//!
//! This is the fetch boundary: everything it returns goes straight into
//! `courtcal_core::schedule::normalize`, which owns interpretation of the
//! payload. Failures surface as `CourtCalError::Fetch`.

use std::time::Duration;

use courtcal_core::schedule::ScheduleResponse;
use courtcal_core::{CourtCalError, CourtCalResult};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub struct NbaClient {
    http: reqwest::Client,
}

impl NbaClient {
    pub fn new() -> CourtCalResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CourtCalError::Fetch(format!("could not build HTTP client: {e}")))?;

        Ok(NbaClient { http })
    }

    /// Fetch the full-season schedule for a season like "2024-25".
    pub async fn full_schedule(&self, season: &str) -> CourtCalResult<ScheduleResponse> {
        let year = season_start_year(season)?;
        let url = format!(
            "https://data.nba.com/data/10s/v2015/json/mobile_teams/nba/{year}/league/00_full_schedule.json"
        );
        tracing::debug!(%url, "fetching schedule");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .header("Referer", "https://www.nba.com/")
            .send()
            .await
            .map_err(|e| CourtCalError::Fetch(format!("request to {url} failed: {e}")))?
            .error_for_status()
            .map_err(|e| CourtCalError::Fetch(format!("upstream rejected the request: {e}")))?;

        response
            .json::<ScheduleResponse>()
            .await
            .map_err(|e| CourtCalError::Fetch(format!("could not decode schedule payload: {e}")))
    }
}

fn season_start_year(season: &str) -> CourtCalResult<i32> {
    season
        .split('-')
        .next()
        .and_then(|year| year.parse().ok())
        .ok_or_else(|| CourtCalError::Fetch(format!("invalid season identifier: '{season}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_start_year_parses_the_leading_year() {
        assert_eq!(season_start_year("2024-25").unwrap(), 2024);
        assert_eq!(season_start_year("1999-00").unwrap(), 1999);
        assert!(season_start_year("next season").is_err());
    }
}
