// Data update coordinator - single poll for all sensors on a fixed interval
use crate::application::canvas_api::CanvasApi;
use crate::domain::errors::{CanvasError, CanvasResult};
use crate::domain::metric::{Metric, MetricData, PollResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

pub const UPDATE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Authentication failed, credentials need re-entry: {0}")]
    AuthFailed(#[source] CanvasError),

    #[error("Update failed: {0}")]
    UpdateFailed(#[source] CanvasError),
}

impl From<CanvasError> for CoordinatorError {
    fn from(err: CanvasError) -> Self {
        match err {
            CanvasError::Authentication(_) => CoordinatorError::AuthFailed(err),
            _ => CoordinatorError::UpdateFailed(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateState {
    Pending,
    Ok,
    UpdateFailed,
    AuthFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoordinatorStatus {
    pub observee_id: String,
    pub state: UpdateState,
    pub last_update_success: bool,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub enabled: Vec<Metric>,
    pub update_interval_secs: u64,
}

#[derive(Debug)]
struct CoordinatorState {
    data: PollResult,
    update_state: UpdateState,
    last_success_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

pub struct DataUpdateCoordinator {
    api: Arc<dyn CanvasApi>,
    observee_id: String,
    update_interval: Duration,
    enabled: RwLock<BTreeSet<Metric>>,
    state: RwLock<CoordinatorState>,
    // Held for the whole poll so refreshes never overlap
    refresh_lock: Mutex<()>,
}

impl DataUpdateCoordinator {
    pub fn new(
        api: Arc<dyn CanvasApi>,
        observee_id: impl Into<String>,
        enabled: impl IntoIterator<Item = Metric>,
    ) -> Self {
        let observee_id = observee_id.into();
        info!("Registering coordinator for observee {}", observee_id);

        Self {
            api,
            observee_id,
            update_interval: UPDATE_INTERVAL,
            enabled: RwLock::new(enabled.into_iter().collect()),
            state: RwLock::new(CoordinatorState {
                data: PollResult::new(),
                update_state: UpdateState::Pending,
                last_success_at: None,
                last_error: None,
            }),
            refresh_lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub fn with_update_interval(mut self, update_interval: Duration) -> Self {
        self.update_interval = update_interval;
        self
    }

    pub fn observee_id(&self) -> &str {
        &self.observee_id
    }

    /// Initial forced poll; the caller must not start serving if this fails
    pub async fn first_refresh(&self) -> Result<(), CoordinatorError> {
        info!("Performing first refresh for observee {}", self.observee_id);
        self.refresh().await
    }

    /// Poll every enabled metric and replace the stored result on success.
    /// On failure the last good result is kept.
    pub async fn refresh(&self) -> Result<(), CoordinatorError> {
        let _guard = self.refresh_lock.lock().await;
        let metrics = self.enabled_metrics().await;
        debug!("Polling {:?} for observee {}", metrics, self.observee_id);

        match self.poll(&metrics).await {
            Ok(data) => {
                let mut state = self.state.write().await;
                state.data = data;
                state.update_state = UpdateState::Ok;
                state.last_success_at = Some(Utc::now());
                state.last_error = None;
                info!(
                    "Finished fetching {} metrics for observee {}",
                    metrics.len(),
                    self.observee_id
                );
                Ok(())
            }
            Err(err) => {
                let mut state = self.state.write().await;
                state.update_state = match err {
                    CoordinatorError::AuthFailed(_) => UpdateState::AuthFailed,
                    CoordinatorError::UpdateFailed(_) => UpdateState::UpdateFailed,
                };
                state.last_error = Some(err.to_string());
                error!("Error fetching data for observee {}: {}", self.observee_id, err);
                Err(err)
            }
        }
    }

    /// Sequential fetch; the first failure aborts the cycle
    async fn poll(&self, metrics: &[Metric]) -> Result<PollResult, CoordinatorError> {
        let mut result = PollResult::new();
        for &metric in metrics {
            let data = self.fetch(metric).await?;
            debug!("Fetched {} {} records", data.len(), metric);
            result.insert(metric, data);
        }
        Ok(result)
    }

    async fn fetch(&self, metric: Metric) -> CanvasResult<MetricData> {
        info!("Retrieving {} for {}", metric, self.observee_id);
        match metric {
            Metric::MissingAssignments => Ok(MetricData::MissingAssignments(
                self.api.get_missing_assignments(&self.observee_id).await?,
            )),
            Metric::Courses => Ok(MetricData::Courses(
                self.api.get_courses(&self.observee_id).await?,
            )),
        }
    }

    /// Poll on the update interval. Ticks are skipped while credentials are
    /// rejected; a successful manual refresh resumes polling.
    /// Expects `first_refresh` to have run already.
    pub async fn run(self: Arc<Self>) {
        let start = Instant::now() + self.update_interval;
        let mut interval = tokio::time::interval_at(start, self.update_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if self.state.read().await.update_state == UpdateState::AuthFailed {
                debug!(
                    "Skipping update for observee {}: credentials need re-entry",
                    self.observee_id
                );
                continue;
            }

            match self.refresh().await {
                Ok(()) => {}
                Err(CoordinatorError::AuthFailed(_)) => {
                    warn!(
                        "Pausing updates for observee {} until a refresh succeeds, rerun setup if the token was revoked",
                        self.observee_id
                    );
                }
                // Already logged; keep the last good data and try again next tick
                Err(CoordinatorError::UpdateFailed(_)) => {}
            }
        }
    }

    pub async fn data(&self) -> PollResult {
        self.state.read().await.data.clone()
    }

    pub async fn last_update_success(&self) -> bool {
        self.state.read().await.update_state == UpdateState::Ok
    }

    pub async fn enabled_metrics(&self) -> Vec<Metric> {
        self.enabled.read().await.iter().copied().collect()
    }

    pub async fn is_enabled(&self, metric: Metric) -> bool {
        self.enabled.read().await.contains(&metric)
    }

    /// Takes effect on the next poll
    pub async fn set_enabled(&self, metric: Metric, enabled: bool) {
        let mut set = self.enabled.write().await;
        if enabled {
            set.insert(metric);
        } else {
            debug!("Sensor {} is disabled", metric);
            set.remove(&metric);
        }
    }

    pub async fn status(&self) -> CoordinatorStatus {
        let state = self.state.read().await;
        CoordinatorStatus {
            observee_id: self.observee_id.clone(),
            state: state.update_state,
            last_update_success: state.update_state == UpdateState::Ok,
            last_success_at: state.last_success_at,
            last_error: state.last_error.clone(),
            enabled: self.enabled_metrics().await,
            update_interval_secs: self.update_interval.as_secs(),
        }
    }
}
