// Sensor service - renders sensor state from the coordinator's data
use crate::application::coordinator::DataUpdateCoordinator;
use crate::domain::metric::Metric;
use crate::domain::sensor::{SENSOR_DESCRIPTIONS, SensorDescription, SensorState};
use std::sync::Arc;

#[derive(Clone)]
pub struct SensorService {
    coordinator: Arc<DataUpdateCoordinator>,
    observee_name: String,
}

impl SensorService {
    pub fn new(coordinator: Arc<DataUpdateCoordinator>, observee_name: impl Into<String>) -> Self {
        Self {
            coordinator,
            observee_name: observee_name.into(),
        }
    }

    pub fn coordinator(&self) -> &Arc<DataUpdateCoordinator> {
        &self.coordinator
    }

    pub async fn list_sensors(&self) -> Vec<SensorState> {
        let mut sensors = Vec::with_capacity(SENSOR_DESCRIPTIONS.len());
        for description in &SENSOR_DESCRIPTIONS {
            sensors.push(self.render(description).await);
        }
        sensors
    }

    pub async fn get_sensor(&self, metric: Metric) -> SensorState {
        self.render(SensorDescription::for_metric(metric)).await
    }

    async fn render(&self, description: &SensorDescription) -> SensorState {
        let data = self.coordinator.data().await;
        let state = SensorState::render(
            description,
            self.coordinator.observee_id(),
            &self.observee_name,
            data.get(description.metric),
            self.coordinator.last_update_success().await,
            self.coordinator.is_enabled(description.metric).await,
        );
        tracing::debug!(
            "Rendered {} = {} for {}",
            description.metric,
            state.state,
            self.observee_name
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake_api::{FakeCanvasApi, Failure, assignment, course};

    #[tokio::test]
    async fn test_list_sensors_after_refresh() {
        let api = Arc::new(FakeCanvasApi::new());
        api.set_assignments(vec![assignment(1, "HW1"), assignment(2, "HW2")]);
        api.set_courses(vec![course(7, "Algebra")]);
        let coordinator = Arc::new(DataUpdateCoordinator::new(api, "42", Metric::ALL));
        coordinator.refresh().await.unwrap();
        let service = SensorService::new(coordinator, "Jamie Doe");

        let sensors = service.list_sensors().await;

        assert_eq!(sensors.len(), 2);
        assert_eq!(sensors[0].key, Metric::MissingAssignments);
        assert_eq!(sensors[0].state, 2);
        assert_eq!(sensors[1].state, 1);
        assert_eq!(sensors[1].name, "Jamie Doe Canvas LMS Courses");
        assert!(sensors.iter().all(|s| s.available));
    }

    #[tokio::test]
    async fn test_stale_values_survive_failed_poll() {
        let api = Arc::new(FakeCanvasApi::new());
        api.set_courses(vec![course(7, "Algebra"), course(8, "Biology")]);
        let coordinator = Arc::new(DataUpdateCoordinator::new(api.clone(), "42", Metric::ALL));
        coordinator.refresh().await.unwrap();
        let service = SensorService::new(coordinator.clone(), "Jamie Doe");

        api.fail_courses(Some(Failure::Communication));
        assert!(coordinator.refresh().await.is_err());

        let sensor = service.get_sensor(Metric::Courses).await;
        assert_eq!(sensor.state, 2);
        assert!(!sensor.available);
    }
}
