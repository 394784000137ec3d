// Declarative sensor descriptions and rendered sensor state
use crate::domain::metric::{Metric, MetricData};
use serde::Serialize;
use serde_json::{Value, json};

pub const DOMAIN: &str = "canvas_lms";
pub const NAME: &str = "Canvas LMS";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const ATTRIBUTION: &str = "Data provided by Canvas LMS";

#[derive(Debug, Clone, Copy)]
pub struct SensorDescription {
    pub metric: Metric,
    pub name: &'static str,
    pub icon: &'static str,
    pub attributes_fn: fn(&MetricData) -> Value,
}

pub static SENSOR_DESCRIPTIONS: [SensorDescription; 2] = [
    SensorDescription {
        metric: Metric::MissingAssignments,
        name: "Canvas LMS Missing Assignments",
        icon: "mdi:format-quote-close",
        attributes_fn: assignment_attributes,
    },
    SensorDescription {
        metric: Metric::Courses,
        name: "Canvas LMS Courses",
        icon: "mdi:format-quote-close",
        attributes_fn: course_attributes,
    },
];

fn assignment_attributes(data: &MetricData) -> Value {
    json!({"assignments": data, "count": data.len()})
}

fn course_attributes(data: &MetricData) -> Value {
    json!({"courses": data, "count": data.len()})
}

impl SensorDescription {
    pub fn for_metric(metric: Metric) -> &'static SensorDescription {
        match metric {
            Metric::MissingAssignments => &SENSOR_DESCRIPTIONS[0],
            Metric::Courses => &SENSOR_DESCRIPTIONS[1],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: &'static str,
    pub manufacturer: &'static str,
    pub sw_version: &'static str,
}

/// Observable state of one sensor
#[derive(Debug, Clone, Serialize)]
pub struct SensorState {
    pub key: Metric,
    pub unique_id: String,
    pub name: String,
    pub icon: &'static str,
    pub state: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    pub available: bool,
    pub enabled: bool,
    pub attribution: &'static str,
    pub device: DeviceInfo,
}

impl SensorState {
    pub fn render(
        description: &SensorDescription,
        observee_id: &str,
        observee_name: &str,
        data: Option<&MetricData>,
        available: bool,
        enabled: bool,
    ) -> Self {
        // Disabled sensors have no state even if stale data is still held
        let data = data.filter(|_| enabled);
        let state = data.map(|d| d.len()).unwrap_or(0);
        let attributes = data
            .filter(|d| !d.is_empty())
            .map(|d| (description.attributes_fn)(d));

        Self {
            key: description.metric,
            unique_id: format!("{}_{}_{}", DOMAIN, observee_id, description.metric.key()),
            name: format!("{} {}", observee_name, description.name),
            icon: description.icon,
            state,
            attributes,
            available,
            enabled,
            attribution: ATTRIBUTION,
            device: DeviceInfo {
                identifier: format!("{}_{}", DOMAIN, observee_id),
                name: NAME,
                manufacturer: NAME,
                sw_version: VERSION,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assignment::MissingAssignment;

    fn assignment(id: u64) -> MissingAssignment {
        MissingAssignment {
            id,
            name: format!("HW{}", id),
            description: None,
            due_date: None,
            locks_at: None,
            course: "Algebra".to_string(),
            course_og_name: None,
        }
    }

    #[test]
    fn test_descriptions_cover_every_metric() {
        for metric in Metric::ALL {
            assert_eq!(SensorDescription::for_metric(metric).metric, metric);
        }
    }

    #[test]
    fn test_render_counts_and_builds_attributes() {
        let data = MetricData::MissingAssignments(vec![assignment(1), assignment(2)]);
        let description = SensorDescription::for_metric(Metric::MissingAssignments);

        let state = SensorState::render(description, "42", "Jamie", Some(&data), true, true);

        assert_eq!(state.state, 2);
        assert_eq!(state.name, "Jamie Canvas LMS Missing Assignments");
        assert_eq!(state.unique_id, "canvas_lms_42_missing_assignments");
        let attributes = state.attributes.unwrap();
        assert_eq!(attributes["count"], 2);
        assert_eq!(attributes["assignments"][1]["name"], "HW2");
    }

    #[test]
    fn test_render_without_data() {
        let description = SensorDescription::for_metric(Metric::Courses);

        let state = SensorState::render(description, "42", "Jamie", None, false, true);
        assert_eq!(state.state, 0);
        assert!(state.attributes.is_none());
        assert!(!state.available);

        let empty = MetricData::Courses(Vec::new());
        let state = SensorState::render(description, "42", "Jamie", Some(&empty), true, true);
        assert_eq!(state.state, 0);
        assert!(state.attributes.is_none());
    }

    #[test]
    fn test_render_disabled_hides_stale_data() {
        let data = MetricData::MissingAssignments(vec![assignment(1)]);
        let description = SensorDescription::for_metric(Metric::MissingAssignments);

        let state = SensorState::render(description, "42", "Jamie", Some(&data), true, false);

        assert_eq!(state.state, 0);
        assert!(state.attributes.is_none());
        assert!(!state.enabled);
    }
}
