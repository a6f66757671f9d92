pub mod analyze;
pub mod principles;
pub mod resolve;
pub mod trades;

use std::path::Path;

use sitegraph_core::{ScheduledEvent, WeatherSnapshot};

/// Load a schedule file: a JSON array of scheduled events.
pub fn load_schedule(path: &Path) -> Result<Vec<ScheduledEvent>, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Load a weather feed file: a JSON array of `{time, condition}` records.
pub fn load_weather(path: &Path) -> Result<Vec<WeatherSnapshot>, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_schedule_accepts_minimal_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        std::fs::write(
            &path,
            r#"[{
                "id": "f1",
                "event_type": "foundation",
                "start_time": "2025-06-01T08:00:00Z",
                "end_time": "2025-06-02T08:00:00Z"
            }]"#,
        )
        .unwrap();

        let events = load_schedule(&path).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "f1");
        assert!(!events[0].inspection_completed);
    }

    #[test]
    fn test_load_weather_rejects_bad_condition_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.json");
        std::fs::write(&path, r#"[{"time": "2025-06-01T08:00:00Z"}]"#).unwrap();
        assert!(load_weather(&path).is_err());
    }
}
