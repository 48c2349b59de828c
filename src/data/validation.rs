use super::config::ConfigError;

fn ensure_within(value: f64, min: f64, max: f64, label: &'static str) -> Result<f64, ConfigError> {
    if !(min..=max).contains(&value) {
        Err(ConfigError::OutOfRange {
            label,
            min,
            max,
            value,
        })
    } else {
        Ok(value)
    }
}

pub fn validate_latitude(value: f64) -> Result<f64, ConfigError> {
    ensure_within(value, -90.0, 90.0, "Latitude")
}

pub fn validate_longitude(value: f64) -> Result<f64, ConfigError> {
    ensure_within(value, -180.0, 180.0, "Longitude")
}

pub fn validate_horizon(value: f64, label: &'static str) -> Result<f64, ConfigError> {
    ensure_within(value, -45.0, 45.0, label)
}

pub fn validate_parts(value: u32, label: &'static str) -> Result<u32, ConfigError> {
    ensure_within(value as f64, 1.0, 24.0, label).map(|_| value)
}
