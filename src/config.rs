use serde::{Deserialize, Serialize};

/// Overrides for the filter bank's default parameters.
///
/// Radii are absolute bin counts measured from the zero-frequency bin. Any
/// field left as `None` falls back to the size-derived default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub low_pass_radius: Option<f64>,
    pub high_pass_radius: Option<f64>,
    pub band_inner: Option<f64>,
    pub band_outer: Option<f64>,
    /// Phase rotation in radians.
    pub phase_angle: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Side length of the square patterns fed to the engine.
    pub size: usize,
    /// Length `N` used by the root-of-unity check.
    pub root_check_length: usize,
    pub filters: FilterConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            size: 256,
            root_check_length: 8,
            filters: FilterConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: HarnessConfig =
            serde_json::from_str(r#"{ "size": 64, "filters": { "phase_angle": 1.5 } }"#).unwrap();
        assert_eq!(config.size, 64);
        assert_eq!(config.root_check_length, 8);
        assert_eq!(config.filters.phase_angle, Some(1.5));
        assert_eq!(config.filters.low_pass_radius, None);
    }
}
