use serde::Serialize;

/// Sensor shutter mode requested for the camera.
///
/// The string forms are the values accepted for the `shutter_mode`
/// parameter. Anything unrecognised, including an empty string, selects
/// [`ShutterMode::Default`], which leaves the camera's own setting alone.
#[derive(
    Default,
    Debug,
    Hash,
    Eq,
    PartialEq,
    Clone,
    Copy,
    Serialize,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
pub enum ShutterMode {
    #[default]
    #[strum(serialize = "default_shutter_mode")]
    #[serde(rename = "default_shutter_mode")]
    Default,
    #[strum(serialize = "rolling")]
    #[serde(rename = "rolling")]
    Rolling,
    #[strum(serialize = "global")]
    #[serde(rename = "global")]
    Global,
    #[strum(serialize = "global_reset")]
    #[serde(rename = "global_reset")]
    GlobalResetRelease,
}

impl ShutterMode {
    /// Map a raw parameter string to a shutter mode. Never fails.
    pub fn from_param(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// Parameter string for this mode.
    pub fn as_param(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_known_strings() {
        assert_eq!(ShutterMode::from_param("rolling"), ShutterMode::Rolling);
        assert_eq!(ShutterMode::from_param("global"), ShutterMode::Global);
        assert_eq!(
            ShutterMode::from_param("global_reset"),
            ShutterMode::GlobalResetRelease
        );
    }

    #[test]
    fn test_unknown_strings_fall_back_to_default() {
        for raw in ["", "bogus", "Rolling", "global_reset_release"] {
            assert_eq!(ShutterMode::from_param(raw), ShutterMode::Default, "{raw:?}");
        }
    }

    #[test]
    fn test_param_string_matches_display() {
        for mode in ShutterMode::iter() {
            assert_eq!(mode.as_param(), mode.to_string());
            assert_eq!(mode.as_param(), mode.as_ref());
            assert_eq!(ShutterMode::from_param(mode.as_param()), mode);
        }
        assert_eq!(ShutterMode::Default.as_param(), "default_shutter_mode");
        assert_eq!(ShutterMode::Rolling.as_param(), "rolling");
        assert_eq!(ShutterMode::Global.as_param(), "global");
        assert_eq!(ShutterMode::GlobalResetRelease.as_param(), "global_reset");
    }
}
