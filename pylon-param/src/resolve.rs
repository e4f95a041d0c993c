//! Building a parameter set from the raw store.
//!
//! Reading happens in a fixed order:
//!
//! 1. deprecated names are copied into their fields,
//! 2. the canonical names are read on top, so a canonical key always beats
//!    its deprecated alias,
//! 3. the brightness request is dropped when exposure and gain are both
//!    pinned.
//!
//! Range checks are left to [`crate::validate`].

use tracing::debug;

use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::keys;
use crate::params::{CameraParameters, DEFAULT_BINNING, DEFAULT_CAMERA_FRAME};
use crate::shutter::ShutterMode;
use crate::store::ParameterStore;

/// Field a deprecated key still feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTarget {
    FrameRate,
    Exposure,
    Gain,
}

impl AliasTarget {
    fn slot<'a>(&self, params: &'a mut CameraParameters) -> &'a mut f64 {
        match self {
            Self::FrameRate => &mut params.frame_rate,
            Self::Exposure => params.exposure.raw_mut(),
            Self::Gain => params.gain.raw_mut(),
        }
    }
}

/// A renamed parameter that is still honoured.
#[derive(Debug, Clone, Copy)]
pub struct DeprecatedAlias {
    pub key: &'static str,
    pub replacement: &'static str,
    pub target: AliasTarget,
    pub hint: &'static str,
}

const DEFAULT_YAML_HINT: &str =
    "see the default.yaml config file of the pylon_camera package for its usage";

pub const DEPRECATED_ALIASES: &[DeprecatedAlias] = &[
    DeprecatedAlias {
        key: keys::DESIRED_FRAMERATE,
        replacement: keys::FRAME_RATE,
        target: AliasTarget::FrameRate,
        hint: "",
    },
    DeprecatedAlias {
        key: keys::START_EXPOSURE,
        replacement: keys::EXPOSURE,
        target: AliasTarget::Exposure,
        hint: DEFAULT_YAML_HINT,
    },
    DeprecatedAlias {
        key: keys::TARGET_GAIN,
        replacement: keys::GAIN,
        target: AliasTarget::Gain,
        hint: DEFAULT_YAML_HINT,
    },
];

/// Read a parameter set from `store` without range checking it.
pub fn resolve<S: ParameterStore>(store: &S, sink: &dyn DiagnosticSink) -> CameraParameters {
    let mut params = CameraParameters::default();

    apply_deprecated_aliases(&mut params, store, sink);

    params.camera_frame = store.read(keys::CAMERA_FRAME, DEFAULT_CAMERA_FRAME.to_string());
    params.device_user_id = store.read(keys::DEVICE_USER_ID, String::new());
    params.binning = store.read(keys::BINNING, DEFAULT_BINNING);

    read_intensity(&mut params, store, sink);

    if store.has(keys::FRAME_RATE) {
        params.frame_rate = store.read(keys::FRAME_RATE, params.frame_rate);
    }
    if store.has(keys::MTU_SIZE) {
        params.mtu_size = store.read(keys::MTU_SIZE, params.mtu_size);
    }

    if params.device_user_id.is_empty() {
        sink.emit(Diagnostic::OpeningFirstDevice);
    } else {
        sink.emit(Diagnostic::OpeningDevice {
            device_user_id: params.device_user_id.clone(),
        });
    }

    let raw_shutter: String = store.read(keys::SHUTTER_MODE, String::new());
    params.shutter_mode = ShutterMode::from_param(&raw_shutter);

    params
}

fn apply_deprecated_aliases<S: ParameterStore>(
    params: &mut CameraParameters,
    store: &S,
    sink: &dyn DiagnosticSink,
) {
    for alias in DEPRECATED_ALIASES {
        if !store.has(alias.key) {
            continue;
        }
        sink.emit(Diagnostic::DeprecatedKey {
            key: alias.key,
            replacement: alias.replacement,
            hint: alias.hint,
        });
        let slot = alias.target.slot(params);
        *slot = store.read(alias.key, *slot);
    }
}

/// Exposure, gain, gamma and brightness, plus the brightness conflict rule.
fn read_intensity<S: ParameterStore>(
    params: &mut CameraParameters,
    store: &S,
    sink: &dyn DiagnosticSink,
) {
    let exposure_given = store.has(keys::EXPOSURE) || store.has(keys::START_EXPOSURE);
    params.exposure.set_given(exposure_given);
    if exposure_given {
        let exposure = params.exposure.raw_mut();
        // Absent canonical key keeps what the deprecated alias wrote
        *exposure = store.read(keys::EXPOSURE, *exposure);
        debug!("[PARAMS] exposure is given and has value {}", exposure);
    }

    let gain_given = store.has(keys::GAIN) || store.has(keys::TARGET_GAIN);
    params.gain.set_given(gain_given);
    if gain_given {
        let gain = params.gain.raw_mut();
        *gain = store.read(keys::GAIN, *gain);
        debug!("[PARAMS] gain is given and has value {}", gain);
    }

    let gamma_given = store.has(keys::GAMMA);
    params.gamma.set_given(gamma_given);
    if gamma_given {
        let gamma = params.gamma.raw_mut();
        *gamma = store.read(keys::GAMMA, *gamma);
        debug!("[PARAMS] gamma is given and has value {}", gamma);
    }

    let brightness_given = store.has(keys::BRIGHTNESS);
    params.brightness.set_given(brightness_given);
    if !brightness_given {
        return;
    }
    let brightness = params.brightness.raw_mut();
    *brightness = store.read(keys::BRIGHTNESS, *brightness);
    debug!("[PARAMS] brightness is given and has value {}", brightness);

    if exposure_given && gain_given {
        sink.emit(Diagnostic::BrightnessConflict {
            brightness: params.brightness.raw(),
        });
        params.brightness.clear();
        return;
    }

    if store.has(keys::BRIGHTNESS_CONTINUOUS) {
        params.brightness_continuous =
            store.read(keys::BRIGHTNESS_CONTINUOUS, params.brightness_continuous);
    }
    if store.has(keys::EXPOSURE_AUTO) {
        params.exposure_auto = store.read(keys::EXPOSURE_AUTO, params.exposure_auto);
    }
    if store.has(keys::GAIN_AUTO) {
        params.gain_auto = store.read(keys::GAIN_AUTO, params.gain_auto);
    }
    debug!(
        "[PARAMS] brightness continuous: {}, exposure auto: {}, gain auto: {}",
        params.brightness_continuous, params.exposure_auto, params.gain_auto
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{DiagnosticLog, Severity};
    use crate::store::MemoryStore;
    use crate::value::ParameterValue;

    fn resolve_with(entries: &[(&str, ParameterValue)]) -> (CameraParameters, DiagnosticLog) {
        let store: MemoryStore = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let log = DiagnosticLog::new();
        let params = resolve(&store, &log);
        (params, log)
    }

    #[test]
    fn test_empty_store_yields_defaults() {
        let (params, log) = resolve_with(&[]);
        assert_eq!(params, CameraParameters::default());
        assert_eq!(log.entries(), vec![Diagnostic::OpeningFirstDevice]);
    }

    #[test]
    fn test_alias_table_order() {
        let keys: Vec<_> = DEPRECATED_ALIASES.iter().map(|a| a.key).collect();
        assert_eq!(keys, ["desired_framerate", "start_exposure", "target_gain"]);
    }

    #[test]
    fn test_deprecated_frame_rate_only() {
        let (params, log) = resolve_with(&[("desired_framerate", 20.0.into())]);
        assert_eq!(params.frame_rate(), 20.0);
        assert!(log.contains(|d| matches!(
            d,
            Diagnostic::DeprecatedKey { key: "desired_framerate", replacement: "frame_rate", .. }
        )));
    }

    #[test]
    fn test_canonical_frame_rate_beats_alias() {
        let (params, _) = resolve_with(&[
            ("desired_framerate", 20.0.into()),
            ("frame_rate", 30.0.into()),
        ]);
        assert_eq!(params.frame_rate(), 30.0);
    }

    #[test]
    fn test_deprecated_gain_marks_given() {
        let (params, log) = resolve_with(&[("target_gain", 0.3.into())]);
        assert_eq!(params.gain(), Some(0.3));
        assert_eq!(log.with_severity(Severity::Error).len(), 1);
    }

    #[test]
    fn test_gamma_given() {
        let (params, _) = resolve_with(&[("gamma", 1.8.into())]);
        assert_eq!(params.gamma(), Some(1.8));
        let (params, _) = resolve_with(&[]);
        assert_eq!(params.gamma(), None);
    }

    #[test]
    fn test_auto_modifiers_need_brightness() {
        let (params, _) = resolve_with(&[
            ("brightness_continuous", true.into()),
            ("exposure_auto", false.into()),
        ]);
        assert!(!params.brightness_continuous());
        assert!(params.exposure_auto());
    }

    #[test]
    fn test_auto_modifiers_with_brightness() {
        let (params, _) = resolve_with(&[
            ("brightness", 80i64.into()),
            ("gain", 0.2.into()),
            ("brightness_continuous", true.into()),
            ("exposure_auto", true.into()),
            ("gain_auto", false.into()),
        ]);
        assert_eq!(params.brightness(), Some(80.0));
        assert!(params.brightness_continuous());
        assert!(params.exposure_auto());
        assert!(!params.gain_auto());
    }

    #[test]
    fn test_conflict_skips_auto_modifiers() {
        let (params, log) = resolve_with(&[
            ("brightness", 120i64.into()),
            ("exposure", 2000i64.into()),
            ("gain", 0.9.into()),
            ("brightness_continuous", true.into()),
        ]);
        assert_eq!(params.brightness(), None);
        assert_eq!(params.brightness_setting().raw(), 120.0);
        assert!(!params.brightness_continuous());
        assert!(log.contains(|d| matches!(d, Diagnostic::BrightnessConflict { .. })));
    }

    #[test]
    fn test_device_and_mtu() {
        let (params, log) = resolve_with(&[
            ("device_user_id", "left".into()),
            ("gige/mtu_size", 1500i64.into()),
        ]);
        assert_eq!(params.device_user_id(), "left");
        assert_eq!(params.mtu_size(), 1500);
        assert!(log.contains(|d| *d
            == Diagnostic::OpeningDevice {
                device_user_id: "left".to_string()
            }));
    }

    #[test]
    fn test_out_of_range_values_are_not_checked_here() {
        let (params, _) = resolve_with(&[("binning", 9i64.into()), ("exposure", (-1.0).into())]);
        assert_eq!(params.binning(), 9);
        assert_eq!(params.exposure(), Some(-1.0));
    }
}
