//! The resolved camera parameter set.

use serde::Serialize;
use tracing::debug;

use crate::diagnostic::DiagnosticSink;
use crate::keys;
use crate::resolve::resolve;
use crate::shutter::ShutterMode;
use crate::store::ParameterStore;
use crate::validate::validate;

/// An image-intensity setting that may or may not have been requested.
///
/// The last value read is kept even after the request is withdrawn, but
/// consumers only ever see it through [`Tunable::get`], which yields `None`
/// unless the value is still requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tunable<T> {
    value: T,
    given: bool,
}

impl<T: Copy> Tunable<T> {
    /// Not requested, holding `default` as its raw value.
    pub const fn unset(default: T) -> Self {
        Self {
            value: default,
            given: false,
        }
    }

    /// The requested value, if any.
    pub fn get(&self) -> Option<T> {
        self.given.then_some(self.value)
    }

    pub fn is_given(&self) -> bool {
        self.given
    }

    /// Last value read, whether or not it is still requested.
    pub fn raw(&self) -> T {
        self.value
    }

    pub(crate) fn raw_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub(crate) fn set_given(&mut self, given: bool) {
        self.given = given;
    }

    /// Withdraw the request, keeping the raw value.
    pub(crate) fn clear(&mut self) {
        self.given = false;
    }
}

pub const DEFAULT_CAMERA_FRAME: &str = "pylon_camera";
pub const DEFAULT_BINNING: i64 = 1;
pub const DEFAULT_EXPOSURE: f64 = 10000.0;
pub const DEFAULT_GAIN: f64 = 0.5;
pub const DEFAULT_GAMMA: f64 = 1.0;
pub const DEFAULT_BRIGHTNESS: f64 = 100.0;
pub const DEFAULT_FRAME_RATE: f64 = 5.0;
pub const DEFAULT_MTU_SIZE: i64 = 3000;

/// Frame rate meaning "acquire as fast as the hardware allows".
pub const FREE_RUN_FRAME_RATE: f64 = -1.0;

/// Startup parameters of a pylon camera node.
///
/// Built once by [`CameraParameters::read_from_store`]; afterwards only the
/// frame rate changes, through [`CameraParameters::set_frame_rate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraParameters {
    pub(crate) camera_frame: String,
    /// Empty means "open the first device found".
    pub(crate) device_user_id: String,
    pub(crate) binning: i64,

    /// Exposure time in microseconds.
    pub(crate) exposure: Tunable<f64>,
    /// Gain as a ratio of the camera's gain range.
    pub(crate) gain: Tunable<f64>,
    pub(crate) gamma: Tunable<f64>,
    /// Target mean intensity, 0 to 255.
    pub(crate) brightness: Tunable<f64>,
    pub(crate) brightness_continuous: bool,
    pub(crate) exposure_auto: bool,
    pub(crate) gain_auto: bool,

    /// Hz, or [`FREE_RUN_FRAME_RATE`].
    pub(crate) frame_rate: f64,
    pub(crate) mtu_size: i64,
    pub(crate) shutter_mode: ShutterMode,
}

impl Default for CameraParameters {
    fn default() -> Self {
        Self {
            camera_frame: DEFAULT_CAMERA_FRAME.to_string(),
            device_user_id: String::new(),
            binning: DEFAULT_BINNING,
            exposure: Tunable::unset(DEFAULT_EXPOSURE),
            gain: Tunable::unset(DEFAULT_GAIN),
            gamma: Tunable::unset(DEFAULT_GAMMA),
            brightness: Tunable::unset(DEFAULT_BRIGHTNESS),
            brightness_continuous: false,
            exposure_auto: true,
            gain_auto: true,
            frame_rate: DEFAULT_FRAME_RATE,
            mtu_size: DEFAULT_MTU_SIZE,
            shutter_mode: ShutterMode::Default,
        }
    }
}

impl CameraParameters {
    /// Resolve the parameter set from `store` and validate it.
    ///
    /// Validation may write a corrected frame rate back to `store`.
    pub fn read_from_store<S: ParameterStore>(store: &S, sink: &dyn DiagnosticSink) -> Self {
        let mut params = resolve(store, sink);
        validate(&mut params, store, sink);
        params
    }

    pub fn camera_frame(&self) -> &str {
        &self.camera_frame
    }

    pub fn device_user_id(&self) -> &str {
        &self.device_user_id
    }

    pub fn binning(&self) -> i64 {
        self.binning
    }

    pub fn exposure(&self) -> Option<f64> {
        self.exposure.get()
    }

    pub fn gain(&self) -> Option<f64> {
        self.gain.get()
    }

    pub fn gamma(&self) -> Option<f64> {
        self.gamma.get()
    }

    pub fn brightness(&self) -> Option<f64> {
        self.brightness.get()
    }

    /// Full view of the exposure setting, including the raw value.
    pub fn exposure_setting(&self) -> Tunable<f64> {
        self.exposure
    }

    pub fn gain_setting(&self) -> Tunable<f64> {
        self.gain
    }

    pub fn gamma_setting(&self) -> Tunable<f64> {
        self.gamma
    }

    pub fn brightness_setting(&self) -> Tunable<f64> {
        self.brightness
    }

    /// Keep adjusting towards the brightness target while grabbing, rather
    /// than only once at startup.
    pub fn brightness_continuous(&self) -> bool {
        self.brightness_continuous
    }

    /// Exposure may be varied to reach the brightness target.
    pub fn exposure_auto(&self) -> bool {
        self.exposure_auto
    }

    /// Gain may be varied to reach the brightness target.
    pub fn gain_auto(&self) -> bool {
        self.gain_auto
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn is_free_run(&self) -> bool {
        self.frame_rate == FREE_RUN_FRAME_RATE
    }

    pub fn mtu_size(&self) -> i64 {
        self.mtu_size
    }

    pub fn shutter_mode(&self) -> ShutterMode {
        self.shutter_mode
    }

    pub fn shutter_mode_string(&self) -> &'static str {
        self.shutter_mode.as_param()
    }

    /// Change the frame rate and write it back to `store`.
    pub fn set_frame_rate<S: ParameterStore>(&mut self, store: &S, frame_rate: f64) {
        debug!("[PARAMS] frame rate {} -> {}", self.frame_rate, frame_rate);
        self.frame_rate = frame_rate;
        store.write(keys::FRAME_RATE, frame_rate);
    }
}
