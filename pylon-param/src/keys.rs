//! Names of the parameters read from the store.

pub const CAMERA_FRAME: &str = "camera_frame";
pub const DEVICE_USER_ID: &str = "device_user_id";
pub const BINNING: &str = "binning";

pub const EXPOSURE: &str = "exposure";
pub const GAIN: &str = "gain";
pub const GAMMA: &str = "gamma";
pub const BRIGHTNESS: &str = "brightness";
pub const BRIGHTNESS_CONTINUOUS: &str = "brightness_continuous";
pub const EXPOSURE_AUTO: &str = "exposure_auto";
pub const GAIN_AUTO: &str = "gain_auto";

pub const FRAME_RATE: &str = "frame_rate";
pub const MTU_SIZE: &str = "gige/mtu_size";
pub const SHUTTER_MODE: &str = "shutter_mode";

// Deprecated names, still honoured with an error diagnostic.
pub const DESIRED_FRAMERATE: &str = "desired_framerate";
pub const START_EXPOSURE: &str = "start_exposure";
pub const TARGET_GAIN: &str = "target_gain";
