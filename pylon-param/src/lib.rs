//! Startup parameters for a pylon camera node.
//!
//! A flat key/value store is turned into a checked [`CameraParameters`] in
//! two steps:
//!
//! ```text
//!  ParameterStore ──resolve──▶ CameraParameters ──validate──▶ CameraParameters
//!        ▲                                             │
//!        └───────────── frame_rate write-back ─────────┘
//! ```
//!
//! Neither step fails. Problems are corrected on the spot and reported to a
//! [`DiagnosticSink`].
//!
//! ```
//! use pylon_param::{CameraParameters, DiagnosticLog, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.insert("exposure", 2000.0);
//! store.insert("shutter_mode", "global");
//!
//! let log = DiagnosticLog::new();
//! let params = CameraParameters::read_from_store(&store, &log);
//! assert_eq!(params.exposure(), Some(2000.0));
//! assert_eq!(params.shutter_mode_string(), "global");
//! ```

pub mod args;
pub mod diagnostic;
pub mod error;
pub mod keys;
pub mod params;
pub mod resolve;
pub mod shutter;
pub mod store;
pub mod validate;
pub mod value;
pub mod yaml;

pub use diagnostic::{Diagnostic, DiagnosticLog, DiagnosticSink, Severity, TracingSink};
pub use error::{Error, Result};
pub use params::{CameraParameters, Tunable};
pub use shutter::ShutterMode;
pub use store::{MemoryStore, ParameterStore};
pub use value::{FromParameterValue, ParameterType, ParameterValue};
