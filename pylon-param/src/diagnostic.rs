//! Diagnostics raised while resolving and validating camera parameters.
//!
//! None of these are fatal. Every condition is corrected locally and
//! reported through a [`DiagnosticSink`].

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A condition noticed while resolving parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A renamed parameter is still in use. Its value is applied anyway.
    DeprecatedKey {
        key: &'static str,
        replacement: &'static str,
        hint: &'static str,
    },
    /// Exposure and gain are both fixed, so no brightness target can be
    /// reached. The brightness request is dropped.
    BrightnessConflict { brightness: f64 },
    /// Binning outside `[1, 4]`, reset to 1.
    BinningOutOfRange { binning: i64 },
    /// Exposure outside `(0, 1e7]` µs, no longer treated as given.
    ExposureOutOfRange { exposure: f64 },
    /// Gain outside `[0, 1]`, no longer treated as given.
    GainOutOfRange { gain: f64 },
    /// Brightness outside `[0, 255]`, no longer treated as given.
    BrightnessOutOfRange { brightness: f64 },
    /// Negative frame rate other than -1, reset to 5 Hz and written back.
    FrameRateOutOfRange { frame_rate: f64, reset_to: f64 },
    /// A specific device will be opened.
    OpeningDevice { device_user_id: String },
    /// No device user id configured, the first device found will be opened.
    OpeningFirstDevice,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DeprecatedKey { .. } | Self::BrightnessConflict { .. } => Severity::Error,
            Self::BinningOutOfRange { .. }
            | Self::ExposureOutOfRange { .. }
            | Self::GainOutOfRange { .. }
            | Self::BrightnessOutOfRange { .. }
            | Self::FrameRateOutOfRange { .. } => Severity::Warning,
            Self::OpeningDevice { .. } | Self::OpeningFirstDevice => Severity::Info,
        }
    }

    /// Short machine-readable identifier.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DeprecatedKey { .. } => "deprecated_key",
            Self::BrightnessConflict { .. } => "brightness_conflict",
            Self::BinningOutOfRange { .. } => "binning_out_of_range",
            Self::ExposureOutOfRange { .. } => "exposure_out_of_range",
            Self::GainOutOfRange { .. } => "gain_out_of_range",
            Self::BrightnessOutOfRange { .. } => "brightness_out_of_range",
            Self::FrameRateOutOfRange { .. } => "frame_rate_out_of_range",
            Self::OpeningDevice { .. } => "opening_device",
            Self::OpeningFirstDevice => "opening_first_device",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeprecatedKey {
                key,
                replacement,
                hint,
            } => {
                write!(
                    f,
                    "Using parameter '{}' is deprecated! Please rename it to '{}'",
                    key, replacement
                )?;
                if !hint.is_empty() {
                    write!(f, " ({})", hint)?;
                }
                Ok(())
            }
            Self::BrightnessConflict { brightness } => write!(
                f,
                "Gain ('gain') and exposure time ('exposure') are both given and hence \
                 assumed to be fixed! The desired brightness ({}) can't be reached. \
                 Ignoring brightness and only setting gain and exposure",
                brightness
            ),
            Self::BinningOutOfRange { binning } => write!(
                f,
                "Unsupported binning {}, valid values are [1, 2, 3, 4]! Resetting it to 1",
                binning
            ),
            Self::ExposureOutOfRange { exposure } => write!(
                f,
                "Exposure time {} µs not in valid range (0, 1e7]! Falling back to the \
                 camera default",
                exposure
            ),
            Self::GainOutOfRange { gain } => write!(
                f,
                "Gain {} not in valid range [0, 1]! Falling back to the camera default",
                gain
            ),
            Self::BrightnessOutOfRange { brightness } => write!(
                f,
                "Brightness {} not in valid range [0, 255]! Falling back to the camera \
                 default",
                brightness
            ),
            Self::FrameRateOutOfRange {
                frame_rate,
                reset_to,
            } => write!(
                f,
                "Unexpected frame rate ({}). Resetting it to {} Hz",
                frame_rate, reset_to
            ),
            Self::OpeningDevice { device_user_id } => {
                write!(f, "Trying to open the following camera: {}", device_user_id)
            }
            Self::OpeningFirstDevice => {
                write!(f, "No device user id set, will open the first camera device found")
            }
        }
    }
}

/// Receiver for [`Diagnostic`]s.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

/// Forwards diagnostics to `tracing` at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let code = diagnostic.code();
        match diagnostic.severity() {
            Severity::Info => tracing::info!(code, "{}", diagnostic),
            Severity::Warning => tracing::warn!(code, "{}", diagnostic),
            Severity::Error => tracing::error!(code, "{}", diagnostic),
        }
    }
}

/// Keeps every diagnostic it receives, optionally forwarding them on.
#[derive(Default)]
pub struct DiagnosticLog {
    entries: Mutex<Vec<Diagnostic>>,
    forward: Option<Box<dyn DiagnosticSink + Send + Sync>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and also pass each diagnostic to `sink`.
    pub fn forwarding_to(sink: impl DiagnosticSink + Send + Sync + 'static) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            forward: Some(Box::new(sink)),
        }
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    pub fn with_severity(&self, severity: Severity) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .iter()
            .filter(|d| d.severity() == severity)
            .cloned()
            .collect()
    }

    pub fn contains(&self, predicate: impl Fn(&Diagnostic) -> bool) -> bool {
        self.entries.lock().iter().any(predicate)
    }

    /// Highest severity seen so far.
    pub fn max_severity(&self) -> Option<Severity> {
        self.entries.lock().iter().map(Diagnostic::severity).max()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn emit(&self, diagnostic: Diagnostic) {
        if let Some(forward) = &self.forward {
            forward.emit(diagnostic.clone());
        }
        self.entries.lock().push(diagnostic);
    }
}

impl fmt::Debug for DiagnosticLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticLog")
            .field("entries", &*self.entries.lock())
            .field("forwarding", &self.forward.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(
            Diagnostic::BrightnessConflict { brightness: 120.0 }.severity(),
            Severity::Error
        );
        assert_eq!(
            Diagnostic::GainOutOfRange { gain: 1.5 }.severity(),
            Severity::Warning
        );
        assert_eq!(Diagnostic::OpeningFirstDevice.severity(), Severity::Info);
    }

    #[test]
    fn test_deprecated_message_names_both_keys() {
        let msg = Diagnostic::DeprecatedKey {
            key: "target_gain",
            replacement: "gain",
            hint: "",
        }
        .to_string();
        assert!(msg.contains("'target_gain'"));
        assert!(msg.contains("'gain'"));
    }

    #[test]
    fn test_log_records_and_forwards() {
        let inner = Arc::new(DiagnosticLog::new());
        let log = DiagnosticLog::forwarding_to(inner.clone());
        log.emit(Diagnostic::OpeningFirstDevice);
        log.emit(Diagnostic::BinningOutOfRange { binning: 7 });

        assert_eq!(log.len(), 2);
        assert_eq!(inner.len(), 2);
        assert_eq!(log.max_severity(), Some(Severity::Warning));
        assert_eq!(log.with_severity(Severity::Info).len(), 1);

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.max_severity(), None);
    }
}
