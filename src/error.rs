//! Error types for the clprobe library

use std::io;
use std::panic::Location;
use thiserror::Error;

use crate::ffi;

/// Main error type for clprobe operations
///
/// Every variant is fatal to a probe run: the walk unwinds on the first
/// one and nothing further is reported. Soft size mismatches on scalar
/// attributes are not errors, see [`crate::query::QueryOutcome`].
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The OpenCL ICD loader or one of its entry points could not be bound
    #[error("Can't init OpenCL driver!")]
    DriverInit,

    /// A driver call returned a non-success status
    #[error("OpenCL error code {code} encountered at {file}:{line}")]
    Cl {
        /// Raw `cl_int` status
        code: i32,
        /// Name of the failing entry point
        call: &'static str,
        /// Source file of the call site
        file: &'static str,
        /// Source line of the call site
        line: u32,
    },

    /// The fill call reported a different entry count than the probe call
    #[error("{call} reported {probed} entries, then {returned} when filling the list")]
    CountMismatch {
        /// Name of the enumeration entry point
        call: &'static str,
        /// Count from the size probe
        probed: u32,
        /// Count from the fill call
        returned: u32,
    },

    /// The value call reported a different byte length than the size probe
    #[error("{call} reported {probed} bytes for {title}, then {returned} when reading the value")]
    ValueSizeMismatch {
        /// Name of the info entry point
        call: &'static str,
        /// Attribute title
        title: &'static str,
        /// Length from the size probe
        probed: usize,
        /// Length from the value call
        returned: usize,
    },

    /// Writing the report failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Build a status error pointing at the caller's source location.
    #[track_caller]
    pub fn cl(code: i32, call: &'static str) -> Self {
        let location = Location::caller();
        ProbeError::Cl {
            code,
            call,
            file: location.file(),
            line: location.line(),
        }
    }

    /// Raw status code, if this error came from a driver call
    pub fn status_code(&self) -> Option<i32> {
        match self {
            ProbeError::Cl { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Symbolic name of the driver status, e.g. `CL_INVALID_VALUE`
    pub fn status_name(&self) -> Option<&'static str> {
        self.status_code().map(ffi::status_name)
    }
}

/// Check the status of a driver call, recording where it was made.
///
/// This is the single choke point for converting raw statuses into
/// [`ProbeError::Cl`]; the file and line are those of the caller.
#[track_caller]
pub(crate) fn check<T>(result: Result<T, i32>, call: &'static str) -> ProbeResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(code) => {
            let err = ProbeError::cl(code, call);
            log::debug!("{} failed with {} ({})", call, code, ffi::status_name(code));
            Err(err)
        }
    }
}

/// Result type for clprobe operations
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_init_message() {
        assert_eq!(ProbeError::DriverInit.to_string(), "Can't init OpenCL driver!");
    }

    #[test]
    fn test_check_records_call_site() {
        let line = line!() + 1;
        let err = check::<()>(Err(-30), "clGetDeviceInfo").unwrap_err();
        match &err {
            ProbeError::Cl { code, call, file, line: at } => {
                assert_eq!(*code, -30);
                assert_eq!(*call, "clGetDeviceInfo");
                assert!(file.ends_with("error.rs"));
                assert_eq!(*at, line);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("OpenCL error code -30 encountered at "));
        assert_eq!(err.status_name(), Some("CL_INVALID_VALUE"));
    }

    #[test]
    fn test_check_passes_values_through() {
        assert_eq!(check(Ok(7usize), "clGetPlatformInfo").unwrap(), 7);
    }
}
