//! # clprobe - OpenCL platform and device inspection
//!
//! A small Rust library for listing the OpenCL platforms and devices a
//! system exposes, binding to the ICD loader at runtime.
//!
//! ## Features
//!
//! - **Runtime binding** to `libOpenCL` / `OpenCL.dll`, no link-time dependency
//! - **Two-phase queries**: every list and attribute is sized first, then read
//! - **Soft scalar checks**: an attribute of unexpected width is reported, not fatal
//! - **Text or JSON** reports through pluggable sinks
//! - **Mockable driver** seam for testing without a GPU
//!
//! ## Quick Start
//!
//! ```no_run
//! use clprobe::{OpenClLibrary, ProbeConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let driver = OpenClLibrary::load()?;
//!     let report = clprobe::collect(&driver, &ProbeConfig::default())?;
//!     println!("{} device(s)", report.device_count());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

#[allow(missing_docs)]
pub mod attributes;
pub mod config;
pub mod driver;
pub mod enumerate;
pub mod error;
#[allow(missing_docs)]
pub mod ffi;
#[cfg(feature = "loader")]
pub mod loader;
pub mod query;
pub mod report;

use std::io::Write;

// Re-export main API for easy access
pub use attributes::Attribute;
pub use config::{Detail, ProbeConfig};
pub use driver::{DeviceId, DeviceType, Driver, PlatformId};
pub use error::{ProbeError, ProbeResult};
#[cfg(feature = "loader")]
pub use loader::OpenClLibrary;
pub use query::{query_attribute, AttributeValue, QueryOutcome, Shape};
pub use report::{walk, CollectSink, ProbeReport, ReportSink, TextSink};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print the text report for an already attempted driver binding.
///
/// `binding` is the outcome of driver initialization; a failed binding is
/// reported exactly like any other fatal error.
pub fn run<D, W>(binding: ProbeResult<D>, config: &ProbeConfig, out: &mut W) -> ProbeResult<()>
where
    D: Driver,
    W: Write,
{
    let driver = binding?;
    let mut sink = TextSink::new(&mut *out);
    walk(&driver, config, &mut sink)
}

/// Like [`run`], but a fatal error is also printed as `Exception <details>`.
///
/// The error is still returned so the caller can pick an exit status.
///
/// # Example
///
/// ```no_run
/// use clprobe::{OpenClLibrary, ProbeConfig};
///
/// let config = ProbeConfig::default();
/// let mut stdout = std::io::stdout();
/// let _ = clprobe::run_and_report(OpenClLibrary::load(), &config, &mut stdout);
/// ```
pub fn run_and_report<D, W>(
    binding: ProbeResult<D>,
    config: &ProbeConfig,
    out: &mut W,
) -> ProbeResult<()>
where
    D: Driver,
    W: Write,
{
    let err = match run(binding, config, &mut *out) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };

    if let Some(name) = err.status_name() {
        log::error!("probe aborted with {}", name);
    }
    if let Err(write_err) = writeln!(out, "Exception {}", err).and_then(|_| out.flush()) {
        log::error!("failed to print error report: {}", write_err);
    }
    Err(err)
}

/// Walk the driver and return a structured report
pub fn collect<D: Driver + ?Sized>(driver: &D, config: &ProbeConfig) -> ProbeResult<ProbeReport> {
    let mut sink = CollectSink::new();
    walk(driver, config, &mut sink)?;
    Ok(sink.into_report())
}

/// Names of every platform, in enumeration order
pub fn platform_names<D: Driver + ?Sized>(driver: &D) -> ProbeResult<Vec<String>> {
    enumerate::platform_ids(driver)?
        .into_iter()
        .map(|platform| -> ProbeResult<String> {
            match query_attribute(driver, platform, &attributes::PLATFORM_NAME)? {
                QueryOutcome::Value { value } => Ok(value.to_string()),
                QueryOutcome::SizeMismatch { .. } => Ok(String::new()),
            }
        })
        .collect()
}

/// Get library information
pub fn version() -> &'static str {
    VERSION
}
