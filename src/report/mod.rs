//! Platform/device walk and its output sinks

mod collect;
mod text;

pub use collect::{AttributeEntry, CollectSink, DeviceReport, PlatformReport, ProbeReport};
pub use text::TextSink;

use log::debug;

use crate::attributes::{Attribute, PLATFORM_ATTRIBUTES};
use crate::config::ProbeConfig;
use crate::driver::Driver;
use crate::enumerate::{device_ids, platform_ids};
use crate::error::ProbeResult;
use crate::query::{query_attribute, QueryOutcome};

/// Receiver of walk events, in output order
///
/// Indices are zero-based; counts are the list lengths.
pub trait ReportSink {
    /// Platforms were listed
    fn platform_count(&mut self, count: usize) -> ProbeResult<()>;

    /// Attributes that follow belong to this platform
    fn begin_platform(&mut self, index: usize, count: usize) -> ProbeResult<()>;

    /// Devices of the current platform were listed
    fn device_count(&mut self, count: usize) -> ProbeResult<()>;

    /// Attributes that follow belong to this device
    fn begin_device(&mut self, index: usize, count: usize) -> ProbeResult<()>;

    /// One attribute of the current platform or device
    fn attribute(&mut self, attribute: &Attribute, outcome: &QueryOutcome) -> ProbeResult<()>;

    /// The walk completed
    fn finish(&mut self) -> ProbeResult<()> {
        Ok(())
    }
}

/// Walk every platform and its devices, reporting into `sink`.
///
/// Stops at the first fatal error; whatever the sink received before that
/// point stays received.
pub fn walk<D, S>(driver: &D, config: &ProbeConfig, sink: &mut S) -> ProbeResult<()>
where
    D: Driver + ?Sized,
    S: ReportSink + ?Sized,
{
    let platforms = platform_ids(driver)?;
    sink.platform_count(platforms.len())?;

    for (index, &platform) in platforms.iter().enumerate() {
        debug!("reporting platform {}/{}", index + 1, platforms.len());
        sink.begin_platform(index, platforms.len())?;
        for attribute in PLATFORM_ATTRIBUTES {
            let outcome = query_attribute(driver, platform, attribute)?;
            sink.attribute(attribute, &outcome)?;
        }

        let devices = device_ids(driver, platform, config.device_type)?;
        sink.device_count(devices.len())?;
        for (device_index, &device) in devices.iter().enumerate() {
            sink.begin_device(device_index, devices.len())?;
            for attribute in config.device_attributes() {
                let outcome = query_attribute(driver, device, attribute)?;
                sink.attribute(attribute, &outcome)?;
            }
        }
    }

    sink.finish()
}
