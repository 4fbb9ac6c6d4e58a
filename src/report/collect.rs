//! Structured report for JSON export

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::attributes::Attribute;
use crate::error::ProbeResult;
use crate::query::QueryOutcome;
use crate::report::ReportSink;

/// Everything one probe run found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// When the probe ran
    pub generated_at: DateTime<Utc>,
    /// clprobe version that produced the report
    pub clprobe_version: String,
    /// Platforms in enumeration order
    pub platforms: Vec<PlatformReport>,
}

/// One platform and its devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformReport {
    /// Zero-based enumeration index
    pub index: usize,
    /// Platform attributes in query order
    pub attributes: Vec<AttributeEntry>,
    /// Devices in enumeration order
    pub devices: Vec<DeviceReport>,
}

/// One device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceReport {
    /// Zero-based enumeration index within the platform
    pub index: usize,
    /// Device attributes in query order
    pub attributes: Vec<AttributeEntry>,
}

/// A queried attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEntry {
    /// Attribute title, e.g. `CL_DEVICE_NAME`
    pub title: String,
    /// Query result
    pub outcome: QueryOutcome,
}

impl ProbeReport {
    /// Empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            clprobe_version: crate::VERSION.to_string(),
            platforms: Vec::new(),
        }
    }

    /// Total number of devices across all platforms
    pub fn device_count(&self) -> usize {
        self.platforms.iter().map(|p| p.devices.len()).sum()
    }

    /// Look up an attribute value of a platform by title
    pub fn platform_attribute(&self, index: usize, title: &str) -> Option<&QueryOutcome> {
        self.platforms
            .get(index)
            .and_then(|p| find(&p.attributes, title))
    }

    /// Export the report to a JSON file
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> ProbeResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Pretty JSON text of the report
    pub fn to_json(&self) -> ProbeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for ProbeReport {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceReport {
    /// Look up an attribute value by title
    pub fn attribute(&self, title: &str) -> Option<&QueryOutcome> {
        find(&self.attributes, title)
    }
}

fn find<'a>(entries: &'a [AttributeEntry], title: &str) -> Option<&'a QueryOutcome> {
    entries.iter().find(|e| e.title == title).map(|e| &e.outcome)
}

/// Builds a [`ProbeReport`] from walk events
#[derive(Debug, Default)]
pub struct CollectSink {
    report: ProbeReport,
    in_devices: bool,
}

impl CollectSink {
    /// Empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// The report collected so far
    pub fn into_report(self) -> ProbeReport {
        self.report
    }

    fn current_platform(&mut self) -> Option<&mut PlatformReport> {
        self.report.platforms.last_mut()
    }
}

impl ReportSink for CollectSink {
    fn platform_count(&mut self, count: usize) -> ProbeResult<()> {
        self.report.platforms.reserve(count);
        Ok(())
    }

    fn begin_platform(&mut self, index: usize, _count: usize) -> ProbeResult<()> {
        self.report.platforms.push(PlatformReport {
            index,
            attributes: Vec::new(),
            devices: Vec::new(),
        });
        self.in_devices = false;
        Ok(())
    }

    fn device_count(&mut self, count: usize) -> ProbeResult<()> {
        if let Some(platform) = self.current_platform() {
            platform.devices.reserve(count);
        }
        Ok(())
    }

    fn begin_device(&mut self, index: usize, _count: usize) -> ProbeResult<()> {
        if let Some(platform) = self.current_platform() {
            platform.devices.push(DeviceReport {
                index,
                attributes: Vec::new(),
            });
        }
        self.in_devices = true;
        Ok(())
    }

    fn attribute(&mut self, attribute: &Attribute, outcome: &QueryOutcome) -> ProbeResult<()> {
        let entry = AttributeEntry {
            title: attribute.title.to_string(),
            outcome: outcome.clone(),
        };
        let in_devices = self.in_devices;
        let Some(platform) = self.current_platform() else {
            return Ok(());
        };
        match platform.devices.last_mut() {
            Some(device) if in_devices => device.attributes.push(entry),
            _ => platform.attributes.push(entry),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{DEVICE_NAME, DEVICE_TYPE, PLATFORM_NAME};
    use crate::driver::DeviceType;
    use crate::query::AttributeValue;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> QueryOutcome {
        QueryOutcome::Value { value: AttributeValue::Text(s.to_string()) }
    }

    fn sample() -> ProbeReport {
        let mut sink = CollectSink::new();
        sink.platform_count(1).unwrap();
        sink.begin_platform(0, 1).unwrap();
        sink.attribute(&PLATFORM_NAME, &text("Plt")).unwrap();
        sink.device_count(1).unwrap();
        sink.begin_device(0, 1).unwrap();
        sink.attribute(&DEVICE_NAME, &text("TestGPU")).unwrap();
        sink.attribute(
            &DEVICE_TYPE,
            &QueryOutcome::Value { value: AttributeValue::DeviceType(DeviceType::GPU) },
        )
        .unwrap();
        sink.into_report()
    }

    #[test]
    fn test_attributes_land_on_current_handle() {
        let report = sample();
        assert_eq!(report.platforms.len(), 1);
        assert_eq!(report.device_count(), 1);
        assert_eq!(report.platform_attribute(0, "CL_PLATFORM_NAME"), Some(&text("Plt")));
        let device = &report.platforms[0].devices[0];
        assert_eq!(device.attribute("CL_DEVICE_NAME"), Some(&text("TestGPU")));
        assert!(device.attribute("CL_PLATFORM_NAME").is_none());
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        let device = &json["platforms"][0]["devices"][0]["attributes"];
        assert_eq!(device[0]["title"], "CL_DEVICE_NAME");
        assert_eq!(device[0]["outcome"]["status"], "value");
        assert_eq!(device[0]["outcome"]["value"]["kind"], "text");
        assert_eq!(device[0]["outcome"]["value"]["value"], "TestGPU");
        assert_eq!(device[1]["outcome"]["value"]["value"], 4);
    }

    #[test]
    fn test_export_json_round_trip() {
        let report = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.export_json(&path).unwrap();

        let loaded: ProbeReport =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(loaded, report);
    }
}
