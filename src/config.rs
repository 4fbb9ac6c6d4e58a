//! Probe configuration

use std::path::PathBuf;

use crate::attributes::{Attribute, DEVICE_ATTRIBUTES, DEVICE_EXTENDED_ATTRIBUTES};
use crate::driver::DeviceType;

/// How much to report per device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detail {
    /// Name, vendor and type
    #[default]
    Basic,
    /// Basic plus versions, compute units, clock, memory and availability
    Extended,
}

/// Probe configuration
#[derive(Debug, Clone, Default)]
pub struct ProbeConfig {
    /// Device types to enumerate on each platform
    pub device_type: DeviceType,
    /// Device attribute set
    pub detail: Detail,
    /// Explicit ICD loader library; searched for when `None`
    pub library_path: Option<PathBuf>,
}

impl ProbeConfig {
    /// Options for a full per-device report
    pub fn detailed() -> Self {
        Self {
            detail: Detail::Extended,
            ..Self::default()
        }
    }

    /// Restrict device enumeration to `device_type`
    pub fn with_device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    /// Load the driver from `path` instead of searching
    pub fn with_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    /// Attributes to query for each device
    pub fn device_attributes(&self) -> &'static [Attribute] {
        match self.detail {
            Detail::Basic => DEVICE_ATTRIBUTES,
            Detail::Extended => DEVICE_EXTENDED_ATTRIBUTES,
        }
    }

    /// Bind to the OpenCL driver this configuration points at
    #[cfg(feature = "loader")]
    pub fn bind(&self) -> crate::ProbeResult<crate::loader::OpenClLibrary> {
        crate::loader::OpenClLibrary::open(self.library_path.as_deref())
    }
}
