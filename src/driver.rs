//! Safe seam over the OpenCL query entry points
//!
//! [`Driver`] mirrors the four C calls one-to-one, keeping their
//! two-call shape: an empty destination slice stands for "null pointer,
//! capacity zero". Errors are raw `cl_int` statuses; turning them into
//! [`crate::ProbeError`] happens at the call sites so the error can point
//! at the query that failed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ffi;

/// Opaque platform handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlatformId(usize);

/// Opaque device handle, always obtained through a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceId(usize);

impl PlatformId {
    /// Wrap a raw handle value
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw handle value
    pub const fn as_raw(self) -> usize {
        self.0
    }

    pub(crate) fn as_ptr(self) -> ffi::cl_platform_id {
        self.0 as ffi::cl_platform_id
    }
}

impl DeviceId {
    /// Wrap a raw handle value
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Raw handle value
    pub const fn as_raw(self) -> usize {
        self.0
    }

    pub(crate) fn as_ptr(self) -> ffi::cl_device_id {
        self.0 as ffi::cl_device_id
    }
}

/// `cl_device_type` bitfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceType(u64);

impl DeviceType {
    /// The platform's default device
    pub const DEFAULT: DeviceType = DeviceType(ffi::CL_DEVICE_TYPE_DEFAULT);
    /// Host processor
    pub const CPU: DeviceType = DeviceType(ffi::CL_DEVICE_TYPE_CPU);
    /// Graphics processor
    pub const GPU: DeviceType = DeviceType(ffi::CL_DEVICE_TYPE_GPU);
    /// Dedicated accelerator
    pub const ACCELERATOR: DeviceType = DeviceType(ffi::CL_DEVICE_TYPE_ACCELERATOR);
    /// Device without OpenCL C support
    pub const CUSTOM: DeviceType = DeviceType(ffi::CL_DEVICE_TYPE_CUSTOM);
    /// Every device type
    pub const ALL: DeviceType = DeviceType(ffi::CL_DEVICE_TYPE_ALL);

    const NAMED: [(DeviceType, &'static str); 5] = [
        (DeviceType::CPU, "CPU"),
        (DeviceType::GPU, "GPU"),
        (DeviceType::ACCELERATOR, "ACCELERATOR"),
        (DeviceType::CUSTOM, "CUSTOM"),
        (DeviceType::DEFAULT, "DEFAULT"),
    ];

    /// Wrap raw `cl_device_type` bits
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw `cl_device_type` bits
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Bits set in either `self` or `other`
    pub const fn union(self, other: DeviceType) -> Self {
        Self(self.0 | other.0)
    }

    /// True when every bit of `other` is set in `self`
    pub const fn contains(self, other: DeviceType) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::ALL
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == DeviceType::ALL {
            return write!(f, "ALL");
        }

        let mut rest = self.0;
        let mut first = true;
        for (flag, name) in DeviceType::NAMED {
            if self.contains(flag) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{}", name)?;
                rest &= !flag.0;
                first = false;
            }
        }

        if rest != 0 || first {
            if !first {
                write!(f, " | ")?;
            }
            write!(f, "0x{:x}", rest)?;
        }
        Ok(())
    }
}

/// The OpenCL query entry points
///
/// Count calls return the number of entries the driver has; info calls
/// return the byte size of the attribute value. An empty destination asks
/// for the size only.
#[cfg_attr(test, mockall::automock)]
pub trait Driver {
    /// `clGetPlatformIDs`
    fn platform_ids(&self, out: &mut [PlatformId]) -> Result<u32, i32>;

    /// `clGetPlatformInfo`
    fn platform_info(&self, platform: PlatformId, param: u32, out: &mut [u8]) -> Result<usize, i32>;

    /// `clGetDeviceIDs`
    fn device_ids(
        &self,
        platform: PlatformId,
        device_type: DeviceType,
        out: &mut [DeviceId],
    ) -> Result<u32, i32>;

    /// `clGetDeviceInfo`
    fn device_info(&self, device: DeviceId, param: u32, out: &mut [u8]) -> Result<usize, i32>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DeviceType::GPU, "GPU")]
    #[case(DeviceType::ALL, "ALL")]
    #[case(DeviceType::CPU.union(DeviceType::DEFAULT), "CPU | DEFAULT")]
    #[case(DeviceType::from_bits(0x40), "0x40")]
    #[case(DeviceType::from_bits(0x44), "GPU | 0x40")]
    #[case(DeviceType::from_bits(0), "0x0")]
    fn test_device_type_display(#[case] ty: DeviceType, #[case] expected: &str) {
        assert_eq!(ty.to_string(), expected);
    }

    #[test]
    fn test_device_type_default_is_all() {
        assert_eq!(DeviceType::default(), DeviceType::ALL);
        assert!(DeviceType::ALL.contains(DeviceType::ACCELERATOR));
    }

    #[test]
    fn test_handles_round_trip_raw() {
        assert_eq!(PlatformId::from_raw(0x10).as_raw(), 0x10);
        assert_eq!(DeviceId::from_raw(0x20).as_raw(), 0x20);
    }
}
