//! Catalog of the platform and device attributes clprobe reports

use crate::ffi;
use crate::query::{ScalarKind, Shape};

/// One queryable attribute: its `cl_*_info` id, display title and shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    /// `cl_platform_info` / `cl_device_info` value
    pub id: u32,
    /// Title printed in front of the value
    pub title: &'static str,
    /// Expected representation of the value
    pub shape: Shape,
}

impl Attribute {
    /// Text attribute
    pub const fn text(id: u32, title: &'static str) -> Self {
        Self { id, title, shape: Shape::Text }
    }

    /// Fixed-width scalar attribute
    pub const fn scalar(id: u32, title: &'static str, kind: ScalarKind) -> Self {
        Self { id, title, shape: Shape::Scalar(kind) }
    }
}

pub const PLATFORM_NAME: Attribute = Attribute::text(ffi::CL_PLATFORM_NAME, "CL_PLATFORM_NAME");
pub const PLATFORM_VENDOR: Attribute =
    Attribute::text(ffi::CL_PLATFORM_VENDOR, "CL_PLATFORM_VENDOR");
pub const PLATFORM_VERSION: Attribute =
    Attribute::text(ffi::CL_PLATFORM_VERSION, "CL_PLATFORM_VERSION");
pub const PLATFORM_PROFILE: Attribute =
    Attribute::text(ffi::CL_PLATFORM_PROFILE, "CL_PLATFORM_PROFILE");
pub const PLATFORM_EXTENSIONS: Attribute =
    Attribute::text(ffi::CL_PLATFORM_EXTENSIONS, "CL_PLATFORM_EXTENSIONS");

pub const DEVICE_NAME: Attribute = Attribute::text(ffi::CL_DEVICE_NAME, "CL_DEVICE_NAME");
pub const DEVICE_VENDOR: Attribute = Attribute::text(ffi::CL_DEVICE_VENDOR, "CL_DEVICE_VENDOR");
pub const DEVICE_TYPE: Attribute =
    Attribute::scalar(ffi::CL_DEVICE_TYPE, "CL_DEVICE_TYPE", ScalarKind::DeviceType);
pub const DEVICE_VERSION: Attribute =
    Attribute::text(ffi::CL_DEVICE_VERSION, "CL_DEVICE_VERSION");
pub const DRIVER_VERSION: Attribute = Attribute::text(ffi::CL_DRIVER_VERSION, "CL_DRIVER_VERSION");
pub const DEVICE_MAX_COMPUTE_UNITS: Attribute = Attribute::scalar(
    ffi::CL_DEVICE_MAX_COMPUTE_UNITS,
    "CL_DEVICE_MAX_COMPUTE_UNITS",
    ScalarKind::Uint,
);
pub const DEVICE_MAX_CLOCK_FREQUENCY: Attribute = Attribute::scalar(
    ffi::CL_DEVICE_MAX_CLOCK_FREQUENCY,
    "CL_DEVICE_MAX_CLOCK_FREQUENCY",
    ScalarKind::Uint,
);
pub const DEVICE_GLOBAL_MEM_SIZE: Attribute = Attribute::scalar(
    ffi::CL_DEVICE_GLOBAL_MEM_SIZE,
    "CL_DEVICE_GLOBAL_MEM_SIZE",
    ScalarKind::Memory,
);
pub const DEVICE_MAX_WORK_GROUP_SIZE: Attribute = Attribute::scalar(
    ffi::CL_DEVICE_MAX_WORK_GROUP_SIZE,
    "CL_DEVICE_MAX_WORK_GROUP_SIZE",
    ScalarKind::Size,
);
pub const DEVICE_AVAILABLE: Attribute =
    Attribute::scalar(ffi::CL_DEVICE_AVAILABLE, "CL_DEVICE_AVAILABLE", ScalarKind::Bool);

/// Attributes printed for every platform
pub const PLATFORM_ATTRIBUTES: &[Attribute] = &[
    PLATFORM_NAME,
    PLATFORM_VENDOR,
    PLATFORM_VERSION,
    PLATFORM_PROFILE,
    PLATFORM_EXTENSIONS,
];

/// Attributes printed for every device in the basic report
pub const DEVICE_ATTRIBUTES: &[Attribute] = &[DEVICE_NAME, DEVICE_VENDOR, DEVICE_TYPE];

/// Attributes printed for every device in the detailed report
pub const DEVICE_EXTENDED_ATTRIBUTES: &[Attribute] = &[
    DEVICE_NAME,
    DEVICE_VENDOR,
    DEVICE_TYPE,
    DEVICE_VERSION,
    DRIVER_VERSION,
    DEVICE_MAX_COMPUTE_UNITS,
    DEVICE_MAX_CLOCK_FREQUENCY,
    DEVICE_GLOBAL_MEM_SIZE,
    DEVICE_MAX_WORK_GROUP_SIZE,
    DEVICE_AVAILABLE,
];
