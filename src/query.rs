//! The two-call attribute query: probe the size, then read the value

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem::size_of;

use crate::attributes::Attribute;
use crate::driver::{DeviceId, DeviceType, Driver, PlatformId};
use crate::error::{check, ProbeError, ProbeResult};

/// Expected representation of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// NUL-terminated byte string of driver-defined length
    Text,
    /// Fixed-width value
    Scalar(ScalarKind),
}

/// The fixed-width value kinds clprobe knows how to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// `cl_uint`
    Uint,
    /// `cl_ulong`
    Ulong,
    /// `size_t`
    Size,
    /// `cl_bool`
    Bool,
    /// `cl_device_type`
    DeviceType,
    /// `cl_ulong` byte count, shown in megabytes
    Memory,
}

impl ScalarKind {
    /// Byte width the driver must report
    pub const fn width(self) -> usize {
        match self {
            ScalarKind::Uint | ScalarKind::Bool => size_of::<u32>(),
            ScalarKind::Ulong | ScalarKind::DeviceType | ScalarKind::Memory => size_of::<u64>(),
            ScalarKind::Size => size_of::<usize>(),
        }
    }

    fn decode(self, bytes: &[u8]) -> AttributeValue {
        match self {
            ScalarKind::Uint => AttributeValue::Uint(read_u32(bytes)),
            ScalarKind::Bool => AttributeValue::Bool(read_u32(bytes) != 0),
            ScalarKind::Ulong => AttributeValue::Ulong(read_u64(bytes)),
            ScalarKind::DeviceType => {
                AttributeValue::DeviceType(DeviceType::from_bits(read_u64(bytes)))
            }
            ScalarKind::Memory => AttributeValue::Memory { bytes: read_u64(bytes) },
            ScalarKind::Size => AttributeValue::Size(read_usize(bytes) as u64),
        }
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let width = size_of::<u32>();
    let mut raw = [0u8; size_of::<u32>()];
    raw.copy_from_slice(&bytes[..width]);
    u32::from_ne_bytes(raw)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let width = size_of::<u64>();
    let mut raw = [0u8; size_of::<u64>()];
    raw.copy_from_slice(&bytes[..width]);
    u64::from_ne_bytes(raw)
}

fn read_usize(bytes: &[u8]) -> usize {
    let width = size_of::<usize>();
    let mut raw = [0u8; size_of::<usize>()];
    raw.copy_from_slice(&bytes[..width]);
    usize::from_ne_bytes(raw)
}

/// Text up to the first NUL; invalid UTF-8 is replaced
fn decode_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// A decoded attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// String attribute
    Text(String),
    /// `cl_uint` attribute
    Uint(u32),
    /// `cl_ulong` attribute
    Ulong(u64),
    /// `size_t` attribute
    Size(u64),
    /// `cl_bool` attribute
    Bool(bool),
    /// `cl_device_type` attribute
    DeviceType(DeviceType),
    /// Memory size in bytes
    Memory {
        /// Raw byte count
        bytes: u64,
    },
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(text) => write!(f, "{}", text),
            AttributeValue::Uint(v) => write!(f, "{}", v),
            AttributeValue::Ulong(v) | AttributeValue::Size(v) => write!(f, "{}", v),
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::DeviceType(ty) => write!(f, "{}", ty),
            AttributeValue::Memory { bytes } => write!(f, "{} MB", bytes / (1024 * 1024)),
        }
    }
}

/// What a query produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// The value was read
    Value {
        /// Decoded value
        value: AttributeValue,
    },
    /// A scalar attribute reported a size other than its width; not read
    SizeMismatch {
        /// Size the driver reported
        observed: usize,
        /// Width of the expected scalar
        expected: usize,
    },
}

/// A handle that attributes can be queried on
pub trait InfoTarget: Copy + fmt::Debug {
    /// Name of the entry point, used in error reports
    const CALL: &'static str;

    /// Issue one info call for `param` into `out`
    fn info<D: Driver + ?Sized>(self, driver: &D, param: u32, out: &mut [u8]) -> Result<usize, i32>;
}

impl InfoTarget for PlatformId {
    const CALL: &'static str = "clGetPlatformInfo";

    fn info<D: Driver + ?Sized>(
        self,
        driver: &D,
        param: u32,
        out: &mut [u8],
    ) -> Result<usize, i32> {
        driver.platform_info(self, param, out)
    }
}

impl InfoTarget for DeviceId {
    const CALL: &'static str = "clGetDeviceInfo";

    fn info<D: Driver + ?Sized>(
        self,
        driver: &D,
        param: u32,
        out: &mut [u8],
    ) -> Result<usize, i32> {
        driver.device_info(self, param, out)
    }
}

/// Query one attribute on `handle`.
///
/// The size from the probe call is used verbatim for the value call. A
/// scalar whose probed size differs from its width yields
/// [`QueryOutcome::SizeMismatch`]; every driver failure is returned as an
/// error.
pub fn query_attribute<D, H>(
    driver: &D,
    handle: H,
    attribute: &Attribute,
) -> ProbeResult<QueryOutcome>
where
    D: Driver + ?Sized,
    H: InfoTarget,
{
    let param_size = check(handle.info(driver, attribute.id, &mut []), H::CALL)?;
    debug!("{:?} {} has size {}", handle, attribute.title, param_size);

    let kind = match attribute.shape {
        Shape::Text => {
            let mut buffer = vec![0u8; param_size];
            let written = check(handle.info(driver, attribute.id, &mut buffer), H::CALL)?;
            ensure_same_size(H::CALL, attribute, param_size, written)?;
            return Ok(QueryOutcome::Value {
                value: AttributeValue::Text(decode_text(&buffer)),
            });
        }
        Shape::Scalar(kind) => kind,
    };

    let expected = kind.width();
    if param_size != expected {
        warn!(
            "{} on {:?} has size {}, expected {}",
            attribute.title, handle, param_size, expected
        );
        return Ok(QueryOutcome::SizeMismatch { observed: param_size, expected });
    }

    let mut buffer = vec![0u8; expected];
    let written = check(handle.info(driver, attribute.id, &mut buffer), H::CALL)?;
    ensure_same_size(H::CALL, attribute, param_size, written)?;
    Ok(QueryOutcome::Value { value: kind.decode(&buffer) })
}

fn ensure_same_size(
    call: &'static str,
    attribute: &Attribute,
    probed: usize,
    returned: usize,
) -> ProbeResult<()> {
    if probed != returned {
        return Err(ProbeError::ValueSizeMismatch {
            call,
            title: attribute.title,
            probed,
            returned,
        });
    }
    Ok(())
}
