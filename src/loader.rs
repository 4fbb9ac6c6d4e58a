//! Runtime binding to the system OpenCL ICD loader

use libc::{c_void, size_t};
use libloading::Library;
use log::{debug, info};
use std::path::Path;
use std::ptr;

use crate::driver::{DeviceId, DeviceType, Driver, PlatformId};
use crate::error::{ProbeError, ProbeResult};
use crate::ffi;

/// Library names tried when no explicit path is configured
#[cfg(target_os = "windows")]
pub const LIBRARY_CANDIDATES: &[&str] = &["OpenCL.dll"];
/// Library names tried when no explicit path is configured
#[cfg(target_os = "macos")]
pub const LIBRARY_CANDIDATES: &[&str] = &[
    "/System/Library/Frameworks/OpenCL.framework/OpenCL",
    "libOpenCL.dylib",
];
/// Library names tried when no explicit path is configured
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const LIBRARY_CANDIDATES: &[&str] = &["libOpenCL.so.1", "libOpenCL.so"];

/// OpenCL entry points resolved from a loaded library
pub struct OpenClLibrary {
    get_platform_ids: ffi::ClGetPlatformIds,
    get_platform_info: ffi::ClGetPlatformInfo,
    get_device_ids: ffi::ClGetDeviceIds,
    get_device_info: ffi::ClGetDeviceInfo,
    // Keeps the entry points above mapped
    _library: Library,
}

impl std::fmt::Debug for OpenClLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenClLibrary").finish_non_exhaustive()
    }
}

impl OpenClLibrary {
    /// Bind to the first ICD loader found among [`LIBRARY_CANDIDATES`]
    pub fn load() -> ProbeResult<Self> {
        for name in LIBRARY_CANDIDATES {
            match Self::load_from(name) {
                Ok(library) => return Ok(library),
                Err(_) => continue,
            }
        }
        Err(ProbeError::DriverInit)
    }

    /// Bind to an explicit loader library, or search when `path` is `None`
    pub fn open(path: Option<&Path>) -> ProbeResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Bind to the loader library at `path`
    pub fn load_from<P: AsRef<std::ffi::OsStr>>(path: P) -> ProbeResult<Self> {
        let path = path.as_ref();
        let library = unsafe { Library::new(path) }.map_err(|e| {
            debug!("failed to open {}: {}", path.to_string_lossy(), e);
            ProbeError::DriverInit
        })?;

        let bound = unsafe {
            Self {
                get_platform_ids: resolve(&library, b"clGetPlatformIDs\0")?,
                get_platform_info: resolve(&library, b"clGetPlatformInfo\0")?,
                get_device_ids: resolve(&library, b"clGetDeviceIDs\0")?,
                get_device_info: resolve(&library, b"clGetDeviceInfo\0")?,
                _library: library,
            }
        };

        info!("bound OpenCL entry points from {}", path.to_string_lossy());
        Ok(bound)
    }
}

/// Copy a function pointer out of `library`.
///
/// Safety: `T` must be the exact signature of the exported symbol, and the
/// returned pointer must not outlive `library`.
unsafe fn resolve<T: Copy>(library: &Library, symbol: &[u8]) -> ProbeResult<T> {
    library
        .get::<T>(symbol)
        .map(|sym| *sym)
        .map_err(|e| {
            debug!(
                "missing symbol {}: {}",
                String::from_utf8_lossy(&symbol[..symbol.len() - 1]),
                e
            );
            ProbeError::DriverInit
        })
}

fn out_ptr<T>(out: &mut [T]) -> *mut T {
    if out.is_empty() {
        ptr::null_mut()
    } else {
        out.as_mut_ptr()
    }
}

impl Driver for OpenClLibrary {
    fn platform_ids(&self, out: &mut [PlatformId]) -> Result<u32, i32> {
        let mut raw: Vec<ffi::cl_platform_id> = vec![ptr::null_mut(); out.len()];
        let mut count: ffi::cl_uint = 0;
        let status = unsafe {
            (self.get_platform_ids)(
                raw.len() as ffi::cl_uint,
                out_ptr(raw.as_mut_slice()),
                &mut count,
            )
        };
        if status != ffi::CL_SUCCESS {
            return Err(status);
        }

        for (slot, id) in out.iter_mut().zip(raw) {
            *slot = PlatformId::from_raw(id as usize);
        }
        Ok(count)
    }

    fn platform_info(
        &self,
        platform: PlatformId,
        param: u32,
        out: &mut [u8],
    ) -> Result<usize, i32> {
        let mut size: size_t = 0;
        let status = unsafe {
            (self.get_platform_info)(
                platform.as_ptr(),
                param,
                out.len(),
                out_ptr(out) as *mut c_void,
                &mut size,
            )
        };
        if status != ffi::CL_SUCCESS {
            return Err(status);
        }
        Ok(size)
    }

    fn device_ids(
        &self,
        platform: PlatformId,
        device_type: DeviceType,
        out: &mut [DeviceId],
    ) -> Result<u32, i32> {
        let mut raw: Vec<ffi::cl_device_id> = vec![ptr::null_mut(); out.len()];
        let mut count: ffi::cl_uint = 0;
        let status = unsafe {
            (self.get_device_ids)(
                platform.as_ptr(),
                device_type.bits(),
                raw.len() as ffi::cl_uint,
                out_ptr(raw.as_mut_slice()),
                &mut count,
            )
        };
        if status != ffi::CL_SUCCESS {
            return Err(status);
        }

        for (slot, id) in out.iter_mut().zip(raw) {
            *slot = DeviceId::from_raw(id as usize);
        }
        Ok(count)
    }

    fn device_info(&self, device: DeviceId, param: u32, out: &mut [u8]) -> Result<usize, i32> {
        let mut size: size_t = 0;
        let status = unsafe {
            (self.get_device_info)(
                device.as_ptr(),
                param,
                out.len(),
                out_ptr(out) as *mut c_void,
                &mut size,
            )
        };
        if status != ffi::CL_SUCCESS {
            return Err(status);
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_library_is_init_error() {
        let err = OpenClLibrary::load_from("/nonexistent/libOpenCL-clprobe-test.so").unwrap_err();
        assert!(matches!(err, ProbeError::DriverInit));
        assert_eq!(err.to_string(), "Can't init OpenCL driver!");
    }

    #[test]
    fn test_explicit_path_skips_search() {
        let missing = Path::new("/nonexistent/OpenCL");
        assert!(matches!(OpenClLibrary::open(Some(missing)), Err(ProbeError::DriverInit)));
    }

    #[test]
    fn test_candidates_not_empty() {
        assert!(!LIBRARY_CANDIDATES.is_empty());
    }

    #[test]
    fn test_out_ptr_null_for_empty() {
        let mut empty: [u8; 0] = [];
        assert!(out_ptr(&mut empty[..]).is_null());
        let mut one = [0u8; 1];
        assert!(!out_ptr(&mut one[..]).is_null());
    }
}
