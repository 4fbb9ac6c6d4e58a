//! Two-phase listing of platforms and devices

use log::{debug, warn};

use crate::driver::{DeviceId, DeviceType, Driver, PlatformId};
use crate::error::{check, ProbeError, ProbeResult};
use crate::ffi;

/// Number of platforms the driver exposes
pub fn platform_count<D: Driver + ?Sized>(driver: &D) -> ProbeResult<u32> {
    check(driver.platform_ids(&mut []), "clGetPlatformIDs")
}

/// List every platform.
///
/// The list holds exactly as many entries as the count probe reported;
/// a different count from the fill call is an error.
pub fn platform_ids<D: Driver + ?Sized>(driver: &D) -> ProbeResult<Vec<PlatformId>> {
    let probed = platform_count(driver)?;
    debug!("clGetPlatformIDs reports {} platform(s)", probed);
    if probed == 0 {
        warn!("no OpenCL platforms available");
        return Ok(Vec::new());
    }

    let mut platforms = vec![PlatformId::default(); probed as usize];
    let returned = check(driver.platform_ids(&mut platforms), "clGetPlatformIDs")?;
    ensure_same_count("clGetPlatformIDs", probed, returned)?;
    Ok(platforms)
}

/// Number of devices of `device_type` on `platform`.
///
/// With a narrowed filter, `CL_DEVICE_NOT_FOUND` means the platform simply
/// has no device of that type and counts as zero. For [`DeviceType::ALL`]
/// it stays an error.
pub fn device_count<D: Driver + ?Sized>(
    driver: &D,
    platform: PlatformId,
    device_type: DeviceType,
) -> ProbeResult<u32> {
    match driver.device_ids(platform, device_type, &mut []) {
        Err(ffi::CL_DEVICE_NOT_FOUND) if device_type != DeviceType::ALL => {
            debug!("{:?} has no devices of type {}", platform, device_type);
            Ok(0)
        }
        result => check(result, "clGetDeviceIDs"),
    }
}

/// List the devices of `device_type` on `platform`
pub fn device_ids<D: Driver + ?Sized>(
    driver: &D,
    platform: PlatformId,
    device_type: DeviceType,
) -> ProbeResult<Vec<DeviceId>> {
    let probed = device_count(driver, platform, device_type)?;
    debug!(
        "clGetDeviceIDs reports {} device(s) of type {} on {:?}",
        probed, device_type, platform
    );
    if probed == 0 {
        warn!("platform {:?} has no devices of type {}", platform, device_type);
        return Ok(Vec::new());
    }

    let mut devices = vec![DeviceId::default(); probed as usize];
    let returned = check(
        driver.device_ids(platform, device_type, &mut devices),
        "clGetDeviceIDs",
    )?;
    ensure_same_count("clGetDeviceIDs", probed, returned)?;
    Ok(devices)
}

fn ensure_same_count(call: &'static str, probed: u32, returned: u32) -> ProbeResult<()> {
    if probed != returned {
        return Err(ProbeError::CountMismatch { call, probed, returned });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use mockall::predicate::{always, eq};
    use rstest::rstest;

    fn platforms_driver(count: u32) -> MockDriver {
        let mut driver = MockDriver::new();
        driver.expect_platform_ids().returning(move |out| {
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = PlatformId::from_raw(0x100 + i);
            }
            Ok(count)
        });
        driver
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    fn test_platform_list_matches_probe(#[case] count: u32) {
        let driver = platforms_driver(count);
        let platforms = platform_ids(&driver).unwrap();
        assert_eq!(platforms.len(), count as usize);
        assert_eq!(platforms[0], PlatformId::from_raw(0x100));
    }

    #[test]
    fn test_probe_is_idempotent() {
        let driver = platforms_driver(2);
        assert_eq!(platform_count(&driver).unwrap(), platform_count(&driver).unwrap());
    }

    #[test]
    fn test_zero_platforms_skips_fill_call() {
        let mut driver = MockDriver::new();
        driver
            .expect_platform_ids()
            .withf(|out| out.is_empty())
            .times(1)
            .returning(|_| Ok(0));
        assert!(platform_ids(&driver).unwrap().is_empty());
    }

    #[test]
    fn test_changing_count_is_error() {
        let mut driver = MockDriver::new();
        driver
            .expect_platform_ids()
            .returning(|out| Ok(if out.is_empty() { 2 } else { 3 }));

        let err = platform_ids(&driver).unwrap_err();
        assert!(matches!(
            err,
            ProbeError::CountMismatch { call: "clGetPlatformIDs", probed: 2, returned: 3 }
        ));
    }

    #[test]
    fn test_device_list_is_scoped_to_platform_and_type() {
        let platform = PlatformId::from_raw(0x100);
        let mut driver = MockDriver::new();
        driver
            .expect_device_ids()
            .with(eq(platform), eq(DeviceType::GPU), always())
            .times(2)
            .returning(|_, _, out| {
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = DeviceId::from_raw(0x200 + i);
                }
                Ok(2)
            });

        let devices = device_ids(&driver, platform, DeviceType::GPU).unwrap();
        assert_eq!(devices, vec![DeviceId::from_raw(0x200), DeviceId::from_raw(0x201)]);
    }

    #[test]
    fn test_device_status_error_is_fatal() {
        let mut driver = MockDriver::new();
        driver.expect_device_ids().returning(|_, _, _| Err(-1));

        let err = device_ids(&driver, PlatformId::from_raw(1), DeviceType::ALL).unwrap_err();
        assert_eq!(err.status_name(), Some("CL_DEVICE_NOT_FOUND"));
    }

    #[test]
    fn test_missing_type_counts_as_zero_when_filtered() {
        let mut driver = MockDriver::new();
        driver
            .expect_device_ids()
            .withf(|_, _, out| out.is_empty())
            .times(1)
            .returning(|_, _, _| Err(ffi::CL_DEVICE_NOT_FOUND));

        let devices = device_ids(&driver, PlatformId::from_raw(1), DeviceType::GPU).unwrap();
        assert!(devices.is_empty());
    }

    #[test]
    fn test_other_status_is_fatal_when_filtered() {
        let mut driver = MockDriver::new();
        driver.expect_device_ids().returning(|_, _, _| Err(-5));

        let err = device_ids(&driver, PlatformId::from_raw(1), DeviceType::CPU).unwrap_err();
        assert_eq!(err.status_code(), Some(-5));
    }

    #[test]
    fn test_changing_device_count_is_error() {
        let mut driver = MockDriver::new();
        driver
            .expect_device_ids()
            .returning(|_, _, out| Ok(if out.is_empty() { 2 } else { 3 }));

        let err = device_ids(&driver, PlatformId::from_raw(1), DeviceType::ALL).unwrap_err();
        assert!(matches!(
            err,
            ProbeError::CountMismatch { call: "clGetDeviceIDs", probed: 2, returned: 3 }
        ));
    }
}
