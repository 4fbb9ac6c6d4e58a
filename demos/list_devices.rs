//! Simple example listing every OpenCL device with its memory size

use clprobe::{OpenClLibrary, ProbeConfig, QueryOutcome};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🖥️  clprobe device listing");
    println!("==========================\n");

    let driver = match OpenClLibrary::load() {
        Ok(driver) => driver,
        Err(e) => {
            println!("❌ {}", e);
            println!("   Install an OpenCL ICD loader (e.g. ocl-icd) and a vendor driver.");
            return Ok(());
        }
    };

    let report = clprobe::collect(&driver, &ProbeConfig::detailed())?;
    for platform in &report.platforms {
        for device in &platform.devices {
            let show = |title: &str| match device.attribute(title) {
                Some(QueryOutcome::Value { value }) => value.to_string(),
                _ => "?".to_string(),
            };
            println!(
                "  [{}.{}] {} ({}), {}",
                platform.index,
                device.index,
                show("CL_DEVICE_NAME"),
                show("CL_DEVICE_TYPE"),
                show("CL_DEVICE_GLOBAL_MEM_SIZE"),
            );
        }
    }

    println!("\n✅ {} device(s) found", report.device_count());
    Ok(())
}
