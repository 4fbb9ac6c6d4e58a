//! Export a JSON probe report next to the working directory

use clprobe::ProbeConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ProbeConfig::detailed();
    let driver = config.bind()?;
    let report = clprobe::collect(&driver, &config)?;

    report.export_json("clprobe_report.json")?;
    println!(
        "✅ Report for {} platform(s) written to clprobe_report.json",
        report.platforms.len()
    );
    Ok(())
}
