//! Minimal OpenCL info tool
//!
//! Takes no arguments and always exits with status 0; a fatal error is
//! printed on stdout as an `Exception ...` line.
//!
//! Output differs from the classic C++ clinfo sample in two places:
//! `CL_DEVICE_TYPE` is shown as flag names (`GPU`, `CPU | DEFAULT`) rather
//! than the raw integer, and each `Number of OpenCL ...` header is printed
//! once the whole list has been read, so a failing list call leaves no
//! header behind.

use clprobe::{OpenClLibrary, ProbeConfig};

fn main() {
    let config = ProbeConfig::default();
    let stdout = std::io::stdout();
    let _ = clprobe::run_and_report(OpenClLibrary::load(), &config, &mut stdout.lock());
}
