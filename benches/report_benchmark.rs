use clprobe::ffi;
use clprobe::{DeviceId, DeviceType, Driver, PlatformId, ProbeConfig, TextSink};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Driver answering every query from constants: 2 platforms x 4 devices
struct SyntheticDriver;

fn answer(value: &[u8], out: &mut [u8]) -> Result<usize, i32> {
    if !out.is_empty() {
        out.copy_from_slice(value);
    }
    Ok(value.len())
}

impl Driver for SyntheticDriver {
    fn platform_ids(&self, out: &mut [PlatformId]) -> Result<u32, i32> {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = PlatformId::from_raw(i + 1);
        }
        Ok(2)
    }

    fn platform_info(&self, _: PlatformId, _: u32, out: &mut [u8]) -> Result<usize, i32> {
        answer(b"Synthetic OpenCL Platform\0", out)
    }

    fn device_ids(&self, _: PlatformId, _: DeviceType, out: &mut [DeviceId]) -> Result<u32, i32> {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = DeviceId::from_raw(i + 1);
        }
        Ok(4)
    }

    fn device_info(&self, _: DeviceId, param: u32, out: &mut [u8]) -> Result<usize, i32> {
        match param {
            ffi::CL_DEVICE_TYPE | ffi::CL_DEVICE_GLOBAL_MEM_SIZE => {
                answer(&ffi::CL_DEVICE_TYPE_GPU.to_ne_bytes(), out)
            }
            ffi::CL_DEVICE_MAX_COMPUTE_UNITS
            | ffi::CL_DEVICE_MAX_CLOCK_FREQUENCY
            | ffi::CL_DEVICE_AVAILABLE => answer(&1u32.to_ne_bytes(), out),
            ffi::CL_DEVICE_MAX_WORK_GROUP_SIZE => answer(&1024usize.to_ne_bytes(), out),
            _ => answer(b"Synthetic Device\0", out),
        }
    }
}

pub fn bench_text_report(c: &mut Criterion) {
    let config = ProbeConfig::default();
    c.bench_function("text_report", |b| {
        b.iter(|| {
            let mut sink = TextSink::new(Vec::with_capacity(1024));
            clprobe::walk(black_box(&SyntheticDriver), &config, &mut sink).unwrap();
            sink.into_inner()
        })
    });
}

pub fn bench_collect_detailed(c: &mut Criterion) {
    let config = ProbeConfig::detailed();
    c.bench_function("collect_detailed", |b| {
        b.iter(|| clprobe::collect(black_box(&SyntheticDriver), &config).unwrap())
    });
}

criterion_group!(benches, bench_text_report, bench_collect_detailed);
criterion_main!(benches);
