//! Line-oriented text output

use std::io::Write;

use crate::attributes::Attribute;
use crate::error::ProbeResult;
use crate::query::QueryOutcome;
use crate::report::ReportSink;

/// Writes the report as text, one line per event, as soon as it arrives
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    /// Sink writing into `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn platform_count(&mut self, count: usize) -> ProbeResult<()> {
        writeln!(self.out, "Number of OpenCL platforms: {}", count)?;
        Ok(())
    }

    fn begin_platform(&mut self, index: usize, count: usize) -> ProbeResult<()> {
        writeln!(self.out, "Platform #{}/{}", index + 1, count)?;
        Ok(())
    }

    fn device_count(&mut self, count: usize) -> ProbeResult<()> {
        writeln!(self.out, "Number of OpenCL devices: {}", count)?;
        Ok(())
    }

    fn begin_device(&mut self, index: usize, count: usize) -> ProbeResult<()> {
        writeln!(self.out, "Device #{}/{}", index + 1, count)?;
        Ok(())
    }

    fn attribute(&mut self, attribute: &Attribute, outcome: &QueryOutcome) -> ProbeResult<()> {
        match outcome {
            QueryOutcome::Value { value } => {
                writeln!(self.out, "    {}: {}", attribute.title, value)?;
            }
            QueryOutcome::SizeMismatch { observed, expected } => {
                writeln!(
                    self.out,
                    "    {} has size {}, but given {}",
                    attribute.title, observed, expected
                )?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> ProbeResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
