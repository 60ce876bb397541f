//! VCD waveform capture of DUT ports.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use vcd::{IdCode, TimescaleUnit, Value};

use crate::dut::Signal;

pub struct WaveformTracer {
    writer: vcd::Writer<BufWriter<File>>,
    ids: Vec<IdCode>,
    /// Last dumped words per signal; `None` until first written.
    last: Vec<Option<Vec<u32>>>,
    path: PathBuf,
}

impl WaveformTracer {
    /// Creates `path` and declares one wire per probe under module `top`.
    pub fn open(path: &Path, top: &str, probes: &[Signal]) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = vcd::Writer::new(BufWriter::new(File::create(path)?));
        writer.timescale(1, TimescaleUnit::NS)?;
        writer.add_module(top)?;
        let ids = probes
            .iter()
            .map(|signal| writer.add_wire(signal.width, signal.name))
            .collect::<io::Result<Vec<_>>>()?;
        writer.upscope()?;
        writer.enddefinitions()?;

        tracing::debug!("tracing {} signals to {}", ids.len(), path.display());
        Ok(Self {
            writer,
            last: vec![None; ids.len()],
            ids,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every probe whose value changed since the previous dump.
    pub fn dump(&mut self, time: u64, probes: &[Signal]) -> io::Result<()> {
        self.writer.timestamp(time)?;
        for ((signal, &id), last) in probes.iter().zip(&self.ids).zip(self.last.iter_mut()) {
            if last.as_deref() == Some(signal.words.as_slice()) {
                continue;
            }
            if signal.width == 1 {
                self.writer.change_scalar(id, bit_value(signal.words[0], 0))?;
            } else {
                self.writer.change_vector(id, msb_first(signal))?;
            }
            *last = Some(signal.words.clone());
        }
        Ok(())
    }

    pub fn close(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

fn bit_value(word: u32, bit: u32) -> Value {
    if (word >> bit) & 1 == 1 {
        Value::V1
    } else {
        Value::V0
    }
}

fn msb_first(signal: &Signal) -> impl Iterator<Item = Value> + '_ {
    (0..signal.width)
        .rev()
        .map(move |bit| bit_value(signal.words[(bit / 32) as usize], bit % 32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wave.vcd");
        let probes = |clk: bool, data: u32| {
            vec![
                Signal::bit("clk", clk),
                Signal::wide("data", &[data, 0x8000_0000]),
            ]
        };

        let mut tracer = WaveformTracer::open(&path, "top", &probes(false, 0)).unwrap();
        tracer.dump(0, &probes(false, 5)).unwrap();
        tracer.dump(1, &probes(true, 5)).unwrap();
        tracer.close().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("$scope module top $end"));
        assert!(text.contains("$enddefinitions $end"));
        assert!(text.contains("#0"));
        assert!(text.contains("#1"));
        // 64-bit vector, MSB first: bit 63 set, low word = 5
        let expected = format!("b1{}101", "0".repeat(60));
        assert!(text.contains(&expected));
        // the vector is unchanged at #1, so it is written once
        assert_eq!(text.matches(&expected).count(), 1);
    }
}
