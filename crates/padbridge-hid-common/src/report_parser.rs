//! Report parsing utilities.
//!
//! [`ReportParser`] borrows its input so the per-family decoders stay
//! allocation-free on the 1 kHz poll path.

use crate::{HidCommonError, HidCommonResult};

/// Cursor over a raw report buffer with little-endian field readers.
#[derive(Debug)]
pub struct ReportParser<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ReportParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buffer: data,
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn read_u8(&mut self) -> HidCommonResult<u8> {
        let value = self
            .buffer
            .get(self.position)
            .copied()
            .ok_or(HidCommonError::InvalidReport("unexpected end of data"))?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_i8(&mut self) -> HidCommonResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16_le(&mut self) -> HidCommonResult<u16> {
        let lo = u16::from(self.read_u8()?);
        let hi = u16::from(self.read_u8()?);
        Ok(lo | (hi << 8))
    }

    pub fn read_i16_le(&mut self) -> HidCommonResult<i16> {
        Ok(self.read_u16_le()? as i16)
    }

    pub fn peek_u8(&self) -> HidCommonResult<u8> {
        self.buffer
            .get(self.position)
            .copied()
            .ok_or(HidCommonError::InvalidReport("unexpected end of data"))
    }

    pub fn skip(&mut self, count: usize) {
        self.position = (self.position + count).min(self.buffer.len());
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

/// Fixed-buffer report writer for output reports (rumble, init commands).
///
/// Writes into a caller-provided array, so encoding is allocation-free.
#[derive(Debug)]
pub struct ReportWriter<'a> {
    buffer: &'a mut [u8],
    position: usize,
}

impl<'a> ReportWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        buffer.fill(0);
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        if self.position < self.buffer.len() {
            self.buffer[self.position] = value;
            self.position += 1;
        }
        self
    }

    pub fn write_u16_le(&mut self, value: u16) -> &mut Self {
        self.write_u8((value & 0xFF) as u8);
        self.write_u8((value >> 8) as u8)
    }

    pub fn skip(&mut self, count: usize) -> &mut Self {
        self.position = (self.position + count).min(self.buffer.len());
        self
    }

    pub fn len(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position == 0
    }
}
