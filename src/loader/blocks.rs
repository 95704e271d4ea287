//! Sequential fixed-size record blocks over a CSV source.
//!
//! Records are read with the `csv` crate and re-encoded, header first, into
//! one standalone CSV buffer per block. Quoted fields, escaped quotes and
//! any of the usual line terminators survive the round trip.

use crate::error::Result;

use csv::{ByteRecord, Reader, ReaderBuilder, WriterBuilder};
use std::io::Read;

/// Raw CSV bytes for one block, header included
#[derive(Debug, Clone)]
pub struct RawBlock {
    pub bytes: Vec<u8>,
    pub records: usize,
}

/// Iterator over header-prefixed record blocks
pub struct RecordBlocks<R> {
    reader: Reader<R>,
    header: ByteRecord,
    block_size: usize,
    finished: bool,
}

impl<R: Read> RecordBlocks<R> {
    /// Read the header row and prepare to yield blocks.
    ///
    /// Returns `Ok(None)` when the source holds no header row at all.
    pub fn new(source: R, block_size: usize) -> Result<Option<Self>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let header = reader.byte_headers()?.clone();
        if header.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            reader,
            header,
            block_size: block_size.max(1),
            finished: false,
        }))
    }

    pub fn header(&self) -> &ByteRecord {
        &self.header
    }

    fn next_block(&mut self) -> Result<Option<RawBlock>> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        writer.write_byte_record(&self.header)?;

        let mut record = ByteRecord::new();
        let mut records = 0;
        while records < self.block_size {
            if !self.reader.read_byte_record(&mut record)? {
                self.finished = true;
                break;
            }
            writer.write_byte_record(&record)?;
            records += 1;
        }

        if records == 0 {
            return Ok(None);
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(Some(RawBlock { bytes, records }))
    }
}

impl<R: Read> Iterator for RecordBlocks<R> {
    type Item = Result<RawBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
