use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::models::Amplicon;
use crate::utils::{STD_STREAM, is_gzipped};

enum Sink {
    Plain(Box<dyn Write + Send>),
    Gzip(GzEncoder<BufWriter<File>>),
}

///
/// Bed-like writer for amplicons: `chrom\tstart\tend\tname`, one per line,
/// in the order they are handed over.
///
pub struct AmpliconWriter {
    sink: Sink,
    written: usize,
}

impl AmpliconWriter {
    ///
    /// Open a writer for a path. `-` writes to stdout and a `.gz` extension
    /// writes gzip-compressed output.
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn create<T: AsRef<Path>>(path: T) -> std::io::Result<Self> {
        let path = path.as_ref();

        if path.as_os_str() == STD_STREAM {
            return Ok(Self::from_writer(std::io::stdout()));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let sink = match is_gzipped(path) {
            true => Sink::Gzip(GzEncoder::new(BufWriter::new(file), Compression::best())),
            false => Sink::Plain(Box::new(BufWriter::new(file))),
        };

        Ok(AmpliconWriter { sink, written: 0 })
    }

    /// Wrap any writer, e.g. an in-memory buffer.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        AmpliconWriter {
            sink: Sink::Plain(Box::new(BufWriter::new(writer))),
            written: 0,
        }
    }

    pub fn write_amplicon(&mut self, amplicon: &Amplicon) -> std::io::Result<()> {
        match &mut self.sink {
            Sink::Plain(w) => writeln!(w, "{}", amplicon)?,
            Sink::Gzip(w) => writeln!(w, "{}", amplicon)?,
        }
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    ///
    /// Flush everything to the destination and return the record count.
    ///
    pub fn finish(self) -> std::io::Result<usize> {
        match self.sink {
            Sink::Plain(mut w) => w.flush()?,
            Sink::Gzip(w) => {
                w.finish()?.flush()?;
            }
        }
        Ok(self.written)
    }
}
