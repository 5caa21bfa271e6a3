use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

use sarsa2048_training::weights;

use crate::schema::weight_model::WeightModel;

/// Destination of a command's output: a buffered file, or stdout when no path was given.
pub struct Output {
    writer: Box<dyn Write>,
    path: Option<PathBuf>,
}

impl Output {
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let writer: Box<dyn Write> = match path {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?)),
            None => Box::new(io::stdout().lock()),
        };
        Ok(Self {
            writer,
            path: path.map(Path::to_path_buf),
        })
    }

    pub fn label(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "stdout".to_owned(), |path| path.display().to_string())
    }

    /// Writes `value` as pretty JSON followed by a newline.
    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer_pretty(&mut self.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", self.label()))?;
        writeln!(self.writer)
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write to {}", self.label()))
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

fn open(kind: &str, path: &Path) -> anyhow::Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {kind} file: {}", path.display()))?;
    Ok(BufReader::new(file))
}

pub fn read_json_file<T>(kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_reader(open(kind, path)?)
        .with_context(|| format!("Failed to parse {kind} file: {}", path.display()))
}

pub fn read_weight_model_file(path: &Path) -> anyhow::Result<WeightModel> {
    read_json_file("weight model", path)
}

/// Reads flat weights, one value per line.
pub fn read_flat_weights_file(path: &Path) -> anyhow::Result<Vec<f64>> {
    weights::read_flat(open("weights", path)?)
        .with_context(|| format!("Failed to read weights file: {}", path.display()))
}
