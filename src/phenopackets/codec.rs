use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use serde::Serialize;
use serde::de::DeserializeOwned;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::constants::*;
use crate::error::{DecodeError, EncodeError};

// Binary encoding: MessagePack with field names, so fields that are absent
// are left out rather than written as nil
pub fn to_binary<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(rmp_serde::to_vec_named(value)?)
}

pub fn from_binary<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let mut cursor = Cursor::new(bytes);
    let value = rmp_serde::decode::from_read(&mut cursor)?;

    let count = bytes.len() - cursor.position() as usize;
    if count > 0 {
        return Err(DecodeError::TrailingBytes { count });
    }

    Ok(value)
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(value)?)
}

pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, EncodeError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, DecodeError> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Binary,
}

impl FileFormat {
    pub fn name(&self) -> &'static str {
        match *self {
            FileFormat::Json => "JSON",
            FileFormat::Binary => "binary",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Uncompressed,
    Zstd,
    Gzip,
}

// Work out the encoding and compression from a file name, eg.
// "family.json.zst" is zstd compressed JSON
pub fn file_format(path: &Path) -> Result<(FileFormat, Compression)> {
    let file_name = path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .with_context(|| format!("no file name in {}", path.display()))?;

    let mut parts: Vec<&str> = file_name.rsplit('.').collect();

    let compression = match parts.first() {
        Some(&ZSTD_FILE_EXTENSION) => Compression::Zstd,
        Some(&GZIP_FILE_EXTENSION) => Compression::Gzip,
        _ => Compression::Uncompressed,
    };

    if compression != Compression::Uncompressed {
        parts.remove(0);
    }

    // a bare name with no extension
    if parts.len() < 2 {
        bail!("can't tell the format of {} from its name", path.display());
    }

    let extension = parts[0];

    let format = if JSON_FILE_EXTENSIONS.contains(&extension) {
        FileFormat::Json
    } else if BINARY_FILE_EXTENSIONS.contains(&extension) {
        FileFormat::Binary
    } else {
        bail!("unknown file extension \"{}\" for {}", extension, path.display());
    };

    Ok((format, compression))
}

// Fail unless the name of path gives the expected format, for callers that
// were asked for a particular format
pub fn expect_file_format(path: &Path, expected: FileFormat) -> Result<Compression> {
    let (format, compression) = file_format(path)?;

    if format != expected {
        bail!("{} would be written as {}, not {}: use a .{} extension",
              path.display(), format.name(), expected.name(),
              match expected {
                  FileFormat::Json => JSON_FILE_EXTENSIONS[0],
                  FileFormat::Binary => BINARY_FILE_EXTENSIONS[0],
              });
    }

    Ok(compression)
}

fn read_bytes(path: &Path, compression: Compression) -> Result<Vec<u8>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut contents = vec![];

    match compression {
        Compression::Uncompressed => {
            reader.read_to_end(&mut contents)?;
        },
        Compression::Zstd => {
            let mut decoder = zstd::stream::Decoder::new(reader)?;
            decoder.read_to_end(&mut contents)?;
        },
        Compression::Gzip => {
            let mut decoder = GzDecoder::new(reader);
            decoder.read_to_end(&mut contents)?;
        },
    }

    Ok(contents)
}

fn write_bytes(path: &Path, compression: Compression, contents: &[u8]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match compression {
        Compression::Uncompressed => {
            writer.write_all(contents)?;
        },
        Compression::Zstd => {
            let mut encoder = zstd::stream::Encoder::new(&mut writer, 0)?;
            encoder.write_all(contents)?;
            encoder.finish()?;
        },
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(&mut writer, flate2::Compression::default());
            encoder.write_all(contents)?;
            encoder.finish()?;
        },
    }

    writer.flush()?;

    Ok(())
}

// Read a Phenopacket or Family (or any of their parts) from a file in the
// format given by its name
pub fn read_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let (format, compression) = file_format(path)?;

    let contents = read_bytes(path, compression)?;

    tracing::info!("read {} bytes from {}", contents.len(), path.display());

    let value = match format {
        FileFormat::Json => {
            let json = String::from_utf8(contents)
                .with_context(|| format!("{} is not UTF-8", path.display()))?;
            from_json(&json)
        },
        FileFormat::Binary => from_binary(&contents),
    };

    value.with_context(|| format!("failed to decode {}", path.display()))
}

pub fn write_file<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (format, compression) = file_format(path)?;

    let contents = match format {
        FileFormat::Json => to_json_pretty(value).map(String::into_bytes),
        FileFormat::Binary => to_binary(value),
    };
    let contents = contents.with_context(|| format!("failed to encode {}", path.display()))?;

    write_bytes(path, compression, &contents)?;

    tracing::info!("wrote {} bytes to {}", contents.len(), path.display());

    Ok(())
}

#[test]
fn test_file_format() {
    assert_eq!(file_format(Path::new("packet.json")).unwrap(),
               (FileFormat::Json, Compression::Uncompressed));
    assert_eq!(file_format(Path::new("/tmp/family.pb.zst")).unwrap(),
               (FileFormat::Binary, Compression::Zstd));
    assert_eq!(file_format(Path::new("packet.JSON.gz")).unwrap(),
               (FileFormat::Json, Compression::Gzip));
    assert!(file_format(Path::new("packet.txt")).is_err());
    assert!(file_format(Path::new("json")).is_err());
    assert!(file_format(Path::new("json.gz")).is_err());
}

#[test]
fn test_expect_file_format() {
    assert_eq!(expect_file_format(Path::new("out.json.gz"), FileFormat::Json).unwrap(),
               Compression::Gzip);
    assert_eq!(expect_file_format(Path::new("out.bin"), FileFormat::Binary).unwrap(),
               Compression::Uncompressed);

    let err = expect_file_format(Path::new("out.pb"), FileFormat::Json).unwrap_err();
    assert!(err.to_string().contains("not JSON"));
    assert!(expect_file_format(Path::new("out.json.zst"), FileFormat::Binary).is_err());
    assert!(expect_file_format(Path::new("out"), FileFormat::Json).is_err());
}

#[test]
fn test_trailing_bytes() {
    let mut bytes = to_binary(&vec![1u32, 2, 3]).unwrap();
    bytes.push(0xc0);

    match from_binary::<Vec<u32>>(&bytes) {
        Err(DecodeError::TrailingBytes { count }) => assert_eq!(count, 1),
        other => panic!("expected trailing bytes error, got {:?}", other),
    }
}
