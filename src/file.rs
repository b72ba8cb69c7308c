use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use fs4::fs_std::FileExt;
use thiserror::Error;

use super::{
    meta::MetaError,
    session::{DecodeOptions, Session},
};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("files with the extension \"{0}\" are not supported")]
    UnsupportedExtension(String),
    #[error("{name} is not a readable VSML image: {source}")]
    Unreadable { name: String, source: MetaError },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Format {
    Vsml,
}

impl Format {
    /// Dispatch on everything after the first dot of the file name, so
    /// `image.vsml.bak` is `vsml.bak` and unsupported.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let name = path
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let extension = name.split_once('.').map_or("", |(_, ext)| ext);
        match extension {
            "vsml" => Ok(Format::Vsml),
            _ => Err(FileError::UnsupportedExtension(extension.to_owned())),
        }
    }
}

/// Raw bytes of an image file together with the name used in extraction hints.
pub struct Image {
    path: PathBuf,
    name: String,
    bytes: Vec<u8>,
}

impl Image {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;

        let mut file = fs::File::open(path)?;
        FileExt::lock_shared(&file)?;
        let mut bytes = Vec::with_capacity(file.metadata()?.len() as usize);
        let res = file.read_to_end(&mut bytes);
        FileExt::unlock(&file)?;
        res?;
        log::info!("read {format:?} image {}, {} bytes", path.display(), bytes.len());

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Image {
            path: path.to_owned(),
            name,
            bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn session(&self, options: DecodeOptions) -> Result<Session<'_>, FileError> {
        Session::load_with(&self.bytes, Some(&self.name), options).map_err(|source| {
            FileError::Unreadable {
                name: self.name.clone(),
                source,
            }
        })
    }
}
