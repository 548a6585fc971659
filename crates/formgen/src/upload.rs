//! File upload checks and persistence.
//!
//! A file field moves through the states of [`UploadState`]: metadata may be
//! missing, present without a genuine upload, or present with one. Only a
//! genuine upload is size-checked, type-checked and finally persisted by an
//! [`UploadStore`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::FieldError;
use crate::schema::FieldDescriptor;
use crate::submission::UploadedFile;

/// Default maximum upload size: 2 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 2 * 1024 * 1024;

/// Default accepted extensions, lower-case with the leading dot.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[".jpeg", ".png", ".pdf"];

/// Limits applied to every genuine upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Maximum size in bytes (inclusive).
    pub max_size: u64,
    /// Accepted extensions, lower-case with the leading dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }
}

impl UploadPolicy {
    /// Creates the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum size.
    #[must_use]
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    /// Replaces the accepted extensions.
    #[must_use]
    pub fn allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        self
    }

    /// Returns whether a file of `size` bytes fits.
    pub fn allows_size(&self, size: u64) -> bool {
        size <= self.max_size
    }

    /// Returns whether the file's extension is accepted.
    pub fn allows_extension(&self, file: &UploadedFile) -> bool {
        file.extension()
            .is_some_and(|ext| self.allowed_extensions.iter().any(|a| *a == ext))
    }
}

/// Where a file field stands for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// No metadata was submitted for the field.
    NoFileInfo,
    /// Metadata exists but no genuine upload happened.
    NotUploaded,
    /// A genuine upload is waiting to be checked.
    Uploaded,
}

impl UploadState {
    /// Classifies the metadata submitted for a field.
    pub fn of(file: Option<&UploadedFile>, store: &dyn UploadStore) -> Self {
        match file {
            None => Self::NoFileInfo,
            Some(file) if file.uploaded && store.is_uploaded(file) => Self::Uploaded,
            Some(_) => Self::NotUploaded,
        }
    }
}

/// Destination for uploads that passed every check.
pub trait UploadStore {
    /// Limits applied before persisting.
    fn policy(&self) -> &UploadPolicy;

    /// Returns whether the file is a genuine upload and not a spoofed path.
    fn is_uploaded(&self, file: &UploadedFile) -> bool;

    /// Moves the upload to its destination and returns the stored path.
    fn persist(&self, file: &UploadedFile) -> io::Result<PathBuf>;
}

/// How a [`LocalUploadStore`] transfers the transient file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// Rename, falling back to copy and remove across filesystems.
    #[default]
    Move,
    /// Copy, leaving the source in place.
    Copy,
}

/// Stores uploads in a local directory under their original basename.
///
/// Files with the same basename overwrite each other.
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    destination: PathBuf,
    transient_root: Option<PathBuf>,
    mode: TransferMode,
    policy: UploadPolicy,
}

impl LocalUploadStore {
    /// Creates a store writing into `destination`.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            transient_root: None,
            mode: TransferMode::default(),
            policy: UploadPolicy::default(),
        }
    }

    /// Only accepts transient files located under `root`.
    #[must_use]
    pub fn transient_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.transient_root = Some(root.into());
        self
    }

    /// Sets the transfer mode.
    #[must_use]
    pub fn mode(mut self, mode: TransferMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the upload policy.
    #[must_use]
    pub fn policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the destination directory.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    fn ensure_destination(&self) -> io::Result<()> {
        if self.destination.is_dir() {
            return Ok(());
        }
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder.create(&self.destination)
    }
}

impl UploadStore for LocalUploadStore {
    fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    fn is_uploaded(&self, file: &UploadedFile) -> bool {
        if !file.uploaded || !file.tmp_path.is_file() {
            return false;
        }
        match &self.transient_root {
            Some(root) => match (fs::canonicalize(&file.tmp_path), fs::canonicalize(root)) {
                (Ok(path), Ok(root)) => path.starts_with(root),
                _ => false,
            },
            None => true,
        }
    }

    fn persist(&self, file: &UploadedFile) -> io::Result<PathBuf> {
        let name = basename(&file.file_name).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no usable file name in {:?}", file.file_name),
            )
        })?;

        self.ensure_destination()?;
        let target = self.destination.join(name);

        match self.mode {
            TransferMode::Copy => {
                fs::copy(&file.tmp_path, &target)?;
            }
            TransferMode::Move => {
                if fs::rename(&file.tmp_path, &target).is_err() {
                    fs::copy(&file.tmp_path, &target)?;
                    if let Err(e) = fs::remove_file(&file.tmp_path) {
                        warn!(
                            path = %file.tmp_path.display(),
                            error = %e,
                            "stored upload but could not remove transient file"
                        );
                    }
                }
            }
        }
        Ok(target)
    }
}

/// Last path component of a client-supplied name, for either separator.
fn basename(file_name: &str) -> Option<&str> {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

/// Runs the upload state machine for one file field.
///
/// Returns the stored path when a file was persisted, `None` when the
/// field passes without a file.
pub fn handle_upload(
    field: &FieldDescriptor,
    file: Option<&UploadedFile>,
    store: &dyn UploadStore,
) -> Result<Option<PathBuf>, FieldError> {
    let file = match (UploadState::of(file, store), file) {
        (UploadState::Uploaded, Some(file)) => file,
        _ if field.is_required() => return Err(FieldError::FileMissing),
        _ => return Ok(None),
    };

    let policy = store.policy();
    if !policy.allows_size(file.size) {
        return Err(FieldError::FileTooLarge {
            max: policy.max_size,
        });
    }
    if !policy.allows_extension(file) {
        return Err(FieldError::FileTypeNotAllowed);
    }

    match store.persist(file) {
        Ok(path) => {
            debug!(field = %field.name, path = %path.display(), "stored upload");
            Ok(Some(path))
        }
        Err(e) => {
            warn!(field = %field.name, error = %e, "failed to store upload");
            Err(FieldError::FileUploadFailed)
        }
    }
}
