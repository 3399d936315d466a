use std::fs::{DirBuilder, OpenOptions};
use std::io::Write;
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
use std::path::PathBuf;

use crate::core::errors::{KeyferryError, Result};

/// Sentinel output path meaning "write to standard output".
pub const STDOUT_SENTINEL: &str = "-";

/// Where validated key material ends up. Resolved once before the batch
/// loop and only ever opened in append mode — never truncated, so separate
/// invocations against the same file accumulate.
#[derive(Debug)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// Resolve the destination from the CLI argument.
    ///
    /// With no explicit output this defaults to `~/.ssh/authorized_keys`,
    /// creating the directory (0700) and file (0600) if missing. Creation
    /// failures are fatal here, before any fetch begins. Pre-existing
    /// directories and files are left untouched, whatever their modes.
    pub fn resolve(output: Option<&str>) -> Result<Self> {
        match output {
            Some(STDOUT_SENTINEL) => Ok(Self::Stdout),
            Some(path) => Ok(Self::File(PathBuf::from(path))),
            None => Self::default_authorized_keys(),
        }
    }

    fn default_authorized_keys() -> Result<Self> {
        let home = dirs::home_dir().ok_or(KeyferryError::NoHomeDirectory)?;

        let ssh_dir = home.join(".ssh");
        if !ssh_dir.exists() {
            DirBuilder::new()
                .mode(0o700)
                .create(&ssh_dir)
                .map_err(|source| KeyferryError::DestinationSetup {
                    path: ssh_dir.clone(),
                    source,
                })?;
        }

        let path = ssh_dir.join("authorized_keys");
        if !path.exists() {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .mode(0o600)
                .open(&path)
                .map_err(|source| KeyferryError::DestinationSetup {
                    path: path.clone(),
                    source,
                })?;
        }

        Ok(Self::File(path))
    }

    /// Append validated, normalized key text. Any failure here is fatal to
    /// the whole run: an interrupted write leaves the destination state
    /// unverifiable.
    pub fn append(&self, text: &str) -> Result<()> {
        match self {
            Self::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(text.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|source| KeyferryError::WriteFailed {
                        target: "stdout".into(),
                        source,
                    })
            }
            Self::File(path) => OpenOptions::new()
                .append(true)
                .create(true)
                .mode(0o600)
                .open(path)
                .and_then(|mut file| file.write_all(text.as_bytes()))
                .map_err(|source| KeyferryError::WriteFailed {
                    target: path.display().to_string(),
                    source,
                }),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Stdout => "stdout".into(),
            Self::File(path) => path.display().to_string(),
        }
    }
}
