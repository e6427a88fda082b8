use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::error::DeliveryError;

/// A finished export, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// `invoice-<invoice_number>.<extension>`, with the number used verbatim.
pub fn artifact_filename(invoice_number: &str, extension: &str) -> String {
    format!("invoice-{invoice_number}.{extension}")
}

/// The host's download / file-save mechanism.
pub trait Delivery: Send + Sync {
    fn deliver(&self, artifact: &Artifact) -> Result<(), DeliveryError>;
}

/// Saves artifacts into a directory, replacing any file of the same name.
///
/// The file appears complete or not at all.
#[derive(Debug, Clone)]
pub struct SaveToDirectory {
    dir: PathBuf,
}

impl SaveToDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Delivery for SaveToDirectory {
    fn deliver(&self, artifact: &Artifact) -> Result<(), DeliveryError> {
        // Invoice numbers are free text; refuse anything that would escape
        // the target directory.
        let is_plain_name = Path::new(&artifact.filename)
            .file_name()
            .is_some_and(|name| name == artifact.filename.as_str());
        if !is_plain_name {
            return Err(DeliveryError::InvalidName(artifact.filename.clone()));
        }

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&artifact.bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.dir.join(&artifact.filename))
            .map_err(|e| DeliveryError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(filename: &str) -> Artifact {
        Artifact {
            filename: filename.to_string(),
            bytes: b"%PDF-1.5".to_vec(),
            page_count: 1,
        }
    }

    #[test]
    fn filename_uses_number_verbatim() {
        assert_eq!(artifact_filename("INV-001", "pdf"), "invoice-INV-001.pdf");
        assert_eq!(artifact_filename("2024 #7", "pdf"), "invoice-2024 #7.pdf");
    }

    #[test]
    fn saves_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = SaveToDirectory::new(dir.path());
        target.deliver(&artifact("invoice-INV-001.pdf")).unwrap();
        let written = std::fs::read(dir.path().join("invoice-INV-001.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.5");
    }

    #[test]
    fn rejects_path_separators() {
        let dir = tempfile::tempdir().unwrap();
        let target = SaveToDirectory::new(dir.path());
        assert!(matches!(
            target.deliver(&artifact("invoice-../../etc.pdf")),
            Err(DeliveryError::InvalidName(_))
        ));
    }
}
