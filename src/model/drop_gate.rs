use std::path::{Path, PathBuf};

const ACCEPTED_EXTENSIONS: &[&str] = &["dcm", "dicom"];

/// Reassembles per-file drop events into a single batch.
///
/// The window layer reports a drop one path at a time, preceded by one hover
/// event per file. The gate counts the hovered files, collects the dropped
/// ones, and commits the batch once every expected file has arrived. Files
/// with an unaccepted extension are filtered out silently; a batch that
/// filters down to nothing is never committed.
#[derive(Debug, Default)]
pub struct DropGate {
    expected: usize,
    received: usize,
    accepted: Vec<PathBuf>,
}

impl DropGate {
    pub fn file_hovered(&mut self) {
        self.expected += 1;
    }

    pub fn hover_cleared(&mut self) {
        *self = Self::default();
    }

    /// Records one dropped file; returns the full batch once complete.
    ///
    /// When no hover events were seen (some platforms omit them) each drop
    /// commits on its own.
    pub fn file_dropped(&mut self, path: PathBuf) -> Option<Vec<PathBuf>> {
        if is_dicom_file(&path) {
            self.accepted.push(path);
        } else {
            log::debug!("Ignoring dropped non-DICOM file: {}", path.display());
        }
        self.received += 1;

        if self.received < self.expected {
            return None;
        }

        let batch = std::mem::take(&mut self.accepted);
        *self = Self::default();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

/// Accepted-extension filter shared by the drop gate and the file picker.
pub fn is_dicom_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}
