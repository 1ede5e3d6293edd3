use std::path::{Path, PathBuf};

/// Ordered set of loaded files plus the index of the one on screen.
///
/// Drop order is navigation order. Every change that supersedes in-flight
/// decode work (replacing the set, moving the index) bumps `generation`;
/// asynchronous completions carry the generation they were dispatched under
/// and are discarded when it no longer matches.
#[derive(Debug, Default)]
pub struct FileSet {
    files: Vec<PathBuf>,
    current: usize,
    generation: u64,
}

impl FileSet {
    /// Replaces the whole set and resets the index to the first file.
    ///
    /// An empty sequence is rejected without touching the existing set, so a
    /// drop that filtered down to nothing cannot clear a valid session.
    pub fn load(&mut self, files: Vec<PathBuf>) -> bool {
        if files.is_empty() {
            return false;
        }
        log::info!("Loaded file set with {} file(s)", files.len());
        self.files = files;
        self.current = 0;
        self.generation += 1;
        true
    }

    /// Moves to the next file. No-op (and `false`) at the last index.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.files.len() {
            self.current += 1;
            self.generation += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous file. No-op (and `false`) at index 0.
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            self.generation += 1;
            true
        } else {
            false
        }
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.files.get(self.current).map(PathBuf::as_path)
    }

    pub fn current_index(&self) -> Option<usize> {
        if self.files.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn load_resets_index_to_first_file() {
        let mut set = FileSet::default();
        assert!(set.load(paths(&["a.dcm", "b.dcm", "c.dcm"])));
        assert_eq!(set.current_index(), Some(0));
        assert!(set.next());
        assert!(set.load(paths(&["d.dcm", "e.dcm"])));
        assert_eq!(set.current_index(), Some(0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_load_keeps_previous_set() {
        let mut set = FileSet::default();
        assert!(set.load(paths(&["a.dcm"])));
        assert!(!set.load(Vec::new()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.current_path(), Some(Path::new("a.dcm")));
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut set = FileSet::default();
        set.load(paths(&["a.dcm", "b.dcm", "c.dcm"]));

        assert!(!set.previous());
        assert_eq!(set.current_index(), Some(0));

        assert!(set.next());
        assert!(set.next());
        assert!(!set.next());
        assert_eq!(set.current_index(), Some(2));

        // Repeated calls at the edge stay put.
        assert!(!set.next());
        assert_eq!(set.current_index(), Some(2));
    }

    #[test]
    fn empty_set_has_no_current_file() {
        let mut set = FileSet::default();
        assert_eq!(set.current_index(), None);
        assert_eq!(set.current_path(), None);
        assert!(!set.next());
        assert!(!set.previous());
        set.load(paths(&["a.dcm"]));
        assert_eq!(set.current_path(), Some(Path::new("a.dcm")));
    }

    #[test]
    fn generation_bumps_on_load_and_navigation_only() {
        let mut set = FileSet::default();
        set.load(paths(&["a.dcm", "b.dcm"]));
        let after_load = set.generation();

        assert!(set.next());
        assert!(set.generation() > after_load);

        let at_edge = set.generation();
        assert!(!set.next());
        assert_eq!(set.generation(), at_edge);

        set.load(paths(&["c.dcm"]));
        assert!(set.generation() > at_edge);
    }
}
