use std::collections::HashSet;

use folio_store::ObjectSummary;
use tracing::{debug, warn};

/// An immediate file child, waiting for its signed link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChild {
    /// Name relative to the query prefix (no `/`).
    pub name: String,
    /// Full object key to sign.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
}

/// Result of classifying every key under one query prefix.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classified {
    /// Unique immediate folder names, in first-seen order.
    pub folders: Vec<String>,
    /// Immediate files, in listing order.
    pub files: Vec<FileChild>,
}

/// Splits listed keys into immediate files and immediate folders.
///
/// One classifier lives for exactly one listing request and is fed every
/// page in turn, so a folder whose objects span several pages is reported
/// once.
#[derive(Debug)]
pub struct ChildClassifier<'p> {
    query_prefix: &'p str,
    seen: HashSet<String>,
    out: Classified,
}

impl<'p> ChildClassifier<'p> {
    pub fn new(query_prefix: &'p str) -> Self {
        Self {
            query_prefix,
            seen: HashSet::new(),
            out: Classified::default(),
        }
    }

    /// Classify one listed object.
    pub fn observe(&mut self, object: ObjectSummary) {
        if !object.key.starts_with(self.query_prefix) {
            warn!(
                key = %object.key,
                prefix = %self.query_prefix,
                "listed key outside query prefix, skipping"
            );
            return;
        }
        // In bounds and on a char boundary: the key starts with the prefix.
        let Some(relative) = object.key.get(self.query_prefix.len()..) else {
            return;
        };

        if relative.is_empty() {
            debug!(key = %object.key, "skipping folder marker");
            return;
        }

        match relative.find('/') {
            None => {
                let name = relative.to_owned();
                self.out.files.push(FileChild {
                    name,
                    key: object.key,
                    size: object.size,
                });
            }
            Some(0) => {
                // `prefix//...` has no nameable folder one level down.
                debug!(key = %object.key, "skipping key with empty folder segment");
            }
            Some(idx) => {
                let name = &relative[..idx];
                if !self.seen.contains(name) {
                    debug!(folder = %name, "new folder");
                    self.seen.insert(name.to_owned());
                    self.out.folders.push(name.to_owned());
                }
            }
        }
    }

    /// Finish the request and hand back everything classified.
    pub fn finish(self) -> Classified {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(prefix: &str, keys: &[&str]) -> Classified {
        let mut classifier = ChildClassifier::new(prefix);
        for key in keys {
            classifier.observe(ObjectSummary::new(*key, 7));
        }
        classifier.finish()
    }

    fn file_names(c: &Classified) -> Vec<&str> {
        c.files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn splits_files_and_folders() {
        let out = classify("root/", &["root/a.txt", "root/sub/b.txt", "root/c.txt"]);
        assert_eq!(out.folders, vec!["sub"]);
        assert_eq!(file_names(&out), vec!["a.txt", "c.txt"]);
        assert_eq!(out.files[0].key, "root/a.txt");
        assert_eq!(out.files[0].size, 7);
    }

    #[test]
    fn deep_keys_collapse_into_one_folder() {
        let out = classify(
            "root/",
            &["root/x/1/2/3.txt", "root/x/4.txt", "root/x/", "root/x/y/"],
        );
        assert_eq!(out.folders, vec!["x"]);
        assert!(out.files.is_empty());
    }

    #[test]
    fn folder_marker_is_skipped() {
        let out = classify("root/", &["root/"]);
        assert_eq!(out, Classified::default());
    }

    #[test]
    fn keys_outside_the_prefix_are_ignored() {
        let out = classify("a/b/", &["a/bc/x", "a/b/ok.txt"]);
        assert_eq!(file_names(&out), vec!["ok.txt"]);
        assert!(out.folders.is_empty());
    }

    #[test]
    fn dedup_survives_interleaving() {
        let out = classify("r/", &["r/b/1", "r/a/1", "r/b/2", "r/a/2", "r/b/3"]);
        assert_eq!(out.folders, vec!["b", "a"]);
    }

    #[test]
    fn multibyte_names_are_split_on_char_boundaries() {
        let out = classify("été/", &["été/résumé.pdf", "été/über/x"]);
        assert_eq!(file_names(&out), vec!["résumé.pdf"]);
        assert_eq!(out.folders, vec!["über"]);
    }

    #[test]
    fn empty_folder_segment_is_skipped() {
        let out = classify("root/", &["root//x", "root//y/z", "root/sub//w", "root/f"]);
        assert_eq!(out.folders, vec!["sub"]);
        assert_eq!(file_names(&out), vec!["f"]);
    }
}
