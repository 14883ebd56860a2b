use std::cmp::Ordering;

use folio_core::Entry;

/// Order entries folders first, then by byte-wise ascending name.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(compare);
}

fn compare(a: &Entry, b: &Entry) -> Ordering {
    b.is_folder
        .cmp(&a.is_folder)
        .then_with(|| a.relative_path.as_bytes().cmp(b.relative_path.as_bytes()))
}
