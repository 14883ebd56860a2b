/// Combine a grant's root prefix with a caller's virtual sub-path into the
/// prefix sent to the object store.
///
/// The sub-path is appended literally after `root_prefix + "/"`. The result
/// always ends in `/`, so a listing of `report` never matches `report2/x`.
pub fn resolve_query_prefix(root_prefix: &str, sub_path: &str) -> String {
    let mut prefix = String::with_capacity(root_prefix.len() + sub_path.len() + 2);
    prefix.push_str(root_prefix);
    if !sub_path.is_empty() {
        prefix.push('/');
        prefix.push_str(sub_path);
    }
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}
