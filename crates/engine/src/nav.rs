use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped inside a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Build the navigation link for a child folder.
///
/// The result is `<base>/<grant_id>[/<sub_path segments>]/<name>` with every
/// segment percent-encoded. A trailing `/` on `sub_path` is dropped first.
pub fn folder_url(base_url: &str, grant_id: &str, sub_path: &str, name: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_owned();
    push_segment(&mut url, grant_id);

    let sub_path = sub_path.trim_end_matches('/');
    if !sub_path.is_empty() {
        for segment in sub_path.split('/') {
            push_segment(&mut url, segment);
        }
    }

    push_segment(&mut url, name);
    url
}

fn push_segment(url: &mut String, segment: &str) {
    url.push('/');
    url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
}
