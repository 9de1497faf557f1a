//! Dot-path resolution into a [`serde_json::Value`], e.g. `user.addresses[0].city`.

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Parses `a.b[0].c` into its key/index segments.
fn parse_segments(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        if part.is_empty() {
            continue;
        }
        let mut remainder = part;
        if let Some(bracket) = remainder.find('[') {
            let key = &remainder[..bracket];
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            remainder = &remainder[bracket..];
            while let Some(end) = remainder.find(']') {
                let index_str = &remainder[1..end];
                if let Ok(index) = index_str.parse::<usize>() {
                    segments.push(Segment::Index(index));
                }
                remainder = &remainder[end + 1..];
                if !remainder.starts_with('[') {
                    break;
                }
            }
        } else {
            segments.push(Segment::Key(remainder.to_string()));
        }
    }
    segments
}

/// Resolves a dot path against a JSON value, returning `None` for any
/// missing or out-of-range segment.
pub fn resolve<'a>(root: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let segments = parse_segments(path);
    let mut current = root;
    for segment in &segments {
        current = match segment {
            Segment::Key(key) => current.get(key)?,
            Segment::Index(index) => current.get(index)?,
        };
    }
    Some(current)
}
