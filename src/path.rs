/*!
 * Remote path normalization
 */

use std::fmt;

/// An absolute, slash-separated remote path
///
/// Empty and `.` segments are dropped, `..` pops the previous segment and a
/// trailing slash carries no meaning. The root is `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    segments: Vec<String>,
}

impl NormalizedPath {
    /// The root path `/`
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Normalize any user-supplied path; relative paths are taken from the root
    pub fn new(path: &str) -> Self {
        let mut segments: Vec<String> = Vec::new();

        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other.to_string()),
            }
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Parent path; the root is its own parent
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// Last segment, if any
    pub fn basename(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Append a segment
    pub fn join(&self, name: &str) -> Self {
        let mut joined = self.clone();
        joined.segments.extend(Self::new(name).segments);
        joined
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

impl From<&str> for NormalizedPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Split a file name into name and extension the way the drive stores them
pub fn parse_name(file_name: &str) -> (String, Option<String>) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < file_name.len() => (
            file_name[..pos].to_string(),
            Some(file_name[pos + 1..].to_string()),
        ),
        _ => (file_name.to_string(), None),
    }
}
