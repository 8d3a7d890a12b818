use std::fmt;

/// A parse error from a Wavefront `.obj` source.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjError {
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: usize,
}

impl ObjError {
    pub(crate) fn new(msg: impl Into<String>, line: usize) -> Self {
        Self { message: msg.into(), line }
    }
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj parse error at line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ObjError {}
