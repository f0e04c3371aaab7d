//! What went wrong.

use strum_macros::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    Unexpected,
    InvalidArgument,

    /// A node, adjacency or edge ID did not have the expected shape.
    MalformedId,
    /// A CIDR string did not parse.
    MalformedNetwork,
    /// No stock pipeline goes by the requested name.
    UnknownTopology,

    FileNotFound,
    PermissionDenied,
    IoFailed,

    SerializationFailed,
    DeserializationFailed,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::MalformedId.to_string(), "MalformedId");
        assert_eq!(ErrorKind::UnknownTopology.as_str(), "UnknownTopology");
    }
}
