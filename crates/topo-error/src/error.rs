//! The error type shared by every topo crate.

use std::fmt;

use crate::ErrorKind;

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

pub struct Error {
    kind: ErrorKind,
    message: String,
    /// Innermost-last name of the failing operation, e.g. `report::from_json`.
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Source>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Name the operation that failed. An operation set earlier is kept in
    /// the context under `called`.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Attach the underlying error. Only one source may be set.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.operation.is_empty() {
            write!(f, "{}: ", self.operation)?;
        }
        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        for (i, (key, value)) in self.context.iter().enumerate() {
            let sep = if i == 0 { " (" } else { ", " };
            write!(f, "{sep}{key}={value}")?;
        }
        if !self.context.is_empty() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Error");
        out.field("kind", &self.kind)
            .field("operation", &self.operation)
            .field("message", &self.message);
        if !self.context.is_empty() {
            out.field("context", &self.context);
        }
        if let Some(source) = &self.source {
            out.field("source", source);
        }
        out.finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let kind = if err.is_io() {
            ErrorKind::IoFailed
        } else {
            ErrorKind::DeserializationFailed
        };
        Error::new(kind, err.to_string())
            .with_operation("json")
            .set_source(err)
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::unexpected(message)
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::unexpected(message)
    }
}

impl Error {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// `what` names the ID flavour, e.g. "edge ID".
    pub fn malformed_id(what: &'static str, id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(ErrorKind::MalformedId, format!("bad {what} '{id}'")).with_context("id", id)
    }

    pub fn malformed_network(cidr: impl Into<String>) -> Self {
        let cidr = cidr.into();
        Self::new(ErrorKind::MalformedNetwork, format!("'{cidr}' is not a network"))
            .with_context("cidr", cidr)
    }

    pub fn unknown_topology(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(ErrorKind::UnknownTopology, format!("no topology named '{name}'"))
            .with_context("topology", name)
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(ErrorKind::FileNotFound, format!("'{path}' does not exist"))
            .with_context("path", path)
    }

    pub fn serialization_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializationFailed, message)
    }

    pub fn deserialization_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DeserializationFailed, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_new() {
        let err = Error::new(ErrorKind::MalformedId, "missing prefix");
        assert_eq!(err.kind(), ErrorKind::MalformedId);
        assert_eq!(err.message(), "missing prefix");
        assert_eq!(err.operation(), "");
        assert!(err.context().is_empty());
    }

    #[test]
    fn test_operations_stack_into_context() {
        let err = Error::malformed_id("edge ID", "a-b")
            .with_operation("report::parse_edge_id")
            .with_operation("render::LeafMap::edge_metadata");

        assert_eq!(err.operation(), "render::LeafMap::edge_metadata");
        assert_eq!(
            err.context(),
            &[
                ("id", "a-b".to_string()),
                ("called", "report::parse_edge_id".to_string())
            ]
        );
    }

    #[test]
    fn test_display() {
        let err = Error::malformed_network("10.0.0.0/40").with_operation("report::networks");
        assert_eq!(
            err.to_string(),
            "report::networks: MalformedNetwork: '10.0.0.0/40' is not a network (cidr=10.0.0.0/40)"
        );

        let err = Error::new(ErrorKind::IoFailed, "short read");
        assert_eq!(err.to_string(), "IoFailed: short read");
    }

    #[test]
    fn test_debug_lists_set_fields() {
        let err = Error::new(ErrorKind::IoFailed, "short read").with_operation("report::from_reader");
        assert_eq!(
            format!("{err:?}"),
            r#"Error { kind: IoFailed, operation: "report::from_reader", message: "short read" }"#
        );
    }

    #[test]
    fn test_from_json_error_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(json_err);
        assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
        assert_eq!(err.operation(), "json");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_io_error() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert_eq!(err.operation(), "io");
    }
}
