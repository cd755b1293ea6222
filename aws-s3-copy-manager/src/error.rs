/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::ProvideErrorMetadata;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    code: Option<String>,
    source: BoxError,
    abort_error: Option<Box<Error>>,
}

/// General categories of copy errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Operation input validation issues (malformed source/target, invalid option)
    InputInvalid,

    /// A multipart copy was requested for an object smaller than the minimum part size
    SizeTooSmall,

    /// Resource not found (e.g. bucket, key, multipart upload ID not found)
    NotFound,

    /// The storage backend rejected a request
    BackendError,

    /// Some kind of internal runtime issue (e.g. task failure)
    RuntimeError,
}

impl Error {
    /// Creates a new copy [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            code: None,
            source: err.into(),
            abort_error: None,
        }
    }

    /// Creates a new backend [`Error`] carrying the backend's own error code.
    ///
    /// Codes that denote a missing resource are classified as [`ErrorKind::NotFound`].
    pub fn backend<E>(code: impl Into<String>, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        let code = code.into();
        Error {
            kind: kind_for_code(Some(&code)),
            code: Some(code),
            source: err.into(),
            abort_error: None,
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The error code reported by the backend, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The failure of the `AbortMultipartUpload` request issued while cleaning up after this
    /// error, if that request failed as well.
    pub fn abort_error(&self) -> Option<&Error> {
        self.abort_error.as_deref()
    }

    pub(crate) fn with_abort_error(mut self, abort_error: Error) -> Self {
        self.abort_error = Some(Box::new(abort_error));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::SizeTooSmall => write!(f, "object too small for a multipart copy"),
            ErrorKind::NotFound => write!(f, "resource not found"),
            ErrorKind::BackendError => match &self.code {
                Some(code) => write!(f, "backend request failed ({code})"),
                None => write!(f, "backend request failed"),
            },
            ErrorKind::RuntimeError => write!(f, "runtime error"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::new(ErrorKind::RuntimeError, value)
    }
}

impl From<aws_smithy_types::error::operation::BuildError> for Error {
    fn from(value: aws_smithy_types::error::operation::BuildError) -> Self {
        Self::new(ErrorKind::InputInvalid, value)
    }
}

impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    fn from(value: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        let code = value.code().map(str::to_owned);
        Error {
            kind: kind_for_code(code.as_deref()),
            code,
            source: value.into(),
            abort_error: None,
        }
    }
}

fn kind_for_code(code: Option<&str>) -> ErrorKind {
    match code {
        Some("NotFound" | "NoSuchKey" | "NoSuchUpload" | "NoSuchBucket") => ErrorKind::NotFound,
        _ => ErrorKind::BackendError,
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn size_too_small(size: u64) -> Error {
    Error::new(
        ErrorKind::SizeTooSmall,
        format!("unable to multipart copy objects smaller than 5MB (object size: {size} bytes)"),
    )
}

pub(crate) fn missing_field(operation: &str, field: &str) -> Error {
    Error::new(
        ErrorKind::BackendError,
        format!("{operation} response did not include `{field}`"),
    )
}

#[cfg(test)]
mod test {
    use super::{Error, ErrorKind};
    use std::error::Error as _;

    #[test]
    fn test_backend_codes_classified() {
        let err = Error::backend("NoSuchKey", "the key does not exist");
        assert_eq!(&ErrorKind::NotFound, err.kind());
        assert_eq!(Some("NoSuchKey"), err.code());

        let err = Error::backend("AccessDenied", "denied");
        assert_eq!(&ErrorKind::BackendError, err.kind());
        assert_eq!("backend request failed (AccessDenied)", err.to_string());
    }

    #[test]
    fn test_abort_error_does_not_replace_source() {
        let err = Error::backend("InternalError", "part copy failed")
            .with_abort_error(Error::backend("SlowDown", "abort failed"));
        assert_eq!(Some("InternalError"), err.code());
        assert_eq!("part copy failed", err.source().unwrap().to_string());
        assert_eq!(Some("SlowDown"), err.abort_error().and_then(Error::code));
    }
}
