use crate::error::{ErrorKind, PaymentError};
use serde::Serialize;
use std::io::{self, Write};

/// Structured error handed to callers: a stable kind plus a readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl From<&PaymentError> for ErrorBody {
    fn from(error: &PaymentError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }
}

/// `{ "status": true, "result": ... }` or `{ "status": false, "error": ... }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(result: T) -> Self {
        Self {
            status: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: &PaymentError) -> Self {
        Self {
            status: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Writes response envelopes as one JSON document per line.
pub struct ResponseWriter<W: Write> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_outcome<T: Serialize>(
        &mut self,
        outcome: &Result<T, PaymentError>,
    ) -> io::Result<()> {
        match outcome {
            Ok(result) => self.write(&Envelope::success(result)),
            Err(error) => self.write(&Envelope::<()>::failure(error)),
        }
    }

    fn write<T: Serialize>(&mut self, envelope: &Envelope<T>) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, envelope)?;
        writeln!(self.writer)?;
        self.writer.flush()
    }
}
