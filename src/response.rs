//! The result object printed on stdout.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// Outcome of a completed HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseResult {
    pub ok: bool,
    pub status: u16,
    pub body: String,
}

impl ResponseResult {
    pub fn new(status: u16, body: String) -> ResponseResult {
        ResponseResult { ok: (200..300).contains(&status), status, body }
    }

    pub fn exit_code(&self) -> i32 {
        if self.ok {
            crate::errors::EXIT_OK
        } else {
            crate::errors::EXIT_HTTP_ERROR
        }
    }

    /// Renders `{"ok": .., "status": .., "body": ..}` with spaced separators
    /// and ASCII-only output, the shape existing callers already parse.
    pub fn to_json(&self) -> io::Result<String> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn write_to<W: Write>(&self, writer: W) -> io::Result<()> {
        let mut ser = Serializer::with_formatter(writer, SpacedAsciiFormatter);
        self.serialize(&mut ser)?;
        let mut writer = ser.into_inner();
        writer.flush()
    }
}

/// `", "` and `": "` separators, every char outside printable ASCII as `\uXXXX`.
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
