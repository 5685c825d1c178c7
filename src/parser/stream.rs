use std::io::{self, BufRead};

/// Line-at-a-time reader over a run log.
///
/// Lines come back without their `\n` / `\r\n` terminator. Bytes that are not
/// valid UTF-8 are replaced rather than failing the pass, since such lines can
/// never match a sensor pattern anyway.
pub struct LogLineStream<R> {
    reader: R,
    buf: Vec<u8>,
    pub line_number: usize,
    pub eof: bool,
}

impl<R: BufRead> LogLineStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(128),
            line_number: 0,
            eof: false,
        }
    }

    /// Read the next line, `Ok(None)` at end of file
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.eof {
            return Ok(None);
        }

        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            self.eof = true;
            return Ok(None);
        }
        self.line_number += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}
