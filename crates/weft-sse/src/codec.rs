//! Frame encoding and decoding.

use crate::error::{SseError, SseResult};
use crate::event::Event;

/// Serialize one event as a complete frame, terminated by a blank line.
///
/// Multi-line data is written as one `data:` line per line; `\r\n` and
/// lone `\r` inside data come back as `\n` when decoded.
pub fn encode(event: &Event) -> String {
    let mut out = String::with_capacity(event.data.len() + 16);
    if let Some(id) = &event.id {
        push_field(&mut out, "id", id);
    }
    if let Some(kind) = &event.event {
        push_field(&mut out, "event", kind);
    }
    if let Some(retry) = event.retry {
        push_field(&mut out, "retry", &retry.to_string());
    }
    for line in split_lines(&event.data) {
        push_field(&mut out, "data", line);
    }
    out.push('\n');
    out
}

/// Serialize a comment-only frame, typically used as a keep-alive.
///
/// Decoders skip these frames entirely.
pub fn encode_comment(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    for line in split_lines(text) {
        out.push(':');
        if !line.is_empty() {
            out.push(' ');
            out.push_str(line);
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Decode the first complete event in `input`.
///
/// Returns the event and the unconsumed remainder, or `None` when `input`
/// does not yet hold a complete frame. Comment lines and unknown fields are
/// ignored, and frames carrying no fields at all are skipped.
pub fn decode(input: &str) -> Option<(Event, &str)> {
    let mut offset = 0;
    loop {
        let (event, used) = decode_frame(&input[offset..])?;
        offset += used;
        if let Some(event) = event {
            return Some((event, &input[offset..]));
        }
    }
}

/// Decode the first blank-line terminated block of `input`.
///
/// Returns the event it carries, if any, and the number of bytes the block
/// took up including its terminator. `None` means no complete block yet.
fn decode_frame(input: &str) -> Option<(Option<Event>, usize)> {
    let mut frame = Frame::default();
    let mut rest = input;
    loop {
        let (line, after) = next_line(rest)?;
        rest = after;
        if line.is_empty() {
            break;
        }
        frame.apply(line);
    }
    Some((frame.finish(), input.len() - rest.len()))
}

/// Incremental decoder over a growing text buffer.
///
/// Feed it chunks as they arrive and drain completed events through
/// [`next_event`](Decoder::next_event) or the `Iterator` impl.
#[derive(Debug, Default)]
pub struct Decoder {
    buf: String,
    pending: Vec<u8>,
    consumed: usize,
    /// The last block ended on a `\r` at the end of the buffer, so a `\n`
    /// opening the next chunk belongs to that terminator.
    skip_lf: bool,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &str) {
        self.append(chunk);
    }

    /// Append raw bytes. A UTF-8 sequence split across chunks is held back
    /// until the rest of it arrives.
    pub fn push_bytes(&mut self, chunk: &[u8]) -> SseResult<()> {
        self.pending.extend_from_slice(chunk);
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                let offset = self.consumed + e.valid_up_to();
                self.pending.clear();
                return Err(SseError::InvalidUtf8 { offset });
            }
        };
        let complete: Vec<u8> = self.pending.drain(..valid).collect();
        self.consumed += valid;
        // The prefix was validated above.
        self.append(std::str::from_utf8(&complete).unwrap_or_default());
        Ok(())
    }

    fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let text = if std::mem::take(&mut self.skip_lf) {
            text.strip_prefix('\n').unwrap_or(text)
        } else {
            text
        };
        self.buf.push_str(text);
    }

    /// Next complete event. Comment-only and empty blocks in front of it
    /// are dropped from the buffer on the way.
    pub fn next_event(&mut self) -> Option<Event> {
        loop {
            let (event, used) = decode_frame(&self.buf)?;
            let ends_in_cr = self.buf[..used].ends_with('\r');
            self.buf.drain(..used);
            self.skip_lf = ends_in_cr && self.buf.is_empty();
            if event.is_some() {
                return event;
            }
        }
    }

    /// Text received but not yet part of a complete frame.
    pub fn buffered(&self) -> &str {
        &self.buf
    }
}

impl Iterator for Decoder {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.next_event()
    }
}

#[derive(Default)]
struct Frame {
    id: Option<String>,
    event: Option<String>,
    data: Vec<String>,
    retry: Option<u64>,
    seen: bool,
}

impl Frame {
    fn apply(&mut self, line: &str) {
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "id" if !value.contains('\0') => self.id = Some(value.to_string()),
            "retry" => match value.parse::<u64>() {
                Ok(millis) if value.bytes().all(|b| b.is_ascii_digit()) => {
                    self.retry = Some(millis)
                }
                _ => return,
            },
            _ => return,
        }
        self.seen = true;
    }

    fn finish(self) -> Option<Event> {
        if !self.seen {
            return None;
        }
        Some(Event {
            id: self.id,
            event: self.event,
            data: self.data.join("\n"),
            retry: self.retry,
        })
    }
}

fn push_field(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

/// Split on `\r\n`, `\n` or `\r`, keeping empty lines (including a trailing one).
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(end) = rest.find(['\r', '\n']) {
        lines.push(&rest[..end]);
        rest = skip_terminator(&rest[end..]);
    }
    lines.push(rest);
    lines
}

/// Next terminated line and the text after its terminator.
///
/// A `\r` ends the line as soon as it is seen; a `\n` right after it is
/// part of the same terminator.
fn next_line(input: &str) -> Option<(&str, &str)> {
    let end = input.find(['\r', '\n'])?;
    Some((&input[..end], skip_terminator(&input[end..])))
}

fn skip_terminator(tail: &str) -> &str {
    tail.strip_prefix("\r\n").unwrap_or(&tail[1..])
}
