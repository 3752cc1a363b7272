//! Server-sent event decoding for streaming responses.
//!
//! Vendors stream newline-delimited `data: {json}` lines. Network chunks do not
//! respect line boundaries, so [`SseLineDecoder`] buffers raw bytes and only
//! decodes complete lines. Multi-byte characters split across chunks survive.
//! A `data: [DONE]` line ends the stream; so does the end of the body.

use crate::core_types::provider::TextStream;
use crate::error::LlmError;
use crate::logging::{log_debug, log_trace, log_warn};

use futures_util::{stream, Stream, StreamExt};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;

/// A meaningful line of an event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseLine {
    /// Payload of a `data:` line
    Data(String),
    /// The `[DONE]` sentinel
    Done,
}

/// Incremental line splitter for event-stream bodies.
#[derive(Debug, Default)]
pub(crate) struct SseLineDecoder {
    buffer: Vec<u8>,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseLine> {
        self.buffer.extend_from_slice(chunk);

        let Some(last_newline) = self.buffer.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };

        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        complete
            .split(|b| *b == b'\n')
            .filter_map(parse_line)
            .collect()
    }

    /// Flush a trailing line that was never newline-terminated.
    pub fn finish(&mut self) -> Vec<SseLine> {
        let remaining = std::mem::take(&mut self.buffer);
        parse_line(&remaining).into_iter().collect()
    }
}

fn parse_line(raw: &[u8]) -> Option<SseLine> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches('\r');
    let payload = line.strip_prefix("data:")?.trim_start();

    if payload.is_empty() {
        return None;
    }
    if payload.trim_end() == "[DONE]" {
        return Some(SseLine::Done);
    }
    Some(SseLine::Data(payload.to_string()))
}

struct SseState<S, X> {
    body: Pin<Box<S>>,
    decoder: SseLineDecoder,
    pending: VecDeque<String>,
    finished: bool,
    provider: &'static str,
    extract: X,
}

impl<S, X> SseState<S, X>
where
    X: Fn(&Value) -> Option<String>,
{
    fn absorb(&mut self, lines: Vec<SseLine>) {
        for line in lines {
            if self.finished {
                return;
            }
            match line {
                SseLine::Done => {
                    log_debug!(provider = self.provider, "Stream completed");
                    self.finished = true;
                }
                SseLine::Data(payload) => match serde_json::from_str::<Value>(&payload) {
                    Ok(event) => {
                        if let Some(text) = (self.extract)(&event).filter(|t| !t.is_empty()) {
                            log_trace!(provider = self.provider, chars = text.len(), "Stream chunk");
                            self.pending.push_back(text);
                        }
                    }
                    Err(e) => {
                        log_warn!(
                            provider = self.provider,
                            error = %e,
                            payload = %payload,
                            "Skipping malformed stream event"
                        );
                    }
                },
            }
        }
    }
}

/// Turn a byte stream of server-sent events into a stream of text chunks.
///
/// `extract` pulls the text out of one decoded event; events it returns `None`
/// (or an empty string) for are skipped.
pub(crate) fn sse_text_stream<S, B, E, X>(provider: &'static str, body: S, extract: X) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
    X: Fn(&Value) -> Option<String> + Send + 'static,
{
    let state = SseState {
        body: Box::pin(body),
        decoder: SseLineDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
        provider,
        extract,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(text) = state.pending.pop_front() {
                return Some((Ok(text), state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let lines = state.decoder.push(chunk.as_ref());
                    state.absorb(lines);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    let error = LlmError::network_fault(
                        state.provider,
                        None,
                        format!("Stream interrupted: {e}"),
                        None,
                    );
                    return Some((Err(error), state));
                }
                None => {
                    let lines = state.decoder.finish();
                    state.absorb(lines);
                    state.finished = true;
                }
            }
        }
    }))
}
