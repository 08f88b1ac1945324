//! Observability hook shared by the parser and the evaluator.
//!
//! A [`TraceSink`] receives structured events while source text is tokenized,
//! parsed and evaluated. Sinks are purely diagnostic: nothing they do can
//! change the outcome of a parse or an evaluation.

use crate::ast::Statement;
use crate::lexer::Token;

#[derive(Debug)]
pub enum TraceEvent<'a> {
    TokenProduced(&'a Token),
    StatementParsed(&'a Statement),
    NodeEvaluated {
        kind: &'static str,
        result: &'a str,
    },
}

pub trait TraceSink {
    fn record(&mut self, event: TraceEvent<'_>);

    /// Whether events will be used at all. Producers skip building
    /// expensive event payloads (such as result summaries) when this is
    /// `false`.
    fn enabled(&self) -> bool {
        true
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl TraceSink for NoopTracer {
    fn record(&mut self, _event: TraceEvent<'_>) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// Forwards events to the `tracing` facade at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl TraceSink for LogTracer {
    fn record(&mut self, event: TraceEvent<'_>) {
        match event {
            TraceEvent::TokenProduced(token) => {
                tracing::trace!(target: "ember::trace", line = token.line, kind = ?token.kind, "token produced")
            }
            TraceEvent::StatementParsed(statement) => {
                tracing::trace!(target: "ember::trace", %statement, "statement parsed")
            }
            TraceEvent::NodeEvaluated { kind, result } => {
                tracing::trace!(target: "ember::trace", kind, result, "node evaluated")
            }
        }
    }

    fn enabled(&self) -> bool {
        tracing::enabled!(target: "ember::trace", tracing::Level::TRACE)
    }
}

/// Keeps every event as an owned line of text, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingTracer {
    pub events: Vec<String>,
}

impl TraceSink for RecordingTracer {
    fn record(&mut self, event: TraceEvent<'_>) {
        let line = match event {
            TraceEvent::TokenProduced(token) => format!("token {}", token.kind),
            TraceEvent::StatementParsed(statement) => format!("statement {}", statement),
            TraceEvent::NodeEvaluated { kind, result } => format!("{} => {}", kind, result),
        };
        self.events.push(line);
    }
}
