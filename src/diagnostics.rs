// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Caller-supplied diagnostics sink.
//!
//! Construction, refinement and smoothing report progress and warnings
//! through a [`MeshLog`] handed in by the caller. The engine holds no global
//! logger state, so meshes built concurrently on separate threads never
//! contend on shared configuration.

use std::fmt::Arguments;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

/// Sink for engine diagnostics. Implement [`MeshLog::record`]; the leveled
/// helpers route through it after an [`MeshLog::enabled`] check so disabled
/// sinks skip formatting entirely.
pub trait MeshLog {
    fn record(&mut self, level: LogLevel, message: Arguments<'_>);

    fn enabled(&self, _level: LogLevel) -> bool {
        true
    }

    fn debug(&mut self, message: Arguments<'_>) {
        if self.enabled(LogLevel::Debug) {
            self.record(LogLevel::Debug, message);
        }
    }

    fn info(&mut self, message: Arguments<'_>) {
        if self.enabled(LogLevel::Info) {
            self.record(LogLevel::Info, message);
        }
    }

    fn warn(&mut self, message: Arguments<'_>) {
        if self.enabled(LogLevel::Warn) {
            self.record(LogLevel::Warn, message);
        }
    }
}

/// Discards every record; the default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl MeshLog for NullLog {
    fn record(&mut self, _level: LogLevel, _message: Arguments<'_>) {}

    fn enabled(&self, _level: LogLevel) -> bool {
        false
    }
}

/// Writes records to standard error, tagged with their level.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrLog;

impl MeshLog for StderrLog {
    fn record(&mut self, level: LogLevel, message: Arguments<'_>) {
        let tag = match level {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
        };
        eprintln!("[tessera {tag}] {message}");
    }
}

/// Forwards records to the `log` facade for callers already using it.
#[cfg(feature = "log")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

#[cfg(feature = "log")]
impl MeshLog for LogFacade {
    fn record(&mut self, level: LogLevel, message: Arguments<'_>) {
        log::log!(facade_level(level), "{message}");
    }

    fn enabled(&self, level: LogLevel) -> bool {
        log::log_enabled!(facade_level(level))
    }
}

#[cfg(feature = "log")]
fn facade_level(level: LogLevel) -> log::Level {
    match level {
        LogLevel::Debug => log::Level::Debug,
        LogLevel::Info => log::Level::Info,
        LogLevel::Warn => log::Level::Warn,
    }
}

/// Collects records in memory; used by tests to assert on warnings.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    pub records: Vec<(LogLevel, String)>,
}

impl MeshLog for MemoryLog {
    fn record(&mut self, level: LogLevel, message: Arguments<'_>) {
        self.records.push((level, message.to_string()));
    }
}

impl MemoryLog {
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}
