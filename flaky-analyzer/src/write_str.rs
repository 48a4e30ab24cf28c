// Copyright (c) The flaky-tracker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Support for string-only writes.
//!
//! Reports are always valid UTF-8, and are written either to a terminal or to an in-memory buffer.
//! [`WriteStr`] abstracts over both. It is similar to [`std::fmt::Write`], but returns
//! [`std::io::Error`] so that failures writing to stdout can be reported properly.

use std::{fmt, io};

/// A sink for UTF-8 output.
///
/// For more, see the [module-level documentation](self).
pub trait WriteStr {
    /// Writes `s` in full.
    fn write_str(&mut self, s: &str) -> io::Result<()>;

    /// Flushes any buffered output.
    fn write_str_flush(&mut self) -> io::Result<()>;

    /// Writes formatted output, so that `write!` and `writeln!` work on any `WriteStr`.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        // fmt::Write only reports that an error happened, so keep the I/O error around.
        struct Adapter<'a, T: ?Sized> {
            inner: &'a mut T,
            io_error: Option<io::Error>,
        }

        impl<T: ?Sized + WriteStr> fmt::Write for Adapter<'_, T> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.inner.write_str(s).map_err(|error| {
                    self.io_error = Some(error);
                    fmt::Error
                })
            }
        }

        let mut adapter = Adapter {
            inner: self,
            io_error: None,
        };
        fmt::write(&mut adapter, args).map_err(|_| {
            adapter
                .io_error
                .take()
                .unwrap_or_else(|| io::Error::other("formatting a report failed"))
        })
    }
}

impl WriteStr for String {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: WriteStr + ?Sized> WriteStr for &mut T {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        (**self).write_str(s)
    }

    fn write_str_flush(&mut self) -> io::Result<()> {
        (**self).write_str_flush()
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        (**self).write_fmt(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl WriteStr for ClosedPipe {
        fn write_str(&mut self, _s: &str) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn write_str_flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_fmt_keeps_io_error() {
        let error = writeln!(ClosedPipe, "{} flaky tests", 3).expect_err("writing fails");
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);

        let mut output = String::new();
        writeln!(output, "{} flaky tests", 3).unwrap();
        assert_eq!(output, "3 flaky tests\n");
    }
}
