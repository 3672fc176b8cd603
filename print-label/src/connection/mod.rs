//! Printer connections
//!
//! Supports:
//! - Writable streams (stdout by default, UTF-8 text)
//! - Filesystem paths (raw bytes)
//! - TCP/IP sockets (raw port printing, 9100 by default)
//!
//! Every connection starts closed. `open` and `close` are no-ops when the
//! connection is already in the requested state, and `send` fails with
//! [`PrintError::NotOpen`] unless the connection is open.

mod file;
mod stream;
mod tcp;

use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::error::{PrintError, PrintResult};

pub use file::FileConnection;
pub use stream::StreamConnection;
pub use tcp::{DEFAULT_PORT, TcpConnection};

pub(crate) use tcp::split_host_port;

/// Trait for printer connections
pub trait Connection {
    /// Acquire the underlying resource. No-op when already open.
    fn open(&mut self) -> PrintResult<()>;

    /// Release the underlying resource. No-op when already closed.
    fn close(&mut self) -> PrintResult<()>;

    /// Send a payload over the open connection
    fn send(&mut self, data: &[u8]) -> PrintResult<()>;

    /// Whether the connection is currently open
    fn is_open(&self) -> bool;

    /// Open the connection for the lifetime of the returned guard
    fn session(&mut self) -> PrintResult<Session<'_, Self>>
    where
        Self: Sized,
    {
        Session::open(self)
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn open(&mut self) -> PrintResult<()> {
        (**self).open()
    }

    fn close(&mut self) -> PrintResult<()> {
        (**self).close()
    }

    fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        (**self).send(data)
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

/// Open connection scoped to a guard
///
/// The connection is closed when the guard is dropped, on every exit path.
/// Use [`Session::finish`] to close explicitly and observe close errors.
pub struct Session<'a, C: Connection + ?Sized> {
    conn: &'a mut C,
    active: bool,
}

impl<'a, C: Connection + ?Sized> Session<'a, C> {
    /// Open `conn` and guard it
    pub fn open(conn: &'a mut C) -> PrintResult<Self> {
        conn.open()?;
        Ok(Self { conn, active: true })
    }

    /// Close the connection and report the result
    pub fn finish(mut self) -> PrintResult<()> {
        self.active = false;
        self.conn.close()
    }
}

impl<C: Connection + ?Sized> Deref for Session<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.conn
    }
}

impl<C: Connection + ?Sized> DerefMut for Session<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.conn
    }
}

impl<C: Connection + ?Sized> Drop for Session<'_, C> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(e) = self.conn.close() {
            warn!(error = %e, "Failed to close connection on scope exit");
        }
    }
}

/// Run `f` with `conn` open, closing it afterwards
///
/// An error from `f` takes precedence over an error from closing.
pub fn with_connection<C, T, F>(conn: &mut C, f: F) -> PrintResult<T>
where
    C: Connection + ?Sized,
    F: FnOnce(&mut C) -> PrintResult<T>,
{
    let mut session = Session::open(conn)?;
    let result = f(&mut session);
    let closed = session.finish();

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(e), _) | (Ok(_), Err(e)) => Err(e),
    }
}

pub(crate) fn ensure_open(is_open: bool) -> PrintResult<()> {
    if is_open {
        Ok(())
    } else {
        Err(PrintError::NotOpen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Connection that records lifecycle calls
    #[derive(Default)]
    struct Recorder {
        open: bool,
        opens: usize,
        closes: usize,
        sent: Vec<u8>,
        fail_close: bool,
    }

    impl Connection for Recorder {
        fn open(&mut self) -> PrintResult<()> {
            if !self.open {
                self.opens += 1;
                self.open = true;
            }
            Ok(())
        }

        fn close(&mut self) -> PrintResult<()> {
            if self.open {
                self.closes += 1;
                self.open = false;
                if self.fail_close {
                    return Err(PrintError::Io(std::io::Error::other("close failed")));
                }
            }
            Ok(())
        }

        fn send(&mut self, data: &[u8]) -> PrintResult<()> {
            ensure_open(self.open)?;
            self.sent.extend_from_slice(data);
            Ok(())
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }

    #[test]
    fn test_session_closes_on_drop() {
        let mut conn = Recorder::default();
        {
            let mut session = conn.session().unwrap();
            assert!(session.is_open());
            session.send(b"abc").unwrap();
        }
        assert!(!conn.is_open());
        assert_eq!(conn.opens, 1);
        assert_eq!(conn.closes, 1);
        assert_eq!(conn.sent, b"abc");
    }

    #[test]
    fn test_session_finish_closes_once() {
        let mut conn = Recorder::default();
        let session = conn.session().unwrap();
        session.finish().unwrap();
        assert_eq!(conn.closes, 1);
    }

    #[test]
    fn test_session_closes_on_error_path() {
        fn failing(conn: &mut Recorder) -> PrintResult<()> {
            let mut session = conn.session()?;
            session.send(b"partial")?;
            Err(PrintError::Encoding("late failure".into()))
        }

        let mut conn = Recorder::default();
        assert!(failing(&mut conn).is_err());
        assert!(!conn.is_open());
        assert_eq!(conn.closes, 1);
    }

    #[test]
    fn test_with_connection_prefers_body_error() {
        let mut conn = Recorder {
            fail_close: true,
            ..Default::default()
        };
        let err = with_connection(&mut conn, |_| -> PrintResult<()> {
            Err(PrintError::NotOpen)
        })
        .unwrap_err();
        assert!(err.is_not_open());

        let err = with_connection(&mut conn, |c| c.send(b"x")).unwrap_err();
        assert!(matches!(err, PrintError::Io(_)));
    }

    #[test]
    fn test_boxed_connection() {
        let mut conn: Box<dyn Connection> = Box::new(Recorder::default());
        assert!(conn.send(b"x").unwrap_err().is_not_open());
        with_connection(&mut conn, |c| c.send(b"x")).unwrap();
        assert!(!conn.is_open());
    }
}
