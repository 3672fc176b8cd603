//! Encode-and-send glue
//!
//! Labels are encoded before any transport is touched, so an encoding
//! failure never opens a connection.

use tracing::{info, instrument};

use crate::connection::{Connection, with_connection};
use crate::dialect::Dialect;
use crate::error::PrintResult;
use crate::label::Label;

/// Encode `label` with `dialect` and send it over `conn`
///
/// The connection is opened for the send and closed afterwards.
#[instrument(skip_all, fields(fields = label.len()))]
pub fn print_label<D, C>(label: &Label, dialect: &D, conn: &mut C) -> PrintResult<()>
where
    D: Dialect + ?Sized,
    C: Connection + ?Sized,
{
    let data = dialect.encode(label)?;
    with_connection(conn, |c| c.send(&data))?;
    info!(bytes = data.len(), "Print job sent");
    Ok(())
}

/// A dialect paired with the connection it prints to
pub struct PrintJob<D, C> {
    dialect: D,
    connection: C,
}

impl<D: Dialect, C: Connection> PrintJob<D, C> {
    pub fn new(dialect: D, connection: C) -> Self {
        Self {
            dialect,
            connection,
        }
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Print a single label
    pub fn print(&mut self, label: &Label) -> PrintResult<()> {
        print_label(label, &self.dialect, &mut self.connection)
    }

    /// Print several labels over one connection
    ///
    /// All labels are encoded up front; nothing is sent if any fails.
    #[instrument(skip_all, fields(labels = labels.len()))]
    pub fn print_all(&mut self, labels: &[Label]) -> PrintResult<()> {
        let payloads = labels
            .iter()
            .map(|label| self.dialect.encode(label))
            .collect::<PrintResult<Vec<_>>>()?;

        with_connection(&mut self.connection, |c| {
            payloads.iter().try_for_each(|data| c.send(data))
        })?;
        info!("Batch sent");
        Ok(())
    }

    pub fn into_parts(self) -> (D, C) {
        (self.dialect, self.connection)
    }
}
