//! Serialized writer for SQLite mutations.
//!
//! All writes funnel through a single background thread, so the database
//! never sees two concurrent writers. Each job runs inside one immediate
//! transaction.

use std::thread;

use diesel::prelude::*;
use tokio::sync::{mpsc, oneshot};

use avisos_core::errors::{DatabaseError, Error, Result};

use super::DbPool;
use crate::errors::StorageError;

type WriteJob = Box<dyn FnOnce(&mut SqliteConnection) + Send + 'static>;

/// Either an application-level failure from the job or a transaction-control
/// failure from diesel itself.
enum TxError {
    App(Error),
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        TxError::Db(err)
    }
}

impl TxError {
    fn into_error(self) -> Error {
        match self {
            TxError::App(err) => err,
            TxError::Db(err) => StorageError::from(err).into(),
        }
    }
}

#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::UnboundedSender<WriteJob>,
}

impl WriteHandle {
    /// Runs a job on the writer thread inside one immediate transaction and
    /// returns its result. A job error rolls the transaction back.
    pub async fn exec<T, F>(&self, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();

        let wrapped: WriteJob = Box::new(move |conn| {
            let outcome = conn
                .immediate_transaction::<_, TxError, _>(|tx| job(tx).map_err(TxError::App))
                .map_err(TxError::into_error);
            let _ = done_tx.send(outcome);
        });

        self.tx.send(wrapped).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Write actor is no longer running".to_string(),
            ))
        })?;

        done_rx.await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Write actor dropped the job".to_string(),
            ))
        })?
    }
}

/// Spawns the writer thread over its own pooled connections.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<WriteJob>();

    thread::spawn(move || {
        while let Some(job) = rx.blocking_recv() {
            match pool.get() {
                Ok(mut conn) => job(&mut conn),
                Err(err) => {
                    // The caller sees the dropped oneshot as a generic failure.
                    log::error!("write actor could not obtain a connection: {err}");
                }
            }
        }
    });

    WriteHandle { tx }
}
