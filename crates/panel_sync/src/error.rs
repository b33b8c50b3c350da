use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dbus connection error")]
    DbusError(#[from] zbus::Error),
    #[error("Signal {0} carried a payload that was not understood")]
    MalformedSignal(String, #[source] zbus::Error),
    #[error("Panel service did not answer SyncOne within {0:?}")]
    SyncTimeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, Error>;
