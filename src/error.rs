//! definition of the general error type used across this crate

use core::fmt;
use std::sync::Arc;

/**
    general object reporting an unexpected result in the communication with slaves

    Its variants are meant to help finding which side of the communication is responsible for the problem and whether retrying makes sense.

    [Self::Slave] should not be used without an appropriate type for `T`: `T` depends on the operation the slave reports for, and is usually an error code (an SDO abort code, an IDN error code, ...)
*/
#[derive(Clone, Debug)]
pub enum EthercatError<T=()> {
    /// error caused by the communication support (socket, char device, ...)
    ///
    /// these errors are exterior to this library
    Io(Arc<std::io::Error>),

    /// error reported by a slave, its type depends on the operation returning this error
    ///
    /// these errors can generally be handled by reconfiguring the slave or tolerating the failed operation
    Slave(T),

    /// error reported by the underlying master implementation
    Master(&'static str),

    /// error detected in what came back from the bus (wrong sizes, inconsistent answers)
    Protocol(&'static str),

    /// error is due to too much time elapsed, the operation can generally be retried
    Timeout(&'static str),
}

/// convenient alias to simplify return annotations
pub type EthercatResult<T=(), E=()> = core::result::Result<T, EthercatError<E>>;

impl<T: fmt::Debug> fmt::Display for EthercatError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Slave(code) => write!(f, "slave error: {:?}", code),
            Self::Master(msg) => write!(f, "master error: {}", msg),
            Self::Protocol(msg) => write!(f, "protocol error: {}", msg),
            Self::Timeout(msg) => write!(f, "timeout: {}", msg),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for EthercatError<T> {}

impl<T> From<std::io::Error> for EthercatError<T> {
    fn from(src: std::io::Error) -> Self {
        EthercatError::Io(Arc::new(src))
    }
}

impl<T> From<crate::data::PackingError> for EthercatError<T> {
    fn from(src: crate::data::PackingError) -> Self {
        EthercatError::Protocol(match src {
            crate::data::PackingError::BadSize(_, text) => text,
            crate::data::PackingError::InvalidValue(text) => text,
        })
    }
}

// because rust doesn't allow specialization and already implements `From<T> for T`, we cannot write smart conversions for generic EthercatError<T>, so these are manual conversion methods
impl<E> EthercatError<E> {
    /// convert the error if the slave specific error type allows it
    pub fn into<F>(self) -> EthercatError<F>
    where F: From<E> {
        self.map(|e| F::from(e))
    }
    /// convert the error with a callback handling the case of slave-specific error
    pub fn map<F,T>(self, callback: F) -> EthercatError<T>
    where F: Fn(E) -> T
    {
        match self {
            EthercatError::Slave(value) => EthercatError::Slave(callback(value)),
            EthercatError::Io(e) => EthercatError::Io(e),
            EthercatError::Master(message) => EthercatError::Master(message),
            EthercatError::Protocol(message) => EthercatError::Protocol(message),
            EthercatError::Timeout(message) => EthercatError::Timeout(message),
        }
    }
}
impl EthercatError<()> {
    /// convert an error with no slave-specific code into an error with one, the untyped slave variant becomes a master report
    pub fn upgrade<F>(self) -> EthercatError<F> {
        match self {
            EthercatError::Slave(()) => EthercatError::Master("slave error without code"),
            EthercatError::Io(e) => EthercatError::Io(e),
            EthercatError::Master(message) => EthercatError::Master(message),
            EthercatError::Protocol(message) => EthercatError::Protocol(message),
            EthercatError::Timeout(message) => EthercatError::Timeout(message),
        }
    }
}
