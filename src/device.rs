/*!
    capability implemented by hardware-specific setup code
*/

use crate::{
    coe::SdoAbort,
    error::EthercatError,
    mapping::SyncMapping,
    slave::Slave,
    soe::IdnError,
    };
use core::fmt;

/// failure of a device setup sequence, whichever configuration channel reported it
#[derive(Clone, Debug)]
pub enum ConfigError {
    Sdo(EthercatError<SdoAbort>),
    Idn(EthercatError<IdnError>),
}

impl From<EthercatError<SdoAbort>> for ConfigError {
    fn from(src: EthercatError<SdoAbort>) -> Self {ConfigError::Sdo(src)}
}
impl From<EthercatError<IdnError>> for ConfigError {
    fn from(src: EthercatError<IdnError>) -> Self {ConfigError::Idn(src)}
}
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sdo(err) => write!(f, "sdo: {}", err),
            Self::Idn(err) => write!(f, "idn: {}", err),
        }
    }
}
impl std::error::Error for ConfigError {}

/**
    one hardware model's setup sequence.

    a device declares its communication schedule through the builder and pushes whatever parameters it needs through the slave's configuration channels, while the bus is still pre-operational. modelled as a capability over the two collaborators rather than a common base type: device setups share no state beyond them.
*/
pub trait Device {
    fn configure(&self, slave: &Slave, syncs: &mut SyncMapping) -> Result<(), ConfigError>;
}
