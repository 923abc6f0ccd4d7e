/*!
    boundary to the underlying ethercat master implementation.

    This crate computes what to configure and which calls to make, the wire-level work (frame scheduling, mailbox transport, CRC, timing) is the job of an existing master implementation exposing the few blocking services declared here. Anything implementing [RawMaster] can drive the configuration channels and the bring-up of this crate.

    All services here block the calling thread until the bus transaction completes or the implementation gives up, so none of them may be called from the cyclic thread.
*/

use crate::{
    coe::SdoAbort,
    soe::{Idn, IdnError},
    error::EthercatResult,
    };

/**
    opaque handle to a slave's configuration context on the underlying master.

    minted by the [RawMaster] implementor when the slave is registered, and only passed through by this crate when recording persistent parameters
*/
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ConfigHandle(pub u32);

/// blocking services this crate consumes from the underlying master
pub trait RawMaster: Send + Sync {
    /**
        blocking SDO upload (read) from the slave at topological `position`.

        on success returns the number of bytes actually written to `data`, which the caller compares to its expectation. a failure carries the abort code reported by the slave
    */
    fn sdo_upload(&self, position: u16, index: u16, sub: u8, data: &mut [u8]) -> EthercatResult<usize, SdoAbort>;

    /**
        blocking SDO download (write) to the slave at topological `position`.

        a failure is authoritative: the slave rejected the value
    */
    fn sdo_download(&self, position: u16, index: u16, sub: u8, data: &[u8]) -> EthercatResult<(), SdoAbort>;

    /**
        record `data` in the slave's persistent configuration.

        the underlying master replays every recorded parameter by itself whenever the slave is reconfigured (typically after a power cycle), without the control application being involved
    */
    fn sdo_persist(&self, config: ConfigHandle, index: u16, sub: u8, data: &[u8]) -> EthercatResult;

    /**
        blocking SoE read of drive parameter `idn` on drive `drive` of the slave at `position`.

        on success returns the number of bytes actually written to `data`. a failure carries the SoE error code reported by the drive
    */
    fn idn_read(&self, position: u16, drive: u8, idn: Idn, data: &mut [u8]) -> EthercatResult<usize, IdnError>;
}
