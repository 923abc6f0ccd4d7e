/*!
    Configuration and cyclic-exchange glue for ethercat slaves, on top of an existing master implementation.

    This crate does not talk to the wire: framing, datagram scheduling and mailbox transport are delegated to an underlying master exposed through the [RawMaster] trait. What it provides is the layer a realtime control application needs between that master and its device setup code:

    - [SyncMapping]: a builder assembling a slave's communication schedule (sync managers, PDOs, PDO entries) into flat fixed-capacity tables the master bring-up registers on the bus
    - [Coe] and [Soe]: blocking configuration channels reading and writing individual parameters on a slave before the bus goes cyclic, with two-phase persistent writes and fixed-width helpers
    - [Slave::copy_fsoe]: the per-cycle relay moving opaque safety payloads between fixed offsets of the shared process image
    - [Master]: ownership of the process image and the attachment-ordered slave collection, with lookup by position index
*/

mod data;
mod error;
mod rawmaster;
mod slave;
mod master;
pub mod mapping;
pub mod coe;
pub mod soe;
pub mod fsoe;
pub mod device;

pub use crate::data::{PackingError, PackingResult, PduData, Storage};
pub use crate::error::{EthercatError, EthercatResult};
pub use crate::rawmaster::{ConfigHandle, RawMaster};
pub use crate::mapping::{SyncDirection, SyncMapping, WatchdogMode};
pub use crate::coe::{Coe, SdoAbort};
pub use crate::soe::{Idn, IdnError, Soe};
pub use crate::fsoe::FsoeConf;
pub use crate::slave::{OptionValue, Slave};
pub use crate::master::Master;
pub use crate::device::{ConfigError, Device};
