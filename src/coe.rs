/*!
    blocking configuration channel using CoE (Canopen over Ethercat) object addressing.

    SDOs (Service Data Objects) are individually addressable parameters in the slave's dictionnary of objects, identified by a 16 bit index and an 8 bit subindex. They are exchanged out of band, before the bus goes cyclic, to configure the slave.

    Every operation here suspends the calling thread until the underlying master completes the transfer or gives up, so these belong to the configuration phase (or an explicitly non-deadline-bound maintenance path), never to the cyclic thread. No operation retries by itself: whether a failure aborts the slave's bring-up or is tolerated as an optional capability probe is the caller's decision, since retry policy is not universal across parameters.
*/

use crate::{
    data::{PduData, Storage},
    error::{EthercatError, EthercatResult},
    slave::Slave,
    };
use core::fmt;

/// raw abort code reported by a slave on a failed SDO transfer (ETG.1000.6 table 41)
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct SdoAbort(pub u32);

impl SdoAbort {
    /// human readable meaning of the code, when standard
    pub fn description(self) -> &'static str {
        match self.0 {
            0x05_03_00_00 => "toggle bit not changed",
            0x05_04_00_00 => "SDO protocol timeout",
            0x05_04_00_01 => "unknown command specifier",
            0x05_04_00_05 => "out of memory",
            0x06_01_00_00 => "unsupported access to the object",
            0x06_01_00_01 => "attempt to read a write only object",
            0x06_01_00_02 => "attempt to write a read only object",
            0x06_02_00_00 => "object does not exist in the dictionnary",
            0x06_04_00_41 => "object cannot be mapped to the PDO",
            0x06_04_00_42 => "mapped objects would exceed the PDO length",
            0x06_04_00_43 => "general parameter incompatibility",
            0x06_06_00_00 => "hardware error",
            0x06_07_00_10 => "data type length does not match",
            0x06_07_00_12 => "data type length too high",
            0x06_07_00_13 => "data type length too low",
            0x06_09_00_11 => "subindex does not exist",
            0x06_09_00_30 => "value out of range",
            0x06_09_00_31 => "value too high",
            0x06_09_00_32 => "value too low",
            0x08_00_00_00 => "general error",
            0x08_00_00_20 => "data cannot be stored to the application",
            0x08_00_00_22 => "wrong device state",
            _ => "vendor specific",
        }
    }
}
impl fmt::Debug for SdoAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SdoAbort(0x{:08x})", self.0)
    }
}
impl fmt::Display for SdoAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x} ({})", self.0, self.description())
    }
}

/**
    blocking access to one slave's configuration parameters through CoE.

    obtained from [Slave::coe]
*/
pub struct Coe<'a> {
    slave: &'a Slave,
}

impl<'a> Coe<'a> {
    pub(crate) fn new(slave: &'a Slave) -> Self {
        Self {slave}
    }

    /**
        read the SDO at `index:sub` into `data`, blocking.

        the expected size is `data.len()`: an answer of any other size is a failure, never a silent truncation or zero padding
    */
    pub fn sdo_read(&mut self, index: u16, sub: u8, data: &mut [u8]) -> EthercatResult<(), SdoAbort> {
        let requested = data.len();
        let received = self.slave.raw().sdo_upload(self.slave.position(), index, sub, data)
            .map_err(|err| {
                log::error!("slave {}: SDO upload 0x{:04x}:0x{:02x} failed: {}",
                    self.slave.name(), index, sub, err);
                err
                })?;
        if received != requested {
            log::error!("slave {}: invalid result size on SDO upload 0x{:04x}:0x{:02x} (req: {}, res: {})",
                self.slave.name(), index, sub, requested, received);
            return Err(EthercatError::Protocol("SDO upload result size differs from request"));
        }
        Ok(())
    }

    /// read a scalar parameter, unpacking it from the bus byte order
    pub fn sdo_read_value<T: PduData>(&mut self, index: u16, sub: u8) -> EthercatResult<T, SdoAbort> {
        let mut data = T::Packed::zeroed();
        self.sdo_read(index, sub, data.as_mut())?;
        Ok(T::unpack(data.as_ref())?)
    }

    /**
        write `data` to the SDO at `index:sub`, in two phases.

        1. a blocking download, whose failure is authoritative: the slave rejected the value and the whole operation fails
        2. only then, the same value is recorded in the slave's persistent configuration, which the underlying master replays by itself if the slave is power-cycled or otherwise reconfigured later

        The first phase alone would lose the setting on a power cycle, the second alone would hide a rejection until the next replay, so both are needed. If the persistent phase fails after a successful download, the live value stays applied on the device (no rollback is attempted) and the operation still reports failure, since the durability guarantee was not met.
    */
    pub fn sdo_write(&mut self, index: u16, sub: u8, data: &[u8]) -> EthercatResult<(), SdoAbort> {
        self.slave.raw().sdo_download(self.slave.position(), index, sub, data)
            .map_err(|err| {
                log::error!("slave {}: SDO download 0x{:04x}:0x{:02x} (size {}) failed: {}",
                    self.slave.name(), index, sub, data.len(), err);
                err
                })?;
        if let Err(err) = self.slave.raw().sdo_persist(self.slave.config(), index, sub, data) {
            log::error!("slave {}: failed to record persistent SDO 0x{:04x}:0x{:02x}: {}",
                self.slave.name(), index, sub, err);
            return Err(err.upgrade());
        }
        Ok(())
    }

    /**
        write a scalar parameter, packing it in the bus byte order before delegating to [Self::sdo_write].

        this covers the 8, 16 and 32 bit widths device configuration code deals in
    */
    pub fn sdo_write_value<T: PduData>(&mut self, index: u16, sub: u8, value: T) -> EthercatResult<(), SdoAbort> {
        let mut data = T::Packed::zeroed();
        value.pack(data.as_mut())?;
        self.sdo_write(index, sub, data.as_ref())
    }

    /// same as [Self::sdo_write_value], with failures additionally attributed to the named device option that requested the write
    pub fn sdo_write_named<T: PduData + Copy + fmt::Debug>(&mut self, index: u16, sub: u8, value: T, option: &str) -> EthercatResult<(), SdoAbort> {
        self.sdo_write_value(index, sub, value).map_err(|err| {
            log::error!("slave {}: SDO write 0x{:04x}:0x{:02x} = {:?} for option {:?} rejected",
                self.slave.name(), index, sub, value, option);
            err
            })
    }
}
