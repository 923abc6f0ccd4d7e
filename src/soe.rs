/*!
    blocking configuration channel using SoE (Servo profile over Ethercat) drive addressing.

    Motion drives following the servo profile expose their parameters as IDNs, addressed by a drive number and a 16 bit identifier rather than by dictionnary index. The access rules are the same as for the CoE channel: blocking, configuration phase only, no automatic retry.
*/

use crate::{
    error::{EthercatError, EthercatResult},
    slave::Slave,
    };
use bilge::prelude::*;
use core::fmt;

/// class of an IDN: standard (S) parameters are defined by the drive profile, product (P) parameters by the vendor
#[bitsize(1)]
#[derive(FromBits, Debug, Copy, Clone, Eq, PartialEq)]
pub enum IdnClass {
    Standard = 0,
    Product = 1,
}

/**
    16 bit identifier of a drive parameter.

    layout is bit 15 = class, bits 14-12 = parameter set, bits 11-0 = number, so that `S-0-17` packs to 0x0011. drive documentation writes these as `S-x-y` / `P-x-y` and so does the [fmt::Display] impl here
*/
#[bitsize(16)]
#[derive(FromBits, DebugBits, Copy, Clone, Eq, PartialEq)]
pub struct Idn {
    pub number: u12,
    pub set: u3,
    pub class: IdnClass,
}
impl Idn {
    /// standard parameter `S-set-number`
    pub fn s(set: u8, number: u16) -> Self {
        Self::new(u12::new(number), u3::new(set), IdnClass::Standard)
    }
    /// product parameter `P-set-number`
    pub fn p(set: u8, number: u16) -> Self {
        Self::new(u12::new(number), u3::new(set), IdnClass::Product)
    }
}
impl fmt::Display for Idn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}",
            match self.class() {
                IdnClass::Standard => 'S',
                IdnClass::Product => 'P',
            },
            self.set().value(),
            self.number().value(),
            )
    }
}

/// raw SoE error code reported by a drive on a failed IDN access
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct IdnError(pub u16);

impl IdnError {
    /// human readable meaning of the code, when standard
    pub fn description(self) -> &'static str {
        match self.0 {
            0x1001 => "IDN does not exist",
            0x1009 => "invalid access to element 1",
            0x2001 => "name does not exist",
            0x4001 => "unit does not exist",
            0x7002 => "data transmission too short",
            0x7003 => "data transmission too long",
            0x7004 => "data cannot be changed",
            0x7005 => "data currently write protected",
            0x7008 => "invalid data",
            _ => "vendor specific",
        }
    }
}
impl fmt::Debug for IdnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdnError(0x{:04x})", self.0)
    }
}
impl fmt::Display for IdnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x} ({})", self.0, self.description())
    }
}

/**
    blocking access to one slave's drive parameters through SoE.

    obtained from [Slave::soe]
*/
pub struct Soe<'a> {
    slave: &'a Slave,
}

impl<'a> Soe<'a> {
    pub(crate) fn new(slave: &'a Slave) -> Self {
        Self {slave}
    }

    /**
        read the drive parameter `idn` of drive `drive` into `data`, blocking.

        same exact-size rule as the SDO read: an answer of any other size than `data.len()` is a failure
    */
    pub fn idn_read(&mut self, drive: u8, idn: Idn, data: &mut [u8]) -> EthercatResult<(), IdnError> {
        let requested = data.len();
        let received = self.slave.raw().idn_read(self.slave.position(), drive, idn, data)
            .map_err(|err| {
                log::error!("slave {}: IDN read failed (drive {} idn {}): {}",
                    self.slave.name(), drive, idn, err);
                err
                })?;
        if received != requested {
            log::error!("slave {}: invalid result size on IDN read (drive {} idn {}, req: {}, res: {})",
                self.slave.name(), drive, idn, requested, received);
            return Err(EthercatError::Protocol("IDN read result size differs from request"));
        }
        Ok(())
    }
}
