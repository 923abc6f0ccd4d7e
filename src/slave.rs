/*!
    representation of one slave device, and the access points to its configuration channels
*/

use crate::{
    coe::Coe,
    fsoe::FsoeMapping,
    rawmaster::{ConfigHandle, RawMaster},
    soe::Soe,
    };
use std::sync::Arc;

/// a typed device option value, parsed by the configuration layer and consumed by device setup code
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    Bit(bool),
    S32(i32),
    U32(u32),
    Float(f64),
    String(String),
}

/**
    one device on the bus.

    owned by [crate::Master] and destroyed with it. the position index is assigned at discovery and immutable, the name only serves diagnostics. the configuration handle is opaque to this crate and merely passed through to the underlying master when recording persistent parameters.
*/
pub struct Slave {
    raw: Arc<dyn RawMaster>,
    position: u16,
    name: String,
    config: ConfigHandle,
    pub(crate) fsoe: Option<FsoeMapping>,
    options: Vec<(u32, OptionValue)>,
}

impl Slave {
    pub fn new(raw: Arc<dyn RawMaster>, position: u16, name: &str, config: ConfigHandle) -> Self {
        Self {
            raw,
            position,
            name: name.to_string(),
            config,
            fsoe: None,
            options: Vec::new(),
        }
    }

    pub fn position(&self) -> u16 {self.position}
    pub fn name(&self) -> &str {&self.name}
    pub fn config(&self) -> ConfigHandle {self.config}
    pub(crate) fn raw(&self) -> &dyn RawMaster {&*self.raw}

    /// the safety channel mapping, if the device carries one
    pub fn fsoe(&self) -> Option<&FsoeMapping> {self.fsoe.as_ref()}

    /// blocking access to the slave's configuration parameters, must not be used once the bus is cyclic
    pub fn coe(&self) -> Coe<'_> {Coe::new(self)}
    /// blocking access to the slave's drive parameters, must not be used once the bus is cyclic
    pub fn soe(&self) -> Soe<'_> {Soe::new(self)}

    /// record a device option for later retreival by device setup code
    pub fn add_option(&mut self, id: u32, value: OptionValue) {
        self.options.push((id, value));
    }
    /// first recorded option with the given id, or None
    pub fn option(&self, id: u32) -> Option<&OptionValue> {
        self.options.iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, value)| value)
    }
}
