//! bring-up walkthrough on a simulated underlying master: attach a slave, let its
//! device setup declare a communication schedule and push configuration, then
//! inspect what would be registered on the bus.
//!
//!     cargo run --example bringup

use etherlink::{
    mapping::{SyncDirection, SyncMapping, WatchdogMode, SYNC_TERMINATOR},
    ConfigError, ConfigHandle, Device, EthercatError, EthercatResult,
    Idn, IdnError, Master, OptionValue, RawMaster, SdoAbort, Slave,
    };
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    };

/// simulated underlying master accepting everything and echoing every service call
#[derive(Default)]
struct Simulator {
    objects: Mutex<HashMap<(u16, u16, u8), Vec<u8>>>,
    persistent: Mutex<HashMap<(u32, u16, u8), Vec<u8>>>,
}

impl RawMaster for Simulator {
    fn sdo_upload(&self, position: u16, index: u16, sub: u8, data: &mut [u8]) -> EthercatResult<usize, SdoAbort> {
        log::info!("upload slave {} 0x{:04x}:0x{:02x} ({} bytes)", position, index, sub, data.len());
        match self.objects.lock().unwrap().get(&(position, index, sub)) {
            Some(stored) => {
                let copied = stored.len().min(data.len());
                data[.. copied].copy_from_slice(&stored[.. copied]);
                Ok(stored.len())
            }
            None => Err(EthercatError::Slave(SdoAbort(0x06_02_00_00))),
        }
    }
    fn sdo_download(&self, position: u16, index: u16, sub: u8, data: &[u8]) -> EthercatResult<(), SdoAbort> {
        log::info!("download slave {} 0x{:04x}:0x{:02x} = {:?}", position, index, sub, data);
        self.objects.lock().unwrap().insert((position, index, sub), data.to_vec());
        Ok(())
    }
    fn sdo_persist(&self, config: ConfigHandle, index: u16, sub: u8, data: &[u8]) -> EthercatResult {
        log::info!("persist config {:?} 0x{:04x}:0x{:02x} = {:?}", config, index, sub, data);
        self.persistent.lock().unwrap().insert((config.0, index, sub), data.to_vec());
        Ok(())
    }
    fn idn_read(&self, position: u16, drive: u8, idn: Idn, data: &mut [u8]) -> EthercatResult<usize, IdnError> {
        log::info!("idn read slave {} drive {} {} ({} bytes)", position, drive, idn, data.len());
        data.fill(0);
        Ok(data.len())
    }
}

/// digital output terminal with one 1-bit PDO per channel, configurable inversion
struct DigitalOut {
    channels: u16,
}

impl Device for DigitalOut {
    fn configure(&self, slave: &Slave, syncs: &mut SyncMapping) -> Result<(), ConfigError> {
        syncs.push_sync(SyncDirection::Output, WatchdogMode::Default);
        for channel in 0 .. self.channels {
            syncs.push_pdo(0x1600 + channel);
            syncs.push_entry(0x7000 + (channel << 4), 1, 1);
        }
        let mut coe = slave.coe();
        if let Some(&OptionValue::Bit(invert)) = slave.option(1) {
            coe.sdo_write_named(0x8001, 2, invert as u8, "invertOutputs")
                .map_err(ConfigError::Sdo)?;
        }
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let simulator = Arc::new(Simulator::default());
    let mut master = Master::new(simulator, "ec0");

    let mut slave = master.slave(0, "ec0.dout0", ConfigHandle(0));
    slave.add_option(1, OptionValue::Bit(true));
    master.attach(slave);

    let mut syncs = SyncMapping::new();
    let device = DigitalOut {channels: 8};
    device.configure(master.slave_by_index(0).unwrap(), &mut syncs)
        .expect("device bring-up failed");

    println!("schedule for {}:", master.slave_by_index(0).unwrap().name());
    for info in syncs.infos() {
        if info.index == SYNC_TERMINATOR {
            println!("  sync 0x{:02x} (terminator)", info.index);
            break;
        }
        println!("  sync {} {:?} watchdog {:?}", info.index, info.direction, info.watchdog);
        for pdo in info.pdos {
            println!("    pdo 0x{:04x}", pdo.index());
            for entry in syncs.entries(pdo) {
                println!("      entry 0x{:04x}:0x{:02x} {} bits", entry.index, entry.sub, entry.bit_length);
            }
        }
    }
    println!("{} sync managers, {} pdos, {} entries",
        syncs.sync_count(), syncs.pdo_count(), syncs.entry_count());
}
