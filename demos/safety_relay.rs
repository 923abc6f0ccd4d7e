//! per-cycle safety relay inside the process image: map a slave's safety
//! channel, then watch the frames move between the regions on each cycle.
//!
//!     cargo run --example safety_relay

use etherlink::{
    ConfigHandle, EthercatError, EthercatResult, FsoeConf,
    Idn, IdnError, Master, RawMaster, SdoAbort,
    };
use std::sync::Arc;

/// underlying master stub: this demo never leaves the cyclic phase, so every configuration service is unavailable
struct Idle;

impl RawMaster for Idle {
    fn sdo_upload(&self, _: u16, _: u16, _: u8, _: &mut [u8]) -> EthercatResult<usize, SdoAbort> {
        Err(EthercatError::Master("bus is cyclic"))
    }
    fn sdo_download(&self, _: u16, _: u16, _: u8, _: &[u8]) -> EthercatResult<(), SdoAbort> {
        Err(EthercatError::Master("bus is cyclic"))
    }
    fn sdo_persist(&self, _: ConfigHandle, _: u16, _: u8, _: &[u8]) -> EthercatResult {
        Err(EthercatError::Master("bus is cyclic"))
    }
    fn idn_read(&self, _: u16, _: u8, _: Idn, _: &mut [u8]) -> EthercatResult<usize, IdnError> {
        Err(EthercatError::Master("bus is cyclic"))
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{:02x} ", byte)).collect()
}

fn main() {
    env_logger::init();

    let mut master = Master::new(Arc::new(Idle), "ec0");
    let slave = master.slave(2, "ec0.safein0", ConfigHandle(2));
    master.attach(slave);
    master.activate(48);

    // one safety data byte per direction, as a small safety input terminal would carry
    let conf = FsoeConf {data_channels: 1, slave_data_len: 1, master_data_len: 1};
    master.map_fsoe(2, conf, Some(24), Some(32)).expect("mapping out of bounds");

    for cycle in 0 .. 3 {
        // the transport receive would fill the slave's generic region here
        let image = master.process_data();
        for (position, byte) in image[0 .. 6].iter_mut().enumerate() {
            *byte = (cycle * 16 + position) as u8;
        }
        image[32 .. 38].copy_from_slice(&[0xc0 | cycle as u8, 0xff, 0xee, 0xdd, 0xcc, 0xbb]);

        let (image, slaves) = master.process_parts();
        slaves[0].copy_fsoe(image, 0, 8);

        println!("cycle {}", cycle);
        println!("  slave region  {}", hex(&image[0 .. 6]));
        println!("  master region {}", hex(&image[8 .. 14]));
        println!("  slave-facing  {}", hex(&image[24 .. 30]));
        println!("  master-facing {}", hex(&image[32 .. 38]));
    }
}
