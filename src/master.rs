/*!
    master-side ownership: the shared process image and the ordered slave collection
*/

use crate::{
    error::{EthercatError, EthercatResult},
    fsoe::{FsoeConf, FsoeMapping},
    rawmaster::{ConfigHandle, RawMaster},
    slave::Slave,
    };
use std::sync::Arc;

/**
    owns the shared process image and the slaves attached to one underlying master.

    created once at bus bring-up and destroyed at shutdown. the image is a single contiguous buffer exchanged with all slaves once per cycle by the underlying master; it is conceptually divided in non-overlapping regions assigned at bring-up, and each region has exactly one producer per cycle, so no locking is used for it: exclusive access is expressed through the `&mut` borrows handed out here.
*/
pub struct Master {
    raw: Arc<dyn RawMaster>,
    name: String,
    process_data: Vec<u8>,
    slaves: Vec<Slave>,
}

impl Master {
    pub fn new(raw: Arc<dyn RawMaster>, name: &str) -> Self {
        Self {
            raw,
            name: name.to_string(),
            process_data: Vec::new(),
            slaves: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {&self.name}

    /// create a slave bound to this master's underlying implementation, to be configured then [Self::attach]ed
    pub fn slave(&self, position: u16, name: &str, config: ConfigHandle) -> Slave {
        Slave::new(self.raw.clone(), position, name, config)
    }

    /// append a configured slave. attachment order is the registry order and is preserved
    pub fn attach(&mut self, slave: Slave) {
        self.slaves.push(slave);
    }

    /**
        find the slave with the given position index.

        linear scan over the attachment-ordered collection: slave counts are tens, not thousands, and lookups happen at configuration time and in diagnostics, never in the cyclic path
    */
    pub fn slave_by_index(&self, position: u16) -> Option<&Slave> {
        self.slaves.iter().find(|slave| slave.position() == position)
    }
    pub fn slave_by_index_mut(&mut self, position: u16) -> Option<&mut Slave> {
        self.slaves.iter_mut().find(|slave| slave.position() == position)
    }

    /// slaves in attachment order
    pub fn slaves(&self) -> &[Slave] {&self.slaves}

    /**
        allocate the shared process image, zeroed.

        `image_size` comes from the layout negotiation done by the underlying master once every slave's schedule is registered. the buffer address stays stable until [Self::deactivate]
    */
    pub fn activate(&mut self, image_size: usize) {
        self.process_data = vec![0; image_size];
    }

    /// release the process image. safety mappings installed against it become stale and must be installed again after the next [Self::activate]
    pub fn deactivate(&mut self) {
        self.process_data = Vec::new();
        for slave in &mut self.slaves {
            slave.fsoe = None;
        }
    }

    /// current size of the process image, 0 before activation
    pub fn image_size(&self) -> usize {self.process_data.len()}

    /// exclusive access to the process image
    pub fn process_data(&mut self) -> &mut [u8] {&mut self.process_data}

    /// the process image and the slave list, borrowed together so the cyclic callback can relay safety data while walking the slaves
    pub fn process_parts(&mut self) -> (&mut [u8], &[Slave]) {
        (&mut self.process_data, &self.slaves)
    }

    /**
        install a safety channel mapping on the slave at `position`.

        both offsets are checked here, once, against the current image for the full frame length in their direction; the cyclic copy in [Slave::copy_fsoe] relies on this and never re-validates
    */
    pub fn map_fsoe(&mut self, position: u16, conf: FsoeConf, slave_offset: Option<usize>, master_offset: Option<usize>) -> EthercatResult {
        let image = self.process_data.len();
        if let Some(offset) = slave_offset {
            if offset + conf.slave_frame_size() > image
                {return Err(EthercatError::Master("slave-facing safety frame exceeds the process image"))}
        }
        if let Some(offset) = master_offset {
            if offset + conf.master_frame_size() > image
                {return Err(EthercatError::Master("master-facing safety frame exceeds the process image"))}
        }
        let slave = self.slave_by_index_mut(position)
            .ok_or(EthercatError::Master("no slave with this position index"))?;
        slave.fsoe = Some(FsoeMapping {conf, slave_offset, master_offset});
        Ok(())
    }
}
