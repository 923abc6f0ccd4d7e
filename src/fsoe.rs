/*!
    cyclic relay of FSoE (Safety over Ethercat) payloads inside the process image.

    The safety protocol runs between a safety logic terminal and its safety I/O terminals, tunneled through ordinary process data. This layer only moves the opaque frames between fixed offsets of the image on every cycle, it never interprets them: correctness of the safety protocol itself is the concern of the endpoints.

    The copy runs on the cyclic thread within its deadline budget, so it performs nothing but bounded offset arithmetic and contiguous byte copies: no allocation, no lock, no per-cycle validation. Offsets are bounds-checked once, when the mapping is installed by [crate::Master::map_fsoe].
*/

use crate::slave::Slave;

/// geometry of a slave's safety channel
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FsoeConf {
    /// number of logical safety data channels in each frame
    pub data_channels: u16,
    /// payload bytes per channel in the slave to master direction
    pub slave_data_len: u16,
    /// payload bytes per channel in the master to slave direction
    pub master_data_len: u16,
}

/// byte offsets of a slave's safety frames inside the process image, fixed once installed
#[derive(Copy, Clone, Debug)]
pub struct FsoeMapping {
    pub(crate) conf: FsoeConf,
    pub(crate) slave_offset: Option<usize>,
    pub(crate) master_offset: Option<usize>,
}

/// on-wire byte size of one FSoE frame: a command byte, then payload plus 2 CRC bytes per channel, then the 2 byte connection id
pub const fn frame_size(data_channels: u16, data_len: u16) -> usize {
    1 + data_channels as usize * (data_len as usize + 2) + 2
}

impl FsoeConf {
    /// frame size in the slave to master direction
    pub const fn slave_frame_size(&self) -> usize {
        frame_size(self.data_channels, self.slave_data_len)
    }
    /// frame size in the master to slave direction
    pub const fn master_frame_size(&self) -> usize {
        frame_size(self.data_channels, self.master_data_len)
    }
}

impl FsoeMapping {
    pub fn conf(&self) -> &FsoeConf {&self.conf}
    /// offset of the slave-facing safety frame in the image, if mapped
    pub fn slave_offset(&self) -> Option<usize> {self.slave_offset}
    /// offset of the master-facing safety frame in the image, if mapped
    pub fn master_offset(&self) -> Option<usize> {self.master_offset}
}

impl Slave {
    /**
        copy this slave's safety payloads between its own data region and the mapped safety offsets of `image`.

        `slave_region` and `master_region` are this cycle's positions of the slave's generic data in the image, supplied by the caller since a slave's own segment can move while the mapped offsets stay fixed. the slave-facing frame is copied out of `slave_region`, the master-facing frame is copied into `master_region`.

        a slave without a safety mapping is the common case and costs a single check here
    */
    pub fn copy_fsoe(&self, image: &mut [u8], slave_region: usize, master_region: usize) {
        let mapping = match self.fsoe() {
            Some(mapping) => mapping,
            None => return,
        };
        if let Some(offset) = mapping.slave_offset {
            let length = mapping.conf.slave_frame_size();
            image.copy_within(slave_region .. slave_region + length, offset);
        }
        if let Some(offset) = mapping.master_offset {
            let length = mapping.conf.master_frame_size();
            image.copy_within(offset .. offset + length, master_region);
        }
    }
}
