#[cfg(test)]
mod tests {
    use etherlink::{
        mapping::{self, SyncDirection, SyncMapping, WatchdogMode},
        fsoe::{self, FsoeConf},
        ConfigError, ConfigHandle, Device, EthercatError, EthercatResult,
        Idn, IdnError, Master, OptionValue, RawMaster, SdoAbort, Slave,
        };
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
        };

    /// scriptable stand-in for the underlying master implementation
    #[derive(Default)]
    struct Bench {
        /// live object dictionnary values, keyed by (position, index, sub)
        objects: Mutex<HashMap<(u16, u16, u8), Vec<u8>>>,
        /// persistent configuration records, keyed by (config handle, index, sub)
        persistent: Mutex<HashMap<(u32, u16, u8), Vec<u8>>>,
        /// drive parameters, keyed by (position, drive, idn)
        idns: Mutex<HashMap<(u16, u8, u16), Vec<u8>>>,
        /// when set, every download is rejected with this abort code
        refuse_download: Mutex<Option<u32>>,
        /// when set, every persistent registration fails
        refuse_persist: Mutex<bool>,
    }

    impl RawMaster for Bench {
        fn sdo_upload(&self, position: u16, index: u16, sub: u8, data: &mut [u8]) -> EthercatResult<usize, SdoAbort> {
            let objects = self.objects.lock().unwrap();
            let stored = objects.get(&(position, index, sub))
                .ok_or(EthercatError::Slave(SdoAbort(0x06_02_00_00)))?;
            let copied = stored.len().min(data.len());
            data[.. copied].copy_from_slice(&stored[.. copied]);
            Ok(stored.len())
        }
        fn sdo_download(&self, position: u16, index: u16, sub: u8, data: &[u8]) -> EthercatResult<(), SdoAbort> {
            if let Some(code) = *self.refuse_download.lock().unwrap()
                {return Err(EthercatError::Slave(SdoAbort(code)))}
            self.objects.lock().unwrap().insert((position, index, sub), data.to_vec());
            Ok(())
        }
        fn sdo_persist(&self, config: ConfigHandle, index: u16, sub: u8, data: &[u8]) -> EthercatResult {
            if *self.refuse_persist.lock().unwrap()
                {return Err(EthercatError::Master("persistent store refused"))}
            self.persistent.lock().unwrap().insert((config.0, index, sub), data.to_vec());
            Ok(())
        }
        fn idn_read(&self, position: u16, drive: u8, idn: Idn, data: &mut [u8]) -> EthercatResult<usize, IdnError> {
            let idns = self.idns.lock().unwrap();
            let stored = idns.get(&(position, drive, u16::from(idn)))
                .ok_or(EthercatError::Slave(IdnError(0x1001)))?;
            let copied = stored.len().min(data.len());
            data[.. copied].copy_from_slice(&stored[.. copied]);
            Ok(stored.len())
        }
    }

    fn bench_slave() -> (Arc<Bench>, Slave) {
        let bench = Arc::new(Bench::default());
        let slave = Slave::new(bench.clone(), 5, "ec0.d5", ConfigHandle(42));
        (bench, slave)
    }

    #[test]
    fn syncs_counts_and_order() {
        let mut syncs = SyncMapping::new();
        syncs.push_sync(SyncDirection::Output, WatchdogMode::Default);
        syncs.push_pdo(0x1600);
        syncs.push_entry(0x7000, 1, 1);
        syncs.push_entry(0x7010, 1, 1);
        syncs.push_sync(SyncDirection::Input, WatchdogMode::Disable);
        syncs.push_pdo(0x1a00);
        syncs.push_entry(0x6000, 1, 8);
        syncs.push_pdo(0x1a01);
        syncs.push_entry(0x6010, 1, 8);

        assert_eq!(syncs.sync_count(), 2);
        assert_eq!(syncs.pdo_count(), 3);
        assert_eq!(syncs.entry_count(), 4);

        let output = &syncs.syncs()[0];
        assert_eq!(output.index(), 0);
        assert_eq!(output.direction(), SyncDirection::Output);
        let pdos = syncs.pdos(output);
        assert_eq!(pdos.len(), 1);
        assert_eq!(pdos[0].index(), 0x1600);
        let entries = syncs.entries(&pdos[0]);
        assert_eq!(entries.len(), 2);
        assert_eq!((entries[0].index, entries[0].sub, entries[0].bit_length), (0x7000, 1, 1));
        assert_eq!((entries[1].index, entries[1].sub, entries[1].bit_length), (0x7010, 1, 1));

        let input = &syncs.syncs()[1];
        assert_eq!(input.index(), 1);
        assert_eq!(input.watchdog(), WatchdogMode::Disable);
        let pdos = syncs.pdos(input);
        assert_eq!(pdos.len(), 2);
        assert_eq!(pdos[0].index(), 0x1a00);
        assert_eq!(syncs.entries(&pdos[0]), &[mapping::PdoEntry {index: 0x6000, sub: 1, bit_length: 8}]);
        assert_eq!(pdos[1].index(), 0x1a01);
        assert_eq!(syncs.entries(&pdos[1]), &[mapping::PdoEntry {index: 0x6010, sub: 1, bit_length: 8}]);
    }

    #[test]
    fn syncs_sentinel_follows_every_push() {
        let mut syncs = SyncMapping::new();
        for count in 0 .. 4 {
            syncs.push_sync(SyncDirection::Input, WatchdogMode::Default);
            let infos = syncs.infos();
            assert_eq!(syncs.sync_count(), count + 1);
            assert_eq!(infos.len(), count + 2);
            assert_eq!(infos[count].index, count as u8);
            let terminal = infos.last().unwrap();
            assert_eq!(terminal.index, mapping::SYNC_TERMINATOR);
            assert!(terminal.pdos.is_empty());
        }
    }

    #[test]
    fn syncs_single_pdo_two_entries() {
        let mut syncs = SyncMapping::new();
        syncs.push_sync(SyncDirection::Input, WatchdogMode::Default);
        syncs.push_pdo(0x1a00);
        syncs.push_entry(0x6000, 1, 8);
        syncs.push_entry(0x6000, 2, 8);

        assert_eq!(syncs.sync_count(), 1);
        assert_eq!(syncs.pdo_count(), 1);
        assert_eq!(syncs.entry_count(), 2);
        let pdo = &syncs.pdos(&syncs.syncs()[0])[0];
        assert_eq!(pdo.first_entry(), 0);
        assert_eq!(pdo.entry_count(), 2);
    }

    #[test]
    fn syncs_clear_resets_everything() {
        let mut syncs = SyncMapping::new();
        syncs.push_sync(SyncDirection::Output, WatchdogMode::Enable);
        syncs.push_pdo(0x1600);
        syncs.push_entry(0x7000, 1, 8);
        syncs.clear();
        assert_eq!(syncs.sync_count(), 0);
        assert_eq!(syncs.pdo_count(), 0);
        assert_eq!(syncs.entry_count(), 0);
        let infos = syncs.infos();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].index, mapping::SYNC_TERMINATOR);
    }

    #[test]
    fn sdo_read_requires_exact_size() {
        let (bench, slave) = bench_slave();
        bench.objects.lock().unwrap().insert((5, 0x8000, 1), vec![1, 2, 3, 4]);
        bench.objects.lock().unwrap().insert((5, 0x8000, 2), vec![]);
        bench.objects.lock().unwrap().insert((5, 0x8000, 3), vec![1, 2, 3]);
        bench.objects.lock().unwrap().insert((5, 0x8000, 4), vec![1, 2, 3, 4, 5]);

        let mut coe = slave.coe();
        let mut data = [0; 4];
        assert!(coe.sdo_read(0x8000, 1, &mut data).is_ok());
        assert_eq!(data, [1, 2, 3, 4]);
        // result sizes 0, requested-1 and requested+1 must all fail
        assert!(coe.sdo_read(0x8000, 2, &mut data).is_err());
        assert!(coe.sdo_read(0x8000, 3, &mut data).is_err());
        assert!(coe.sdo_read(0x8000, 4, &mut data).is_err());
        // as must a missing object, with its abort code surfaced
        match coe.sdo_read(0x8000, 5, &mut data) {
            Err(EthercatError::Slave(code)) => assert_eq!(code, SdoAbort(0x06_02_00_00)),
            other => panic!("expected slave abort, got {:?}", other),
        }
    }

    #[test]
    fn sdo_write_is_two_phased() {
        let (bench, slave) = bench_slave();
        let mut coe = slave.coe();

        // both phases succeed: the value is live and persistent
        assert!(coe.sdo_write(0x8010, 1, &[7, 7]).is_ok());
        assert_eq!(bench.objects.lock().unwrap().get(&(5, 0x8010, 1)), Some(&vec![7, 7]));
        assert_eq!(bench.persistent.lock().unwrap().get(&(42, 0x8010, 1)), Some(&vec![7, 7]));

        // rejected download: the operation fails and the persistent phase is never reached
        *bench.refuse_download.lock().unwrap() = Some(0x06_09_00_30);
        assert!(coe.sdo_write(0x8010, 2, &[9]).is_err());
        assert!(bench.objects.lock().unwrap().get(&(5, 0x8010, 2)).is_none());
        assert!(bench.persistent.lock().unwrap().get(&(42, 0x8010, 2)).is_none());
        *bench.refuse_download.lock().unwrap() = None;

        // failed persistent phase: the live value changed, the operation still reports failure
        *bench.refuse_persist.lock().unwrap() = true;
        assert!(coe.sdo_write(0x8010, 3, &[5]).is_err());
        assert_eq!(bench.objects.lock().unwrap().get(&(5, 0x8010, 3)), Some(&vec![5]));
        assert!(bench.persistent.lock().unwrap().get(&(42, 0x8010, 3)).is_none());
    }

    #[test]
    fn sdo_write_value_uses_little_endian() {
        let (bench, slave) = bench_slave();
        let mut coe = slave.coe();
        coe.sdo_write_value(0x8020, 1, 0xa5u8).unwrap();
        coe.sdo_write_value(0x8020, 2, 0x1234u16).unwrap();
        coe.sdo_write_value(0x8020, 3, 0xdead_beefu32).unwrap();
        let objects = bench.objects.lock().unwrap();
        assert_eq!(objects.get(&(5, 0x8020, 1)), Some(&vec![0xa5]));
        assert_eq!(objects.get(&(5, 0x8020, 2)), Some(&vec![0x34, 0x12]));
        assert_eq!(objects.get(&(5, 0x8020, 3)), Some(&vec![0xef, 0xbe, 0xad, 0xde]));
    }

    #[test]
    fn sdo_value_round_trip() {
        let (_bench, slave) = bench_slave();
        let mut coe = slave.coe();
        coe.sdo_write_value(0x8030, 1, 0xa5u8).unwrap();
        coe.sdo_write_value(0x8030, 2, 0xbeefu16).unwrap();
        coe.sdo_write_value(0x8030, 3, 0xdead_beefu32).unwrap();
        assert_eq!(coe.sdo_read_value::<u8>(0x8030, 1).unwrap(), 0xa5);
        assert_eq!(coe.sdo_read_value::<u16>(0x8030, 2).unwrap(), 0xbeef);
        assert_eq!(coe.sdo_read_value::<u32>(0x8030, 3).unwrap(), 0xdead_beef);
    }

    #[test]
    fn sdo_write_named_still_fails() {
        let (bench, slave) = bench_slave();
        *bench.refuse_download.lock().unwrap() = Some(0x06_09_00_31);
        let mut coe = slave.coe();
        match coe.sdo_write_named(0x8040, 1, 200u8, "maxCurrent") {
            Err(EthercatError::Slave(code)) => assert_eq!(code, SdoAbort(0x06_09_00_31)),
            other => panic!("expected slave abort, got {:?}", other),
        }
    }

    #[test]
    fn idn_read_requires_exact_size() {
        let (bench, slave) = bench_slave();
        bench.idns.lock().unwrap().insert((5, 0, u16::from(Idn::s(0, 17))), vec![0x11, 0x22]);
        let mut soe = slave.soe();

        let mut data = [0; 2];
        assert!(soe.idn_read(0, Idn::s(0, 17), &mut data).is_ok());
        assert_eq!(data, [0x11, 0x22]);

        let mut short = [0; 1];
        assert!(soe.idn_read(0, Idn::s(0, 17), &mut short).is_err());

        match soe.idn_read(0, Idn::s(0, 18), &mut data) {
            Err(EthercatError::Slave(code)) => assert_eq!(code, IdnError(0x1001)),
            other => panic!("expected drive error, got {:?}", other),
        }
    }

    #[test]
    fn idn_packing_and_formatting() {
        assert_eq!(u16::from(Idn::s(0, 17)), 0x0011);
        assert_eq!(u16::from(Idn::p(2, 100)), 0xa064);
        assert_eq!(Idn::from(0x0011u16), Idn::s(0, 17));
        assert_eq!(Idn::s(0, 17).to_string(), "S-0-17");
        assert_eq!(Idn::p(2, 100).to_string(), "P-2-100");
    }

    #[test]
    fn fsoe_frame_size_formula() {
        // command byte + per channel payload and crc + connection id
        assert_eq!(fsoe::frame_size(1, 1), 6);
        assert_eq!(fsoe::frame_size(1, 2), 7);
        assert_eq!(fsoe::frame_size(2, 6), 19);
        let conf = FsoeConf {data_channels: 2, slave_data_len: 6, master_data_len: 1};
        assert_eq!(conf.slave_frame_size(), 19);
        assert_eq!(conf.master_frame_size(), 9);
    }

    fn relay_master(conf: FsoeConf, slave_offset: Option<usize>, master_offset: Option<usize>) -> Master {
        let bench = Arc::new(Bench::default());
        let mut master = Master::new(bench, "ec0");
        let slave = master.slave(5, "ec0.d5", ConfigHandle(42));
        master.attach(slave);
        master.activate(64);
        master.map_fsoe(5, conf, slave_offset, master_offset).unwrap();
        for (position, byte) in master.process_data().iter_mut().enumerate() {
            *byte = position as u8;
        }
        master
    }

    #[test]
    fn fsoe_relay_moves_exactly_the_frames() {
        let conf = FsoeConf {data_channels: 1, slave_data_len: 1, master_data_len: 2};
        let mut master = relay_master(conf, Some(32), Some(48));
        let before = master.process_data().to_vec();

        let (image, slaves) = master.process_parts();
        slaves[0].copy_fsoe(image, 0, 8);

        let mut expected = before.clone();
        // slave frame: 6 bytes from the slave region into the slave-facing offset
        expected[32 .. 38].copy_from_slice(&before[0 .. 6]);
        // master frame: 7 bytes from the master-facing offset into the master region
        expected[8 .. 15].copy_from_slice(&before[48 .. 55]);
        assert_eq!(master.process_data(), expected.as_slice());
    }

    #[test]
    fn fsoe_relay_partial_mapping() {
        let conf = FsoeConf {data_channels: 1, slave_data_len: 1, master_data_len: 2};
        let mut master = relay_master(conf, Some(32), None);
        let before = master.process_data().to_vec();

        let (image, slaves) = master.process_parts();
        slaves[0].copy_fsoe(image, 0, 8);

        let mut expected = before.clone();
        expected[32 .. 38].copy_from_slice(&before[0 .. 6]);
        assert_eq!(master.process_data(), expected.as_slice());
    }

    #[test]
    fn fsoe_relay_without_mapping_is_noop() {
        let bench = Arc::new(Bench::default());
        let mut master = Master::new(bench, "ec0");
        let slave = master.slave(5, "ec0.d5", ConfigHandle(42));
        master.attach(slave);
        master.activate(64);
        for (position, byte) in master.process_data().iter_mut().enumerate() {
            *byte = position as u8;
        }
        let before = master.process_data().to_vec();

        let (image, slaves) = master.process_parts();
        slaves[0].copy_fsoe(image, 0, 8);
        assert_eq!(master.process_data(), before.as_slice());
    }

    #[test]
    fn fsoe_mapping_is_bounds_checked() {
        let bench = Arc::new(Bench::default());
        let mut master = Master::new(bench, "ec0");
        let slave = master.slave(5, "ec0.d5", ConfigHandle(42));
        master.attach(slave);
        master.activate(64);

        let conf = FsoeConf {data_channels: 1, slave_data_len: 1, master_data_len: 1};
        // 6 byte frame starting at 59 overruns a 64 byte image
        assert!(master.map_fsoe(5, conf, Some(59), None).is_err());
        assert!(master.map_fsoe(5, conf, None, Some(59)).is_err());
        // it fits exactly at 58
        assert!(master.map_fsoe(5, conf, Some(58), None).is_ok());
        // unknown position index
        assert!(master.map_fsoe(6, conf, Some(0), None).is_err());
    }

    #[test]
    fn slave_lookup_by_index() {
        let bench = Arc::new(Bench::default());
        let mut master = Master::new(bench, "ec0");
        assert!(master.slave_by_index(0).is_none());

        for (position, name) in [(3, "ec0.d3"), (7, "ec0.d7"), (11, "ec0.d11")] {
            let slave = master.slave(position, name, ConfigHandle(position as u32));
            master.attach(slave);
        }
        assert_eq!(master.slave_by_index(7).unwrap().name(), "ec0.d7");
        assert_eq!(master.slave_by_index(3).unwrap().name(), "ec0.d3");
        assert!(master.slave_by_index(4).is_none());
        // attachment order is preserved
        let positions: Vec<_> = master.slaves().iter().map(|slave| slave.position()).collect();
        assert_eq!(positions, [3, 7, 11]);
    }

    #[test]
    fn slave_option_lookup() {
        let (_bench, mut slave) = bench_slave();
        slave.add_option(1, OptionValue::U32(250));
        slave.add_option(2, OptionValue::String("stdin".into()));
        slave.add_option(1, OptionValue::U32(999));

        assert_eq!(slave.option(1), Some(&OptionValue::U32(250)));
        assert_eq!(slave.option(2), Some(&OptionValue::String("stdin".into())));
        assert!(slave.option(3).is_none());
    }

    /// digital output terminal with one 1-bit PDO per channel
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
            coe.sdo_write_value(0x8000, 1, 1u8).map_err(ConfigError::Sdo)?;
            Ok(())
        }
    }

    #[test]
    fn device_configures_through_the_capability() {
        let (bench, slave) = bench_slave();
        let mut syncs = SyncMapping::new();
        let device = DigitalOut {channels: 4};
        device.configure(&slave, &mut syncs).unwrap();

        assert_eq!(syncs.sync_count(), 1);
        assert_eq!(syncs.pdo_count(), 4);
        assert_eq!(syncs.entry_count(), 4);
        assert_eq!(syncs.pdos(&syncs.syncs()[0])[3].index(), 0x1603);
        // the configuration write went through both phases
        assert_eq!(bench.objects.lock().unwrap().get(&(5, 0x8000, 1)), Some(&vec![1]));
        assert_eq!(bench.persistent.lock().unwrap().get(&(42, 0x8000, 1)), Some(&vec![1]));
    }
}
