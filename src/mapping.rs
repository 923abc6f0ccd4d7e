/*!
    builder for a slave's communication schedule: sync managers, their PDOs, and the PDO entries.

    Device setup code declares the schedule incrementally, in three strictly nested steps:

    ```ignore
    let mut syncs = SyncMapping::new();
    syncs.push_sync(SyncDirection::Output, WatchdogMode::Default);
        syncs.push_pdo(0x1600);
            syncs.push_entry(0x7000, 1, 1);
            syncs.push_entry(0x7010, 1, 1);
    syncs.push_sync(SyncDirection::Input, WatchdogMode::Default);
        syncs.push_pdo(0x1a00);
            syncs.push_entry(0x6000, 1, 8);
    ```

    Nothing is validated later: callers are trusted to follow the nesting contract, and breaking it (or overflowing a table) is a programming error that panics rather than a runtime condition to recover from.

    The descriptors live in three flat, fixed-capacity tables rather than a tree of owned nodes: the set is built once at configuration time, then only read (by the bring-up code registering the schedule with the underlying master), so head-index/run-length pairs over contiguous tables give O(1) append with no allocation and no pointer chasing. Insertion order determines the on-wire and image layout order and is never changed after construction.
*/

/// transfer direction of a sync manager, seen from the master
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SyncDirection {
    /// slave to master
    Input,
    /// master to slave
    Output,
}

/// watchdog behavior of a sync manager
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum WatchdogMode {
    /// keep whatever the slave defaults to
    #[default]
    Default,
    Enable,
    Disable,
}

/// max sync managers per slave
pub const SYNC_LIMIT: usize = 16;
/// max PDOs per slave, all sync managers together
pub const PDO_LIMIT: usize = 64;
/// max PDO entries per slave, all PDOs together
pub const ENTRY_LIMIT: usize = 256;

/// index value marking the end of the sync manager table in the boundary view of [SyncMapping::infos]
pub const SYNC_TERMINATOR: u8 = 0xff;

/// one sync manager descriptor, owning a run of PDOs in the flat PDO table
#[derive(Copy, Clone, Debug)]
pub struct SyncManager {
    index: u8,
    direction: SyncDirection,
    watchdog: WatchdogMode,
    first_pdo: usize,
    n_pdos: usize,
}
impl SyncManager {
    /// sequential index of this sync manager, assigned at declaration starting from 0
    pub fn index(&self) -> u8 {self.index}
    pub fn direction(&self) -> SyncDirection {self.direction}
    pub fn watchdog(&self) -> WatchdogMode {self.watchdog}
    /// position of this sync manager's first PDO in the flat PDO table
    pub fn first_pdo(&self) -> usize {self.first_pdo}
    /// number of PDOs declared while this sync manager was current
    pub fn pdo_count(&self) -> usize {self.n_pdos}
}

/// one PDO descriptor, owning a run of entries in the flat entry table
#[derive(Copy, Clone, Debug)]
pub struct Pdo {
    index: u16,
    first_entry: usize,
    n_entries: usize,
}
impl Pdo {
    /// 16 bit object identifier of the PDO (0x1600 and the likes)
    pub fn index(&self) -> u16 {self.index}
    /// position of this PDO's first entry in the flat entry table
    pub fn first_entry(&self) -> usize {self.first_entry}
    /// number of entries declared while this PDO was current
    pub fn entry_count(&self) -> usize {self.n_entries}
}

/// one data field inside a PDO
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PdoEntry {
    /// object index of the mapped value in the slave's dictionnary
    pub index: u16,
    /// subindex of the mapped value
    pub sub: u8,
    /// size of the mapped value, in bits
    pub bit_length: u8,
}

/**
    accumulates the sync manager / PDO / entry descriptors of one slave.

    built once during configuration and immutable afterwards. the three counted tables are the single source of truth, the sentinel-terminated view some consumers expect is derived at the boundary by [Self::infos]
*/
pub struct SyncMapping {
    syncs: heapless::Vec<SyncManager, SYNC_LIMIT>,
    pdos: heapless::Vec<Pdo, PDO_LIMIT>,
    entries: heapless::Vec<PdoEntry, ENTRY_LIMIT>,
}

impl SyncMapping {
    pub fn new() -> Self {
        Self {
            syncs: heapless::Vec::new(),
            pdos: heapless::Vec::new(),
            entries: heapless::Vec::new(),
        }
    }

    /// drop every descriptor, leaving the builder as freshly created
    pub fn clear(&mut self) {
        self.syncs.clear();
        self.pdos.clear();
        self.entries.clear();
    }

    /**
        append a sync manager descriptor and make it current.

        its index is the next sequential one, starting at 0
    */
    pub fn push_sync(&mut self, direction: SyncDirection, watchdog: WatchdogMode) {
        let index = self.syncs.len() as u8;
        self.syncs.push(SyncManager {
            index,
            direction,
            watchdog,
            first_pdo: self.pdos.len(),
            n_pdos: 0,
            }).ok().expect("sync manager table full");
    }

    /**
        append a PDO descriptor and link it as the next PDO of the current sync manager.

        the PDO table is contiguous, so the first PDO of a sync manager together with its count addresses the whole run. calling this before any [Self::push_sync] is a caller error
    */
    pub fn push_pdo(&mut self, index: u16) {
        self.pdos.push(Pdo {
            index,
            first_entry: self.entries.len(),
            n_entries: 0,
            }).ok().expect("pdo table full");
        self.syncs.last_mut().expect("no sync manager declared").n_pdos += 1;
    }

    /**
        append an entry descriptor and link it as the next entry of the current PDO.

        calling this before any [Self::push_pdo] is a caller error
    */
    pub fn push_entry(&mut self, index: u16, sub: u8, bit_length: u8) {
        self.entries.push(PdoEntry {index, sub, bit_length})
            .ok().expect("pdo entry table full");
        self.pdos.last_mut().expect("no pdo declared").n_entries += 1;
    }

    pub fn sync_count(&self) -> usize {self.syncs.len()}
    pub fn pdo_count(&self) -> usize {self.pdos.len()}
    pub fn entry_count(&self) -> usize {self.entries.len()}

    /// sync managers in declaration order
    pub fn syncs(&self) -> &[SyncManager] {&self.syncs}
    /// the PDO run of a sync manager, in declaration order
    pub fn pdos(&self, sync: &SyncManager) -> &[Pdo] {
        &self.pdos[sync.first_pdo ..][.. sync.n_pdos]
    }
    /// the entry run of a PDO, in declaration order
    pub fn entries(&self, pdo: &Pdo) -> &[PdoEntry] {
        &self.entries[pdo.first_entry ..][.. pdo.n_entries]
    }

    /**
        sentinel-terminated view of the sync manager table, for consumers walking the table without tracking its count.

        the last element always carries [SYNC_TERMINATOR] as index and an empty PDO run, one slot past the last declared sync manager
    */
    pub fn infos(&self) -> heapless::Vec<SyncInfo<'_>, {SYNC_LIMIT + 1}> {
        let mut infos = heapless::Vec::new();
        for sync in &self.syncs {
            infos.push(SyncInfo {
                index: sync.index,
                direction: sync.direction,
                watchdog: sync.watchdog,
                pdos: self.pdos(sync),
                }).ok().expect("sync info table full");
        }
        infos.push(SyncInfo {
            index: SYNC_TERMINATOR,
            direction: SyncDirection::Input,
            watchdog: WatchdogMode::Default,
            pdos: &[],
            }).ok().expect("sync info table full");
        infos
    }
}

impl Default for SyncMapping {
    fn default() -> Self {Self::new()}
}

/// one sync manager as handed to the underlying master's schedule registration. only the index is meaningful on the terminal sentinel
#[derive(Copy, Clone, Debug)]
pub struct SyncInfo<'a> {
    pub index: u8,
    pub direction: SyncDirection,
    pub watchdog: WatchdogMode,
    pub pdos: &'a [Pdo],
}
