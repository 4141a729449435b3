//! The sink contract and the caller-owned output cache.

use zone_types::{ClassCode, Name, Rdata, TypeCode};

/// One fully decoded resource record, borrowing the cache blocks it was
/// assembled into. The borrow ends with the callback; batch consumers
/// keep the slot index instead and read the cache after the parse.
#[derive(Debug)]
pub struct Record<'a> {
    pub owner: &'a Name,
    pub rtype: TypeCode,
    pub class: ClassCode,
    pub ttl: u32,
    pub rdata: &'a [u8],
    /// Cache slot this record occupies.
    pub slot: usize,
}

/// Receives each completed record.
///
/// `Ok(slot)` names the cache slot the *next* record should be
/// assembled into, letting callers double-buffer; single-block callers
/// return `Ok(0)`. `Err(code)` (negative) aborts the parse and becomes
/// its result verbatim.
pub trait Sink {
    fn accept(&mut self, record: &Record<'_>) -> Result<usize, i32>;
}

impl<F> Sink for F
where
    F: FnMut(&Record<'_>) -> Result<usize, i32>,
{
    fn accept(&mut self, record: &Record<'_>) -> Result<usize, i32> {
        self(record)
    }
}

/// Caller-owned owner and RDATA blocks, preallocated at full capacity
/// and cycled through the slot indices the sink returns. Outlives the
/// parse call, so accepted records can be consumed afterwards.
pub struct Cache {
    owners: Vec<Name>,
    rdata: Vec<Rdata>,
}

impl Cache {
    pub fn new(size: usize) -> Self {
        Cache {
            owners: vec![Name::root(); size.max(1)],
            rdata: (0..size.max(1)).map(|_| Rdata::new()).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.rdata.len()
    }

    pub fn owner(&self, slot: usize) -> &Name {
        &self.owners[slot]
    }

    pub fn rdata(&self, slot: usize) -> &Rdata {
        &self.rdata[slot]
    }

    pub(crate) fn owner_mut(&mut self, slot: usize) -> &mut Name {
        &mut self.owners[slot]
    }

    pub(crate) fn rdata_mut(&mut self, slot: usize) -> &mut Rdata {
        &mut self.rdata[slot]
    }

    pub(crate) fn record<'a>(
        &'a self,
        slot: usize,
        rtype: TypeCode,
        class: ClassCode,
        ttl: u32,
    ) -> Record<'a> {
        Record {
            owner: &self.owners[slot],
            rtype,
            class,
            ttl,
            rdata: self.rdata[slot].as_slice(),
            slot,
        }
    }
}
