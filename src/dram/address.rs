/// Physical address to DRAM coordinates, low to high: offset (ignored), channel, column, bank,
/// row.  The fields are contiguous, so together they cover every address bit exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressMap {
    offset_bits: u32,
    channel_bits: u32,
    column_bits: u32,
    bank_bits: u32,
    channel_lsb: u32,
    column_lsb: u32,
    bank_lsb: u32,
    row_lsb: u32,
}

fn mask(bits: u32) -> u64 {
    if bits >= 64 {
        !0
    } else {
        (1u64 << bits) - 1
    }
}

impl AddressMap {
    pub fn new(offset_bits: u32, channel_bits: u32, column_bits: u32, bank_bits: u32) -> Self {
        let channel_lsb = offset_bits;
        let column_lsb = channel_lsb + channel_bits;
        let bank_lsb = column_lsb + column_bits;
        let row_lsb = bank_lsb + bank_bits;
        assert!(row_lsb < 64, "address map leaves no row bits");
        Self {
            offset_bits,
            channel_bits,
            column_bits,
            bank_bits,
            channel_lsb,
            column_lsb,
            bank_lsb,
            row_lsb,
        }
    }

    pub fn num_channels(&self) -> usize {
        1 << self.channel_bits
    }

    pub fn banks_per_channel(&self) -> usize {
        1 << self.bank_bits
    }

    pub fn offset(&self, addr: u64) -> u64 {
        addr & mask(self.offset_bits)
    }

    pub fn channel(&self, addr: u64) -> u64 {
        (addr >> self.channel_lsb) & mask(self.channel_bits)
    }

    pub fn column(&self, addr: u64) -> u64 {
        (addr >> self.column_lsb) & mask(self.column_bits)
    }

    pub fn bank(&self, addr: u64) -> u64 {
        (addr >> self.bank_lsb) & mask(self.bank_bits)
    }

    pub fn row(&self, addr: u64) -> u64 {
        addr >> self.row_lsb
    }

    /// Inverse of the extraction functions.  Each field is truncated to its width.
    pub fn compose(&self, offset: u64, channel: u64, column: u64, bank: u64, row: u64) -> u64 {
        (offset & mask(self.offset_bits))
            | ((channel & mask(self.channel_bits)) << self.channel_lsb)
            | ((column & mask(self.column_bits)) << self.column_lsb)
            | ((bank & mask(self.bank_bits)) << self.bank_lsb)
            | (row << self.row_lsb)
    }
}
