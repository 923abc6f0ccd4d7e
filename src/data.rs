//! Traits and impls used to pack/unpack parameter values to/from the bus byte order.

/// error raised when a value does not fit the bytes it is packed to or unpacked from
#[derive(Copy, Clone, Debug)]
pub enum PackingError {
    BadSize(usize, &'static str),
    InvalidValue(&'static str),
}

pub type PackingResult<T> = Result<T, PackingError>;

/// byte array serving as packing destination of a [PduData], parameterized by its fixed size
pub trait Storage: AsRef<[u8]> + AsMut<[u8]> {
    const LEN: usize;
    fn zeroed() -> Self;
}
impl<const N: usize> Storage for [u8; N] {
    const LEN: usize = N;
    fn zeroed() -> Self {[0; N]}
}

/**
    trait for values that can be packed/unpacked to/from a parameter buffer

    multi-byte values on an ethercat bus are little endian (ETG.1000.4), every impl here must follow that byte order
*/
pub trait PduData: Sized {
    type Packed: Storage;

    fn pack(&self, dst: &mut [u8]) -> PackingResult<()>;
    fn unpack(src: &[u8]) -> PackingResult<Self>;

    fn packed_size() -> usize {Self::Packed::LEN}
}

impl<const N: usize> PduData for [u8; N] {
    type Packed = Self;

    fn pack(&self, dst: &mut [u8]) -> PackingResult<()> {
        if dst.len() < N
            {return Err(PackingError::BadSize(dst.len(), "not enough bytes for byte array"))}
        dst[.. N].copy_from_slice(self);
        Ok(())
    }
    fn unpack(src: &[u8]) -> PackingResult<Self> {
        if src.len() < N
            {return Err(PackingError::BadSize(src.len(), "not enough bytes for byte array"))}
        Ok(Self::try_from(&src[.. N]).unwrap())
    }
}

/// macro implementing [PduData] for a fixed-width integer, in little endian
macro_rules! int_pdudata {
    ($t: ty) => { impl PduData for $t {
        type Packed = [u8; core::mem::size_of::<$t>()];

        fn pack(&self, dst: &mut [u8]) -> PackingResult<()> {
            if dst.len() < Self::Packed::LEN
                {return Err(PackingError::BadSize(dst.len(), "not enough bytes for integer"))}
            dst[.. Self::Packed::LEN].copy_from_slice(&self.to_le_bytes());
            Ok(())
        }
        fn unpack(src: &[u8]) -> PackingResult<Self> {
            if src.len() < Self::Packed::LEN
                {return Err(PackingError::BadSize(src.len(), "not enough bytes for integer"))}
            Ok(Self::from_le_bytes(src[.. Self::Packed::LEN].try_into().unwrap()))
        }
    }};
}
int_pdudata!(u8);
int_pdudata!(u16);
int_pdudata!(u32);
int_pdudata!(i8);
int_pdudata!(i16);
int_pdudata!(i32);
