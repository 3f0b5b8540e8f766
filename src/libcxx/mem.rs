use crate::libcxx::{CxxError, Result};

/// Pointer width of the inspected process, in bytes. Snapshots are
/// little-endian 64-bit; cross-architecture translation is out of scope.
pub const PTR_SIZE: u64 = 8;

/// Raw read access to the inspected process's memory at snapshot time.
///
/// The engine never writes through this trait; a failed read surfaces as
/// [`CxxError::Unreadable`] and is caught at the decoder boundary.
pub trait Memory {
	/// Read `len` bytes starting at `addr`.
	fn read(&self, addr: u64, len: usize) -> Result<Vec<u8>>;

	/// Read one byte.
	fn read_u8(&self, addr: u64) -> Result<u8> {
		Ok(self.read(addr, 1)?[0])
	}

	/// Read a little-endian unsigned integer of width 1, 2, 4, or 8.
	fn read_uint(&self, addr: u64, size: u64) -> Result<u64> {
		let bytes = self.read(addr, size as usize)?;
		let mut out = [0_u8; 8];
		let take = bytes.len().min(8);
		out[..take].copy_from_slice(&bytes[..take]);
		Ok(u64::from_le_bytes(out))
	}

	/// Read a little-endian signed integer of width 1, 2, 4, or 8.
	fn read_int(&self, addr: u64, size: u64) -> Result<i64> {
		let raw = self.read_uint(addr, size)?;
		Ok(sign_extend(raw, size))
	}

	/// Read a pointer value.
	fn read_ptr(&self, addr: u64) -> Result<u64> {
		self.read_uint(addr, PTR_SIZE)
	}
}

/// Sign-extend the low `size * 8` bits of `raw`.
pub fn sign_extend(raw: u64, size: u64) -> i64 {
	match size {
		1 => i64::from(raw as u8 as i8),
		2 => i64::from(raw as u16 as i16),
		4 => i64::from(raw as u32 as i32),
		_ => raw as i64,
	}
}

/// Report a failed read over `[addr, addr + len)`.
pub fn unreadable(addr: u64, len: usize) -> CxxError {
	CxxError::Unreadable { addr, len }
}
