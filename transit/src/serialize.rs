/// Wire footprint of a serialized record: known at compile time for POD
/// records, length-prefixed otherwise.
pub enum InProcSize {
    Const(usize),
    Dynamic,
}

/// Binary serialization of one record into the queue's buffer. The buffer
/// layout is the only source of truth: records are written and read back
/// from raw bytes, with the in-memory representation as the wire format for
/// the `Const` case.
pub trait InProcSerialize: Sized {
    const IN_PROC_SIZE: InProcSize = InProcSize::Const(std::mem::size_of::<Self>());

    /// Payload size in bytes, `Some` only for dynamically sized records.
    fn get_value_size(&self) -> Option<u32> {
        None
    }

    fn write_value(&self, buffer: &mut Vec<u8>) {
        write_any(buffer, self);
    }

    /// # Safety
    ///
    /// `window` must cover exactly the bytes previously produced by
    /// `write_value` for a value of this type.
    unsafe fn read_value(window: &[u8]) -> Self {
        assert!(window.len() >= std::mem::size_of::<Self>());
        read_any::<Self>(window.as_ptr())
    }
}

/// Appends the in-memory representation of a value to the buffer.
pub fn write_any<T>(buffer: &mut Vec<u8>, value: &T) {
    let ptr = (value as *const T).cast::<u8>();
    let slice = unsafe { std::slice::from_raw_parts(ptr, std::mem::size_of::<T>()) };
    buffer.extend_from_slice(slice);
}

/// Reads a value from a raw, possibly unaligned, pointer.
///
/// # Safety
///
/// `ptr` must point to at least `size_of::<T>()` readable bytes holding a
/// valid bit pattern for `T`.
pub unsafe fn read_any<T>(ptr: *const u8) -> T {
    ptr.cast::<T>().read_unaligned()
}

/// Reads a POD value from the front of the window and moves the window
/// forward past it.
#[allow(clippy::missing_panics_doc)]
pub fn read_consume_pod<T>(window: &mut &[u8]) -> T {
    assert!(window.len() >= std::mem::size_of::<T>());
    let value = unsafe { read_any::<T>(window.as_ptr()) };
    *window = advance_window(window, std::mem::size_of::<T>());
    value
}

/// Returns the window with its first `offset` bytes consumed.
#[must_use]
pub fn advance_window(window: &[u8], offset: usize) -> &[u8] {
    &window[offset..]
}
