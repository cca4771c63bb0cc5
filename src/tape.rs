use crate::error::ExecError;

/// Default number of cells on the tape.
pub const DEFAULT_MEMORY_SIZE: usize = 4096;

/// How an out-of-range memory pointer is treated when a cell is accessed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerPolicy {
    /// Any access outside `[0, memory_size)` is a fatal bounds error.
    #[default]
    Strict,
    /// The pointer is reduced modulo the tape length at access time.
    /// The pointer value itself is left untouched.
    Wrap,
}

/// A fixed-length tape of byte cells.
///
/// Cell arithmetic wraps modulo 256. Pointer arithmetic does not: the
/// pointer lives in the interpreter state and is checked here, at every
/// access, according to the tape's [`PointerPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Box<[u8]>,
    policy: PointerPolicy,
}

impl Tape {
    /// Create a zeroed tape of `size` cells.
    pub fn new(size: usize, policy: PointerPolicy) -> Result<Self, ExecError> {
        if size == 0 {
            return Err(ExecError::InvalidMemorySize);
        }
        Ok(Self {
            cells: vec![0u8; size].into_boxed_slice(),
            policy,
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a tape has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn policy(&self) -> PointerPolicy {
        self.policy
    }

    /// The cursor position a fresh run starts from: the middle of the tape.
    pub fn center(&self) -> isize {
        (self.cells.len() / 2) as isize
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    fn index(&self, ptr: isize) -> Result<usize, ExecError> {
        let len = self.cells.len();
        match self.policy {
            PointerPolicy::Strict => {
                if ptr >= 0 && (ptr as usize) < len {
                    Ok(ptr as usize)
                } else {
                    Err(ExecError::MemoryOutOfBounds {
                        mem_ptr: ptr,
                        memory_size: len,
                    })
                }
            }
            PointerPolicy::Wrap => Ok(ptr.rem_euclid(len as isize) as usize),
        }
    }

    pub fn read(&self, ptr: isize) -> Result<u8, ExecError> {
        Ok(self.cells[self.index(ptr)?])
    }

    pub fn write(&mut self, ptr: isize, value: u8) -> Result<(), ExecError> {
        let idx = self.index(ptr)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Add `delta` to the cell at `ptr`, wrapping modulo 256.
    pub fn add(&mut self, ptr: isize, delta: u8) -> Result<(), ExecError> {
        let idx = self.index(ptr)?;
        self.cells[idx] = self.cells[idx].wrapping_add(delta);
        Ok(())
    }

    /// Subtract `delta` from the cell at `ptr`, wrapping modulo 256.
    pub fn sub(&mut self, ptr: isize, delta: u8) -> Result<(), ExecError> {
        let idx = self.index(ptr)?;
        self.cells[idx] = self.cells[idx].wrapping_sub(delta);
        Ok(())
    }
}
