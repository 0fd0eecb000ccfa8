/// Size of one balloon buffer.
pub const BALLOON_SIZE: usize = 1024 * 1024;

/// One pinned buffer. The backing allocation is what the native driver
/// unmaps from physical memory while the buffer stays registered.
pub struct Balloon {
    data: Box<[u8]>,
}

impl Balloon {
    fn new() -> Self {
        Self {
            data: vec![0u8; BALLOON_SIZE].into_boxed_slice(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Native pinning agent boundary. Both operations return whether a
/// collection occurred during the call; when one did, the operation did not
/// take effect and the caller retries.
pub trait BalloonDriver {
    fn register(&mut self, buffer: &[u8]) -> bool;

    fn unregister(&mut self, buffer: &[u8]) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateOutcome {
    Inflated,
    /// A collection ran during registration; the buffer was discarded and
    /// the caller should allocate a fresh one by calling again.
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeflateOutcome {
    Deflated,
    /// A collection ran during unregistration; the stack is unchanged.
    Retry,
    /// Nothing to deflate. A state, not an error.
    Empty,
}

/// Stack of registered balloons, kept in lockstep with the driver: a buffer
/// is on the stack exactly when the driver has it registered.
pub struct BalloonRegistry {
    driver: Box<dyn BalloonDriver>,
    balloons: Vec<Balloon>,
}

impl BalloonRegistry {
    pub fn new(driver: Box<dyn BalloonDriver>) -> Self {
        Self {
            driver,
            balloons: Vec::new(),
        }
    }

    /// Allocates and registers one balloon. On `Retry` the buffer is
    /// dropped rather than re-submitted: the native layer may have
    /// partially ingested it.
    pub fn inflate(&mut self) -> InflateOutcome {
        let balloon = Balloon::new();
        if self.driver.register(balloon.data()) {
            return InflateOutcome::Retry;
        }
        self.balloons.push(balloon);
        InflateOutcome::Inflated
    }

    /// Unregisters and releases the most recently registered balloon. The
    /// top of the stack is peeked, not popped, until the driver confirms:
    /// on `Retry` the stack is left as it was.
    pub fn deflate(&mut self) -> DeflateOutcome {
        let Some(top) = self.balloons.last() else {
            return DeflateOutcome::Empty;
        };
        if self.driver.unregister(top.data()) {
            return DeflateOutcome::Retry;
        }
        self.balloons.pop();
        DeflateOutcome::Deflated
    }

    pub fn len(&self) -> usize {
        self.balloons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balloons.is_empty()
    }
}
