use std::fmt;

/// A synapse towards the unit at index `output`.
#[derive(Clone, Copy, PartialEq)]
pub struct Connection {
    pub output: usize,
    pub weight: f64,
}

impl Connection {
    pub fn new(output: usize, weight: f64) -> Connection {
        Connection { output, weight }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-> {} ({:.6})", self.output, self.weight)
    }
}
