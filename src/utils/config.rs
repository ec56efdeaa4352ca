//! Helpers for configuration values.

//------------ DefMinMax -----------------------------------------------------

/// The default value and the permitted range of a config variable.
#[derive(Clone, Copy, Debug)]
pub struct DefMinMax<T> {
    def: T,
    min: T,
    max: T,
}

impl<T: Copy + Ord> DefMinMax<T> {
    /// Creates a new value.
    pub const fn new(def: T, min: T, max: T) -> Self {
        Self { def, min, max }
    }

    /// Returns the default value.
    pub fn default(self) -> T {
        self.def
    }

    /// Trims the given value to fit into the permitted range.
    pub fn limit(self, value: T) -> T {
        value.clamp(self.min, self.max)
    }
}

//============ Testing =======================================================
