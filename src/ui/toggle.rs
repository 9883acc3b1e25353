//! Boolean flag with a flip operation.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Toggle(bool);

impl Toggle {
    #[must_use]
    pub fn new(initial: bool) -> Self {
        Self(initial)
    }

    #[must_use]
    pub fn get(self) -> bool {
        self.0
    }

    pub fn toggle(&mut self) {
        self.0 = !self.0;
    }

    pub fn set(&mut self, value: bool) {
        self.0 = value;
    }

    /// The flipped value, leaving `self` untouched.
    #[must_use]
    pub fn toggled(self) -> Self {
        Self(!self.0)
    }
}
