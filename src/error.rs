use failure::Fail;

/// Everything the wheel can refuse to do. None of these are fatal: the
/// caller logs them and carries on with the state it already had.
#[derive(Debug, Clone, PartialEq, Eq, Fail)]
pub enum SpinError {
    #[fail(display = "at least {} items are needed, got {}", required, count)]
    TooFewItems { count: usize, required: usize },
    #[fail(display = "the wheel is already spinning")]
    AlreadySpinning,
    #[fail(display = "items cannot change while the wheel is spinning")]
    ItemsLocked,
    #[fail(display = "item label cannot be empty")]
    EmptyLabel,
    #[fail(display = "no item with id {}", _0)]
    UnknownItem(String),
    #[fail(display = "invalid color {:?}", _0)]
    InvalidColor(String),
}

impl SpinError {
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            SpinError::TooFewItems { .. } | SpinError::AlreadySpinning | SpinError::ItemsLocked
        )
    }
}
