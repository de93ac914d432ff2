#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::NotFound => "That page does not exist in this course.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Ready(T),
    Error(ViewError),
}

impl<T> ViewState<T> {
    /// `NotFound` when the lookup came back empty.
    #[must_use]
    pub fn found(value: Option<T>) -> Self {
        value.map_or(ViewState::Error(ViewError::NotFound), ViewState::Ready)
    }
}
