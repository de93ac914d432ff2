mod catalog;
mod exam;
mod section;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use catalog::CatalogView;
pub use exam::ExamView;
pub use section::SectionView;
pub use state::{ViewError, ViewState};

#[cfg(test)]
pub(crate) use test_harness::drive_dom;
