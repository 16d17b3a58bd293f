//! Value objects - immutable, identity-less domain types

mod settings;

pub use settings::SheetSettings;
