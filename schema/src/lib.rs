// Mikamon Schema - Shared type definitions
// Static vocabulary shared by the character catalog data files and the
// battle core: element types and their matchup chart, move records, and
// character templates.

pub use character_data::*;
pub use element_types::*;
pub use move_data::*;

pub mod character_data;
pub mod element_types;
pub mod move_data;
