//! Operator input
//!
//! Encoder decoding, the field table, selection state and routing.

pub mod encoder;
pub mod fields;
pub mod router;
pub mod selection;

pub use encoder::{Direction, EncoderDecoder, Step};
pub use fields::{Field, FieldDescriptor, FieldKind, FIELDS, FIELD_COUNT};
pub use router::{ButtonOutcome, InputRouter};
pub use selection::Selection;
