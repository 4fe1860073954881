//! Annotation data model and stored-body codec
//!
//! An annotation pairs a store-assigned identity with page-scoped
//! metadata, an optional highlight anchor, and the author's comment text.
//! The codec embeds that metadata in a marker inside the store's
//! free-text body format and recovers it losslessly on the way back.

pub mod codec;
mod service;
mod types;

pub use codec::{decode, encode, page_label, EncodedAnnotation, CATEGORY_LABEL};
pub use service::{AnnotationError, AnnotationService};
pub use types::{Annotation, AnnotationId, AnnotationMeta, Highlight, PageIndex};
