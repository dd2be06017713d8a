// Host-shell persistence: the editor's document tree saved and loaded as a UTF-8 JSON blob.
// The layout core never sees documents.

pub mod handlers;
pub mod model;
pub mod store;
