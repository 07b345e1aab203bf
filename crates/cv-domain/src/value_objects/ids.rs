//! Strongly-typed identifiers.

crate::define_id!(SessionId, "Identifier for a CodeSession");
crate::define_id!(MessageId, "Identifier for a CodeMessage");
crate::define_id!(EditId, "Identifier for an Edit");
