//! Adapters from wire response shapes into the typed hit models.

pub(crate) mod hit;
