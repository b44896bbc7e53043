pub(crate) mod distribute;
pub(crate) mod reveal;
