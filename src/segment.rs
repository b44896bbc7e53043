pub(crate) mod boundary;
pub(crate) mod cells;
pub(crate) mod components;
