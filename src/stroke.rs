pub(crate) mod anchor;
pub(crate) mod group;
pub(crate) mod orient;
pub(crate) mod search;
pub(crate) mod synth;
