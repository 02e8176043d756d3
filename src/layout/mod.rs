pub(crate) mod flex;
