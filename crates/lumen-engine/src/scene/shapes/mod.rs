pub(crate) mod border;
pub(crate) mod rect;
pub(crate) mod scissor;
pub(crate) mod text;
