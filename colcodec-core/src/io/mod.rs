mod buf;

pub use buf::{BufExt, ShortRead};
