pub mod work;

pub use work::{work_fn, Work, WorkFn};
