pub mod pprof;
pub mod shared_str;
pub mod value_unit;

pub use shared_str::SharedStr;
pub use value_unit::ValueUnit;
