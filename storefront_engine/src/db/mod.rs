#[cfg(feature = "hosted")]
pub mod hosted;
#[cfg(any(feature = "memory", test))]
pub mod memory;
