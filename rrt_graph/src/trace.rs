//! Convenience macros for _very_ verbose logging of the planner's inner loop.
//! Compiled out unless the `verbose` feature is enabled.

#[macro_export]
macro_rules! trace {
    ($($stuff:tt)* ) => {
        #[cfg(feature = "verbose")]
        tracing::trace!($($stuff)*);
    }
}

#[macro_export]
macro_rules! debug {
    ($($stuff:tt)* ) => {
        #[cfg(feature = "verbose")]
        tracing::debug!($($stuff)*);
    }
}
