#![macro_use]
#![allow(unused_macros)]

// Log through defmt on the board, through the `log` facade on a host, or not
// at all. Arguments must implement both `defmt::Format` and `Display`.

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "logging")]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(all(feature = "log", not(feature = "logging")))]
            ::log::trace!($s $(, $x)*);
            #[cfg(not(any(feature = "log", feature = "logging")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "logging")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(all(feature = "log", not(feature = "logging")))]
            ::log::debug!($s $(, $x)*);
            #[cfg(not(any(feature = "log", feature = "logging")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "logging")]
            ::defmt::info!($s $(, $x)*);
            #[cfg(all(feature = "log", not(feature = "logging")))]
            ::log::info!($s $(, $x)*);
            #[cfg(not(any(feature = "log", feature = "logging")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "logging")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(all(feature = "log", not(feature = "logging")))]
            ::log::warn!($s $(, $x)*);
            #[cfg(not(any(feature = "log", feature = "logging")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "logging")]
            ::defmt::error!($s $(, $x)*);
            #[cfg(all(feature = "log", not(feature = "logging")))]
            ::log::error!($s $(, $x)*);
            #[cfg(not(any(feature = "log", feature = "logging")))]
            let _ = ($( & $x ),*);
        }
    };
}
