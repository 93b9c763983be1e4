//! Host-side harness for the Morse transmitter


#[cfg(test)]
mod symbol_tests;
#[cfg(test)]
mod timeline_tests;
#[cfg(test)]
mod hardware_tests;
#[cfg(test)]
mod property_tests;
