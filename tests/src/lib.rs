//! Cross-crate tests: the scan engine, cache, merge and vendor table working
//! together against a simulated link.

#[cfg(test)]
mod discovery;
#[cfg(test)]
mod support;
