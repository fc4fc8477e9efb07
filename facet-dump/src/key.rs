//! Rendering map keys as plain names

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::{String, ToString};

use facet_reflect::Peek;

/// Render a map key as a plain name, if its type allows it.
///
/// Text, `bool`, `u8`, `isize`, `i32`, `i64`, `f32` and `f64` keys succeed.
/// Floats are printed with ten fractional digits. Every other key type,
/// including newtypes around the supported ones, yields `None`.
pub fn stringify_key(key: Peek<'_, '_>) -> Option<String> {
    if let Ok(text) = key.get::<String>() {
        return Some(text.clone());
    }
    if let Ok(text) = key.get::<&str>() {
        return Some((*text).to_owned());
    }
    if let Ok(flag) = key.get::<bool>() {
        return Some(flag.to_string());
    }
    if let Ok(byte) = key.get::<u8>() {
        return Some(byte.to_string());
    }
    if let Ok(int) = key.get::<isize>() {
        return Some(int.to_string());
    }
    if let Ok(int) = key.get::<i32>() {
        return Some(int.to_string());
    }
    if let Ok(int) = key.get::<i64>() {
        return Some(int.to_string());
    }
    if let Ok(float) = key.get::<f32>() {
        return Some(format!("{:.10}", f64::from(*float)));
    }
    if let Ok(float) = key.get::<f64>() {
        return Some(format!("{float:.10}"));
    }
    None
}
