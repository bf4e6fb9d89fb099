// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common crate for the track derivation pipeline
//!
//! Provides the common data types that are used across every crate.

pub mod constants;
pub mod position;
pub mod raw;
pub mod sample;
pub mod test_helper;
pub mod wind;

#[cfg(test)]
mod tests;
