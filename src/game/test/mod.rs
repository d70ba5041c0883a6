//! Tests for the game engine, organised by the part of the rules they exercise.

#![cfg(test)]
#![allow(clippy::bool_assert_comparison)]

pub mod government;
pub mod integration;
