//! # shaderpp
//!
//! A C-style preprocessor for HLSL-like shader source.
//!
//! The preprocessor consumes one named root translation unit plus an include
//! resolver and a set of predefined macros, and either streams preprocessed
//! tokens back to a consumer ([preprocessor::Preprocessor::next_token]) or
//! flattens them into reformatted text with a collected error list
//! ([output::preprocess]).  It handles `#include`, `#line`, `#define` (without
//! parameters), `#undef`, `#ifdef`/`#ifndef`/`#else`/`#endif`, and `#error`.
//! There is no macro expansion engine and no `#if` expression evaluator:
//! defined names only drive conditionals, and `#if`/`#elif` are reported as
//! unsupported.
//!
//! Errors never stop a run.  They are delivered in-band, interleaved with the
//! tokens that survive them, so one pass reports as many problems as
//! practical.
//!
//! The `shaderpp` binary is a thin front-end over [output::preprocess].
//!
//! # License
//!
//! Copyright © 2026 The shaderpp authors.
//!
//! This program is free software: you can redistribute it and/or modify it under
//! the terms of the [GNU General Public License] as published by the Free Software
//! Foundation, either version 3 of the License, or (at your option) any later
//! version.
//!
//! This program is distributed in the hope that it will be useful, but WITHOUT
//! ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
//! FOR A PARTICULAR PURPOSE.  See the [GNU General Public License] for more
//! details.
//!
//! [GNU General Public License]: http://www.gnu.org/licenses/

pub mod defines;
pub mod error;
pub mod include;
pub mod output;
pub mod preprocessor;
pub mod scan;
pub mod token;
