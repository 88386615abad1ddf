/*-
 * Sasl-rs - a client side SASL authentification library
 * Copyright (C) 2021-2022  Aleksandr Morozov
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Sasl-RS
//!
//! Provides the client side of SASL authentification:
//! - PLAIN
//! - LOGIN
//! - SCRAM: SHA1, SHA256, SHA512
//!
//! All mechanisms share one interface, [Mechanism]. The caller sets the
//! credentials, then feeds server messages one at a time and transmits
//! whatever comes back, until the mechanism returns an empty string.
//! Outcome is read from [Mechanism::succeeded] and [Mechanism::faulted].
//!
//! For usage see ./demos/
//!
//! Files:
//! - sasl_mechanism.rs contains the interface common to all mechanisms
//! - sasl_plain.rs the PLAIN (RFC 4616) mechanism
//! - sasl_login.rs the LOGIN mechanism
//! - sasl_diag.rs the diagnostics publisher/subscriber sideband
//! - sasl_error.rs error reporting code
//! - scram_client.rs the SCRAM (RFC 5802) client state machine
//! - scram_parser.rs a parser of the server SCRAM messages
//! - scram_hashing.rs all supported hashers implementation
//! - scram_common.rs a common SCRAM code (nonce, normalization)

pub mod sasl_mechanism;
pub mod sasl_plain;
pub mod sasl_login;
pub mod sasl_diag;
pub mod sasl_error;
pub mod scram_client;
pub mod scram_hashing;
pub mod scram_common;
pub(crate) mod scram_parser;

pub use self::sasl_mechanism::Mechanism;
pub use self::sasl_plain::Plain;
pub use self::sasl_login::Login;
pub use self::sasl_diag::{DiagnosticDelegate, DiagnosticsSender, UnsubscribeHandle};
pub use self::sasl_error::{SaslErrorCode, SaslResult, SaslRuntimeError};
pub use self::scram_client::Scram;
pub use self::scram_common::ScramCommon;
pub use self::scram_hashing::*;
