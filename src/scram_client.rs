/*-
 * Sasl-rs - a client side SASL authentification library
 * Copyright (C) 2021-2022  Aleksandr Morozov
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;
use std::num::NonZeroU32;

use base64::Engine;
use base64::engine::general_purpose;

use crate::sasl_diag::{DiagnosticDelegate, DiagnosticsSender, UnsubscribeHandle};
use crate::sasl_error::{SaslResult, SaslRuntimeError, SaslErrorCode};
use crate::sasl_error;
use crate::sasl_mechanism::Mechanism;
use crate::scram_common::ScramCommon;
use crate::scram_hashing::ScramHashing;
use crate::scram_parser::ScramDataParser;

/// Order:
/// Client creates instance and/or sets credentials: ClientNonce
///
/// Client sends first message (initial response or first proceed) and
/// sets state: ServerChallenge
///
/// Client receives challenge, sends proof and sets state:
/// ServerSignature
///
/// Client receives verifier and sets state: Done
#[derive(PartialEq, Clone)]
enum Step
{
    /// The client provides the username and nonce, no server message
    /// was consumed yet
    ClientNonce,

    /// The client waits for the challenge (nonce, salt, iterations)
    ServerChallenge,

    /// The client waits for the signature computed by the server
    ServerSignature,

    /// No further client or server messages are expected
    Done,
}

impl fmt::Display for Step
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match *self
        {
            Self::ClientNonce     => write!(f, "ClientNonce"),
            Self::ServerChallenge => write!(f, "ServerChallenge"),
            Self::ServerSignature => write!(f, "ServerSignature"),
            Self::Done            => write!(f, "Done"),
        }
    }
}

/// The hash primitive captured from a [ScramHashing] provider as plain
/// fn pointers, so the mechanism stays object safe behind
/// [Mechanism].
#[derive(Clone, Copy)]
struct ScramHasher
{
    hash: fn(&[u8]) -> Vec<u8>,
    hmac: fn(&[u8], &[u8]) -> SaslResult<Vec<u8>>,
    derive: fn(&[u8], &[u8], NonZeroU32) -> SaslResult<Vec<u8>>,
    scram_name: &'static str,
}

/// The SCRAM (RFC 5802) client mechanism.
///
/// The hash function is not hardwired: register one of the shipped
/// [ScramHashing] providers (or your own) with
/// [Scram::set_hash_function] before setting credentials. A fresh
/// client nonce is drawn and the first messages are rebuilt on every
/// [Mechanism::set_credentials] call.
///
/// The password passes through an ASCII SASLprep
/// ([ScramCommon::normalize]); the mechanism performs no transport
/// base64, only the RFC mandated base64 of the GS2 header, salt and
/// proof subfields.
pub struct Scram
{
    diag: DiagnosticsSender,

    /// A current state step
    step: Step,

    /// The registered hash primitive
    hasher: Option<ScramHasher>,

    /// The SASLprep normalized password
    normalized_password: Vec<u8>,

    /// Base64 of the GS2 header, sent as the `c=` attribute
    encoded_channel_binding: String,

    /// A client generated nonce
    client_nonce: String,

    /// The cached text of the first client message
    client_first_message: String,

    /// Same without the GS2 header
    client_first_message_bare: String,

    /// The signature the server is expected to present to prove it
    /// holds the same secret
    server_signature: Vec<u8>,

    succeeded: bool,
    faulted: bool,
}

impl Scram
{
    pub
    fn new() -> Self
    {
        return
            Self
            {
                diag: DiagnosticsSender::new("Scram"),
                step: Step::ClientNonce,
                hasher: None,
                normalized_password: Vec::new(),
                encoded_channel_binding: String::new(),
                client_nonce: String::new(),
                client_first_message: String::new(),
                client_first_message_bare: String::new(),
                server_signature: Vec::new(),
                succeeded: false,
                faulted: false,
            };
    }

    /// Registers the hash primitive to run the SCRAM algorithm on.
    ///
    /// Must be called before the authentification starts. The provider
    /// carries the hash, its HMAC and its PBKDF2 along with the block
    /// and digest sizes the RFC construction depends on.
    pub
    fn set_hash_function<S: ScramHashing>(&mut self)
    {
        self.hasher =
            Some(
                ScramHasher
                {
                    hash: S::hash,
                    hmac: S::hmac,
                    derive: S::derive,
                    scram_name: S::scram_name(),
                }
            );
    }

    /// Computes the reply to the server challenge: parses the
    /// challenge, derives the proof and retains the expected server
    /// signature. Any error is turned into the `faulted` latch by the
    /// caller.
    fn server_challenge(&mut self, message: &str) -> SaslResult<String>
    {
        let hasher = match self.hasher
        {
            Some(h) => h,
            None => sasl_error!(SaslErrorCode::InternalError,
                                "state: '{}', no hash function was registered", self.step),
        };

        let parsed = ScramDataParser::server_first(message, &self.client_nonce)?;

        self.step = Step::ServerSignature;

        let salted_password =
            (hasher.derive)(&self.normalized_password, &parsed.salt, parsed.iterations)?;

        let client_key = (hasher.hmac)(b"Client Key", &salted_password)?;
        let stored_key = (hasher.hash)(&client_key);

        let client_final_without_proof =
            [
                "c=", self.encoded_channel_binding.as_str(),
                ",r=", parsed.server_nonce,
            ].concat();

        let auth_message =
            [
                self.client_first_message_bare.as_str(),
                ",", message,
                ",", client_final_without_proof.as_str(),
            ].concat();

        let client_signature = (hasher.hmac)(auth_message.as_bytes(), &stored_key)?;
        let client_proof = ScramDataParser::xor_arrays(&client_key, &client_signature)?;

        let server_key = (hasher.hmac)(b"Server Key", &salted_password)?;
        self.server_signature = (hasher.hmac)(auth_message.as_bytes(), &server_key)?;

        self.diag.send(0, &format!("C: {},p=*******", client_final_without_proof));

        return
            Ok(
                [
                    client_final_without_proof.as_str(),
                    ",p=", &general_purpose::STANDARD.encode(client_proof),
                ].concat()
            );
    }
}

impl Mechanism for Scram
{
    fn subscribe_to_diagnostics(
        &mut self,
        delegate: DiagnosticDelegate,
        min_level: usize
    ) -> UnsubscribeHandle
    {
        return self.diag.subscribe(delegate, min_level);
    }

    /// Re-initializes the whole session: normalizes the password, draws
    /// a fresh client nonce, rebuilds the cached first messages and the
    /// encoded GS2 header, rewinds the step and clears the outcome
    /// flags.
    fn set_credentials(
        &mut self,
        credentials: &str,
        authentication_identity: &str,
        authorization_identity: &str
    )
    {
        self.step = Step::ClientNonce;
        self.server_signature.clear();
        self.succeeded = false;
        self.faulted = false;

        self.normalized_password = ScramCommon::normalize(credentials);

        self.client_nonce = match ScramCommon::make_nonce()
        {
            Ok(r) => r,
            Err(_) =>
            {
                // the random source is gone, nothing sane can be sent
                self.faulted = true;

                return;
            },
        };

        self.client_first_message_bare =
            [
                "n=", authentication_identity,
                ",r=", self.client_nonce.as_str(),
            ].concat();

        let gs2_header = ["n,", authorization_identity, ","].concat();

        self.client_first_message =
            [
                gs2_header.as_str(),
                self.client_first_message_bare.as_str(),
            ].concat();

        self.encoded_channel_binding = general_purpose::STANDARD.encode(&gs2_header);
    }

    fn get_initial_response(&mut self) -> String
    {
        self.diag.send(0, &format!("C: AUTH SCRAM* {}", self.client_first_message));

        return self.client_first_message.clone();
    }

    fn proceed(&mut self, message: &str) -> String
    {
        if self.faulted == true
        {
            return String::new();
        }

        match self.step
        {
            Step::ClientNonce =>
            {
                self.step = Step::ServerChallenge;

                self.diag.send(0, &format!("C: AUTH SCRAM* {}", self.client_first_message));

                return self.client_first_message.clone();
            },
            Step::ServerChallenge =>
            {
                match self.server_challenge(message)
                {
                    Ok(r) => return r,
                    Err(_) =>
                    {
                        self.faulted = true;

                        return String::new();
                    },
                }
            },
            Step::ServerSignature =>
            {
                self.step = Step::Done;

                let expected =
                    [
                        "v=",
                        &general_purpose::STANDARD.encode(&self.server_signature),
                    ].concat();

                if message == expected
                {
                    self.succeeded = true;
                }

                return String::new();
            },
            Step::Done => return String::new(),
        }
    }

    fn succeeded(&self) -> bool
    {
        return self.succeeded;
    }

    fn faulted(&self) -> bool
    {
        return self.faulted;
    }

    /// Clears the outcome flags only. The step, nonce and cached
    /// messages are left as they are; to restart the exchange call
    /// [Mechanism::set_credentials] again.
    fn reset(&mut self)
    {
        self.succeeded = false;
        self.faulted = false;
    }

    fn mechanism_name(&self) -> &'static str
    {
        match self.hasher
        {
            Some(h) => return h.scram_name,
            None => return "SCRAM",
        }
    }
}
