/*-
 * Sasl-rs - a client side SASL authentification library
 * Copyright (C) 2021-2022  Aleksandr Morozov
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use getrandom::getrandom;

use crate::sasl_error::{SaslResult, SaslRuntimeError, SaslErrorCode};
use crate::sasl_error_map;

pub struct ScramCommon{}
impl ScramCommon
{
    /// A number of characters to generate for the client nonce. The
    /// examples in RFC 5802 use 24 character nonces and say nothing
    /// about the length, so 24 it is.
    pub const SCRAM_NONCE_LEN: usize = 24;

    /// The dictionary of characters allowed in nonce values: the
    /// printable ASCII range 0x21..=0x7E without the comma.
    pub const PRINTABLES: &'static [u8] =
        b"!\"#$%&'()*+-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

    /// Generates a random secuence of bytes
    ///
    /// # Arguments
    ///
    /// * `len` - a length of the array
    ///
    /// # Returns
    ///
    /// * [SaslResult] Ok - elements or Error
    pub
    fn sc_random(len: usize) -> SaslResult<Vec<u8>>
    {
        let mut data = vec![0_u8; len];

        getrandom(&mut data)
            .map_err(|e|
                sasl_error_map!(SaslErrorCode::ExternalError, "sasl getrandom err, {}", e)
            )?;

        return Ok(data);
    }

    /// Generates a cryptographically strong client nonce of
    /// [ScramCommon::SCRAM_NONCE_LEN] characters from
    /// [ScramCommon::PRINTABLES].
    ///
    /// One character is picked per random byte by reducing the byte
    /// modulo the dictionary size. 256 is not a multiple of the
    /// dictionary size so the pick is slightly biased, which is
    /// acceptable for a nonce of this length.
    pub
    fn make_nonce() -> SaslResult<String>
    {
        let random_bytes = ScramCommon::sc_random(ScramCommon::SCRAM_NONCE_LEN)?;

        let mut nonce = String::with_capacity(ScramCommon::SCRAM_NONCE_LEN);

        for random_byte in random_bytes
        {
            nonce.push(ScramCommon::PRINTABLES[random_byte as usize % ScramCommon::PRINTABLES.len()] as char);
        }

        return Ok(nonce);
    }

    /// Applies the SASLprep profile (RFC 4013) of the stringprep
    /// algorithm (RFC 3454) to the input.
    ///
    /// TODO: currently a pass-through which is correct for ASCII only;
    /// full SASLprep normalization is required to accept non-ASCII
    /// passwords.
    pub
    fn normalize(input: &str) -> Vec<u8>
    {
        return Vec::from(input.as_bytes());
    }
}

impl ScramCommon
{
    /// A printable char passes through, anything else becomes its
    /// `\xNN` escaped UTF-8 bytes.
    pub(crate)
    fn sanitize_char(c: char) -> String
    {
        if c.is_ascii_graphic() == true
        {
            return c.to_string();
        }

        let mut buf = [0_u8; 4];
        c.encode_utf8(&mut buf);

        return
            buf[0..c.len_utf8()]
                .into_iter()
                .map(|b| format!("\\x{:02x}", b))
                .collect();
    }

    /// Makes a server supplied string safe to embed in an error or
    /// diagnostic message.
    pub(crate)
    fn sanitize_str(st: &str) -> String
    {
        let mut out = String::with_capacity(st.len());

        for c in st.chars()
        {
            if c == ' '
            {
                out.push(c);
            }
            else
            {
                out.push_str(&ScramCommon::sanitize_char(c));
            }
        }

        return out;
    }
}

#[test]
fn sanitize()
{
    let res = ScramCommon::sanitize_str("b\n\0p234");

    assert_eq!(res.as_str(), "b\\x0a\\x00p234");
}

#[test]
fn nonce_shape()
{
    let nonce = ScramCommon::make_nonce().unwrap();

    assert_eq!(nonce.len(), ScramCommon::SCRAM_NONCE_LEN);

    for c in nonce.chars()
    {
        assert_eq!(c.is_ascii_graphic(), true);
        assert_ne!(c, ',');
    }
}

#[test]
fn printables_hold_graph_minus_comma()
{
    assert_eq!(ScramCommon::PRINTABLES.contains(&b','), false);

    for b in 0x21_u8..=0x7e_u8
    {
        if b != b','
        {
            assert_eq!(ScramCommon::PRINTABLES.contains(&b), true);
        }
    }
}
