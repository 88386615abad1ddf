/*-
 * Sasl-rs - a client side SASL authentification library
 * Copyright (C) 2021-2022  Aleksandr Morozov
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::num::NonZeroU32;

use crate::sasl_error::SaslResult;

/// The hash primitive a [crate::Scram] instance runs on. The embedder
/// picks one of the shipped providers or implements the trait for any
/// other hash function.
///
/// `hmac` is the RFC 2104 construction over the hash's own block size,
/// and `derive` is PBKDF2 with that HMAC as the PRF, producing a key of
/// exactly one digest length. Both contracts are what RFC 5802 requires
/// of the underlying hash.
pub trait ScramHashing
{
    /// A function which hashes the data using the hash function.
    fn hash(data: &[u8]) -> Vec<u8>;

    /// A function which performs an HMAC using the hash function.
    fn hmac(data: &[u8], key: &[u8]) -> SaslResult<Vec<u8>>;

    /// A function which does PBKDF2 key derivation using the hash
    /// function. The derived key is one digest long.
    fn derive(password: &[u8], salt: &[u8], iterations: NonZeroU32) -> SaslResult<Vec<u8>>;

    /// The SASL registry name of the SCRAM variant this hash backs,
    /// i.e "SCRAM-SHA-256".
    fn scram_name() -> &'static str;
}

#[cfg(feature = "use_default")]
pub mod rust_native
{
    use std::num::NonZeroU32;

    use hmac::{Mac, SimpleHmac};
    use hmac::digest::core_api::BlockSizeUser;
    use sha1::{Sha1, Digest};
    use sha2::{Sha256, Sha512};
    use pbkdf2::pbkdf2;

    use crate::sasl_error::{SaslResult, SaslRuntimeError, SaslErrorCode};
    use crate::sasl_error_map;
    use crate::scram_hashing::ScramHashing;

    /// One digest of the input.
    fn hash_with<D: Digest>(data: &[u8]) -> Vec<u8>
    {
        return Vec::from(D::digest(data).as_slice());
    }

    /// The RFC 2104 construction keyed over the block size of `D`.
    fn hmac_with<D>(data: &[u8], key: &[u8]) -> SaslResult<Vec<u8>>
    where
        D: Digest + BlockSizeUser + Clone
    {
        let mut mac =
            SimpleHmac::<D>::new_from_slice(key)
                .map_err(|e|
                    sasl_error_map!(SaslErrorCode::ExternalError, "hmac() key err, {}", e)
                )?;

        mac.update(data);

        return Ok( Vec::from(mac.finalize().into_bytes().as_slice()) );
    }

    /// PBKDF2 with HMAC-`D` as the PRF, one digest of output.
    fn derive_with<D>(password: &[u8], salt: &[u8], iterations: NonZeroU32) -> SaslResult<Vec<u8>>
    where
        D: Digest + BlockSizeUser + Clone + Sync
    {
        let mut salted = vec![0; <D as Digest>::output_size()];

        pbkdf2::<SimpleHmac<D>>(password, salt, iterations.get(), &mut salted)
            .map_err(|e|
                sasl_error_map!(SaslErrorCode::ExternalError, "pbkdf2 derive err, {}", e)
            )?;

        return Ok(salted);
    }

    /// A [ScramHashing] which provides SCRAM-SHA-1 based on the PBKDF2,
    /// Sha, Hmac
    pub struct ScramSha1RustNative;

    impl ScramHashing for ScramSha1RustNative
    {
        fn hash(data: &[u8]) -> Vec<u8>
        {
            return hash_with::<Sha1>(data);
        }

        fn hmac(data: &[u8], key: &[u8]) -> SaslResult<Vec<u8>>
        {
            return hmac_with::<Sha1>(data, key);
        }

        fn derive(password: &[u8], salt: &[u8], iterations: NonZeroU32) -> SaslResult<Vec<u8>>
        {
            return derive_with::<Sha1>(password, salt, iterations);
        }

        fn scram_name() -> &'static str
        {
            return "SCRAM-SHA-1";
        }
    }

    /// A [ScramHashing] which provides SCRAM-SHA-256 based on the
    /// PBKDF2, Sha, Hmac
    pub struct ScramSha256RustNative;

    impl ScramHashing for ScramSha256RustNative
    {
        fn hash(data: &[u8]) -> Vec<u8>
        {
            return hash_with::<Sha256>(data);
        }

        fn hmac(data: &[u8], key: &[u8]) -> SaslResult<Vec<u8>>
        {
            return hmac_with::<Sha256>(data, key);
        }

        fn derive(password: &[u8], salt: &[u8], iterations: NonZeroU32) -> SaslResult<Vec<u8>>
        {
            return derive_with::<Sha256>(password, salt, iterations);
        }

        fn scram_name() -> &'static str
        {
            return "SCRAM-SHA-256";
        }
    }

    /// A [ScramHashing] which provides SCRAM-SHA-512 based on the
    /// PBKDF2, Sha, Hmac
    pub struct ScramSha512RustNative;

    impl ScramHashing for ScramSha512RustNative
    {
        fn hash(data: &[u8]) -> Vec<u8>
        {
            return hash_with::<Sha512>(data);
        }

        fn hmac(data: &[u8], key: &[u8]) -> SaslResult<Vec<u8>>
        {
            return hmac_with::<Sha512>(data, key);
        }

        fn derive(password: &[u8], salt: &[u8], iterations: NonZeroU32) -> SaslResult<Vec<u8>>
        {
            return derive_with::<Sha512>(password, salt, iterations);
        }

        fn scram_name() -> &'static str
        {
            return "SCRAM-SHA-512";
        }
    }
}

#[cfg(feature = "use_default")]
pub use self::rust_native::*;

#[cfg(feature = "use_ring")]
pub mod ring_based
{
    use std::num::NonZeroU32;

    use ring::{digest as ring_digest, hmac as ring_hmac, pbkdf2 as ring_pbkdf2};

    use crate::sasl_error::SaslResult;
    use crate::scram_hashing::ScramHashing;

    fn hash_with(algorithm: &'static ring_digest::Algorithm, data: &[u8]) -> Vec<u8>
    {
        let hash = ring_digest::digest(algorithm, data);

        return Vec::from(hash.as_ref());
    }

    fn hmac_with(algorithm: ring_hmac::Algorithm, data: &[u8], key: &[u8]) -> SaslResult<Vec<u8>>
    {
        let s_key = ring_hmac::Key::new(algorithm, key);
        let mut mac = ring_hmac::Context::with_key(&s_key);

        mac.update(data);

        return Ok( mac.sign().as_ref().into() );
    }

    fn derive_with(
        algorithm: ring_pbkdf2::Algorithm,
        digest_len: usize,
        password: &[u8],
        salt: &[u8],
        iterations: NonZeroU32
    ) -> SaslResult<Vec<u8>>
    {
        let mut salted = vec![0; digest_len];

        ring_pbkdf2::derive(algorithm, iterations.into(), salt, password, &mut salted);

        return Ok(salted);
    }

    /// A [ScramHashing] which provides SCRAM-SHA-1 based on the Ring
    pub struct ScramSha1Ring;

    impl ScramHashing for ScramSha1Ring
    {
        fn hash(data: &[u8]) -> Vec<u8>
        {
            return hash_with(&ring_digest::SHA1_FOR_LEGACY_USE_ONLY, data);
        }

        fn hmac(data: &[u8], key: &[u8]) -> SaslResult<Vec<u8>>
        {
            return hmac_with(ring_hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, data, key);
        }

        fn derive(password: &[u8], salt: &[u8], iterations: NonZeroU32) -> SaslResult<Vec<u8>>
        {
            return
                derive_with(
                    ring_pbkdf2::PBKDF2_HMAC_SHA1,
                    ring_digest::SHA1_OUTPUT_LEN,
                    password,
                    salt,
                    iterations
                );
        }

        fn scram_name() -> &'static str
        {
            return "SCRAM-SHA-1";
        }
    }

    /// A [ScramHashing] which provides SCRAM-SHA-256 based on the Ring
    pub struct ScramSha256Ring;

    impl ScramHashing for ScramSha256Ring
    {
        fn hash(data: &[u8]) -> Vec<u8>
        {
            return hash_with(&ring_digest::SHA256, data);
        }

        fn hmac(data: &[u8], key: &[u8]) -> SaslResult<Vec<u8>>
        {
            return hmac_with(ring_hmac::HMAC_SHA256, data, key);
        }

        fn derive(password: &[u8], salt: &[u8], iterations: NonZeroU32) -> SaslResult<Vec<u8>>
        {
            return
                derive_with(
                    ring_pbkdf2::PBKDF2_HMAC_SHA256,
                    ring_digest::SHA256_OUTPUT_LEN,
                    password,
                    salt,
                    iterations
                );
        }

        fn scram_name() -> &'static str
        {
            return "SCRAM-SHA-256";
        }
    }

    /// A [ScramHashing] which provides SCRAM-SHA-512 based on the Ring
    pub struct ScramSha512Ring;

    impl ScramHashing for ScramSha512Ring
    {
        fn hash(data: &[u8]) -> Vec<u8>
        {
            return hash_with(&ring_digest::SHA512, data);
        }

        fn hmac(data: &[u8], key: &[u8]) -> SaslResult<Vec<u8>>
        {
            return hmac_with(ring_hmac::HMAC_SHA512, data, key);
        }

        fn derive(password: &[u8], salt: &[u8], iterations: NonZeroU32) -> SaslResult<Vec<u8>>
        {
            return
                derive_with(
                    ring_pbkdf2::PBKDF2_HMAC_SHA512,
                    ring_digest::SHA512_OUTPUT_LEN,
                    password,
                    salt,
                    iterations
                );
        }

        fn scram_name() -> &'static str
        {
            return "SCRAM-SHA-512";
        }
    }
}

#[cfg(feature = "use_ring")]
pub use self::ring_based::*;
